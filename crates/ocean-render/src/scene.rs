use glam::Vec3;
use ocean_config::SceneConfig;

/// Fixed look of the ocean scene plus the configurable sun placement.
///
/// The palette matches the toy's original appearance: deep indigo water
/// under a hazy sky with the sun just above the horizon.
pub struct OceanScene {
    /// Sun elevation above the horizon, degrees.
    pub elevation: f32,
    /// Sun azimuth, degrees.
    pub azimuth: f32,
    /// Linear-space water tint (0x201e6f).
    pub water_color: Vec3,
    /// Sun disc/glow color.
    pub sun_color: Vec3,
    /// Wave-normal distortion strength fed to the backdrop shimmer.
    pub distortion_scale: f32,
}

impl OceanScene {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            elevation: config.elevation,
            azimuth: config.azimuth,
            water_color: Vec3::new(0x20 as f32, 0x1e as f32, 0x6f as f32) / 255.0,
            sun_color: Vec3::ONE,
            distortion_scale: 3.7,
        }
    }

    /// Unit vector toward the sun from spherical coordinates:
    /// phi measured down from zenith (90° − elevation), theta = azimuth.
    pub fn sun_direction(&self) -> Vec3 {
        let phi = (90.0 - self.elevation).to_radians();
        let theta = self.azimuth.to_radians();
        Vec3::new(
            phi.sin() * theta.sin(),
            phi.cos(),
            phi.sin() * theta.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sun_sits_low_to_the_south() {
        let scene = OceanScene::from_config(&SceneConfig::default());
        let sun = scene.sun_direction();

        // elevation 2°, azimuth 180°: almost horizontal, facing -Z.
        assert!(sun.x.abs() < 1e-5);
        assert!((sun.y - 88.0_f32.to_radians().cos()).abs() < 1e-5);
        assert!(sun.z < -0.99);
        assert!((sun.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zenith_sun_points_straight_up() {
        let scene = OceanScene {
            elevation: 90.0,
            ..OceanScene::from_config(&SceneConfig::default())
        };
        let sun = scene.sun_direction();
        assert!((sun.y - 1.0).abs() < 1e-5);
    }
}
