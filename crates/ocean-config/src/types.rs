use ocean_sensor::fusion::{FusionPolicy, DEFAULT_STEP_RADIANS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Sensor serial link.
    pub serial: SerialConfig,
    /// Orientation fusion behavior.
    pub fusion: FusionConfig,
    /// Scene/sun placement.
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial port path (e.g. /dev/ttyUSB0, COM5). `None` auto-detects the
    /// first available port.
    pub port: Option<String>,
    /// Link speed. The sensor ships at 115200.
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 115_200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// How sensor orientation and keyboard offsets combine.
    pub policy: FusionPolicy,
    /// Angle applied per arrow keystroke, in radians.
    pub step_radians: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            policy: FusionPolicy::default(),
            step_radians: DEFAULT_STEP_RADIANS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Sun elevation above the horizon, degrees.
    pub elevation: f32,
    /// Sun azimuth, degrees.
    pub azimuth: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            elevation: 2.0,
            azimuth: 180.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();

        assert_eq!(back.serial.baud_rate, 115_200);
        assert_eq!(back.fusion.policy, FusionPolicy::SensorThenLocalOffset);
        assert!((back.fusion.step_radians - DEFAULT_STEP_RADIANS).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AppConfig = toml::from_str("[serial]\nbaud_rate = 9600\n").unwrap();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.scene.azimuth, 180.0);
    }
}
