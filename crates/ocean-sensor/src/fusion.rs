use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::reading::SensorReading;

/// Default keystroke step, in radians.
pub const DEFAULT_STEP_RADIANS: f32 = 0.05;

/// How sensor orientation and manual offsets combine into the camera
/// rotation. The three variants are observed behaviors of the same toy and
/// are not equivalent; exactly one is active per fuser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionPolicy {
    /// The sensor orientation is the camera rotation. Manual input is
    /// ignored.
    Overwrite,
    /// A quaternion offset accumulates world-axis keystroke rotations and is
    /// composed ahead of the sensor rotation.
    OffsetThenSensor,
    /// Two scalar angle accumulators are re-applied every frame on top of
    /// the sensor rotation, with the pitch axis taken from the
    /// rotated-so-far frame rather than the world.
    SensorThenLocalOffset,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        FusionPolicy::SensorThenLocalOffset
    }
}

/// A discrete directional steering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Combines the latest decoded reading with accumulated manual input.
///
/// Sensor state is replaced wholesale by each ingested reading (no
/// filtering); offset state persists across readings and only moves on
/// keystrokes. `camera_rotation` is a pure query and is the only output.
pub struct OrientationFuser {
    policy: FusionPolicy,
    step: f32,
    sensor: Quat,
    /// Accumulated world-axis offset (`OffsetThenSensor` only).
    offset: Quat,
    /// Scalar accumulators (`SensorThenLocalOffset` only).
    pitch_offset: f32,
    yaw_offset: f32,
}

impl OrientationFuser {
    pub fn new(policy: FusionPolicy, step_radians: f32) -> Self {
        Self {
            policy,
            step: step_radians,
            sensor: Quat::IDENTITY,
            offset: Quat::IDENTITY,
            pitch_offset: 0.0,
            yaw_offset: 0.0,
        }
    }

    /// Replace the sensor orientation from a decoded reading.
    pub fn ingest(&mut self, reading: &SensorReading) {
        let yaw = reading.yaw.to_radians();
        let pitch = reading.pitch.to_radians();
        let roll = reading.roll.to_radians();

        self.sensor = match self.policy {
            FusionPolicy::Overwrite => Quat::from_euler(EulerRot::XYZ, pitch, yaw, roll),
            FusionPolicy::OffsetThenSensor | FusionPolicy::SensorThenLocalOffset => {
                Quat::from_rotation_y(-yaw)
                    * Quat::from_rotation_x(-pitch)
                    * Quat::from_rotation_z(roll)
            }
        };
    }

    /// Apply one steering keystroke. Up/Down pitch about X, Left/Right yaw
    /// about Y; positive X pitches the view up, positive Y yaws it left.
    pub fn apply_offset(&mut self, direction: OffsetDirection) {
        let (axis, sign) = match direction {
            OffsetDirection::Up => (Vec3::X, 1.0),
            OffsetDirection::Down => (Vec3::X, -1.0),
            OffsetDirection::Left => (Vec3::Y, 1.0),
            OffsetDirection::Right => (Vec3::Y, -1.0),
        };
        let angle = sign * self.step;

        match self.policy {
            FusionPolicy::Overwrite => {}
            FusionPolicy::OffsetThenSensor => {
                // World-frame accumulation: newest rotation outermost.
                self.offset = Quat::from_axis_angle(axis, angle) * self.offset;
            }
            FusionPolicy::SensorThenLocalOffset => {
                if axis == Vec3::X {
                    self.pitch_offset += angle;
                } else {
                    self.yaw_offset += angle;
                }
            }
        }
    }

    /// Drop all accumulated manual offsets.
    pub fn reset_offsets(&mut self) {
        self.offset = Quat::IDENTITY;
        self.pitch_offset = 0.0;
        self.yaw_offset = 0.0;
        tracing::info!("Manual view offsets reset");
    }

    /// The rotation to apply to the camera this frame. Pure: repeated calls
    /// with unchanged state return the same value.
    pub fn camera_rotation(&self) -> Quat {
        match self.policy {
            FusionPolicy::Overwrite => self.sensor,
            FusionPolicy::OffsetThenSensor => self.offset * self.sensor,
            FusionPolicy::SensorThenLocalOffset => {
                let q = self.sensor * Quat::from_rotation_y(self.yaw_offset);
                // Pitch about the X axis of the rotated-so-far frame.
                let pitch_axis = q * Vec3::X;
                (q * Quat::from_axis_angle(pitch_axis, self.pitch_offset)).normalize()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn reading(yaw: f32, pitch: f32, roll: f32) -> SensorReading {
        SensorReading {
            yaw,
            pitch,
            roll,
            ..SensorReading::default()
        }
    }

    fn approx_eq(a: Quat, b: Quat) -> bool {
        // q and -q are the same rotation.
        (a.dot(b).abs() - 1.0).abs() < EPS
    }

    #[test]
    fn zero_reading_is_identity_under_overwrite() {
        let mut fuser = OrientationFuser::new(FusionPolicy::Overwrite, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(0.0, 0.0, 0.0));
        assert!(approx_eq(fuser.camera_rotation(), Quat::IDENTITY));
    }

    #[test]
    fn zero_reading_is_identity_under_offset_then_sensor() {
        let mut fuser =
            OrientationFuser::new(FusionPolicy::OffsetThenSensor, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(0.0, 0.0, 0.0));
        assert!(approx_eq(fuser.camera_rotation(), Quat::IDENTITY));
    }

    #[test]
    fn overwrite_ignores_keystrokes() {
        let mut fuser = OrientationFuser::new(FusionPolicy::Overwrite, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(10.0, 5.0, 0.0));
        let before = fuser.camera_rotation();

        fuser.apply_offset(OffsetDirection::Left);
        fuser.apply_offset(OffsetDirection::Up);
        assert!(approx_eq(fuser.camera_rotation(), before));
    }

    #[test]
    fn overwrite_matches_euler_xyz() {
        let mut fuser = OrientationFuser::new(FusionPolicy::Overwrite, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(30.0, 10.0, -5.0));

        let expected = Quat::from_euler(
            EulerRot::XYZ,
            10.0_f32.to_radians(),
            30.0_f32.to_radians(),
            -5.0_f32.to_radians(),
        );
        assert!(approx_eq(fuser.camera_rotation(), expected));
    }

    #[test]
    fn four_right_steps_then_reading_is_deterministic() {
        let run = || {
            let mut fuser =
                OrientationFuser::new(FusionPolicy::SensorThenLocalOffset, DEFAULT_STEP_RADIANS);
            for _ in 0..4 {
                fuser.apply_offset(OffsetDirection::Right);
            }
            fuser.ingest(&reading(12.5, -3.0, 1.0));
            fuser.camera_rotation()
        };

        let first = run();
        let second = run();
        assert!(approx_eq(first, second));

        // Closed form: sensor rotation followed by Qy(-0.2), no pitch
        // accumulated.
        let sensor = Quat::from_rotation_y(-12.5_f32.to_radians())
            * Quat::from_rotation_x(3.0_f32.to_radians())
            * Quat::from_rotation_z(1.0_f32.to_radians());
        let expected = sensor * Quat::from_rotation_y(-4.0 * DEFAULT_STEP_RADIANS);
        assert!(approx_eq(first, expected));
    }

    #[test]
    fn offset_then_sensor_composes_offset_first() {
        let mut fuser =
            OrientationFuser::new(FusionPolicy::OffsetThenSensor, DEFAULT_STEP_RADIANS);
        fuser.apply_offset(OffsetDirection::Up);
        fuser.apply_offset(OffsetDirection::Left);
        fuser.ingest(&reading(90.0, 0.0, 0.0));

        let offset = Quat::from_rotation_y(DEFAULT_STEP_RADIANS)
            * Quat::from_rotation_x(DEFAULT_STEP_RADIANS);
        let sensor = Quat::from_rotation_y(-90.0_f32.to_radians());
        assert!(approx_eq(fuser.camera_rotation(), offset * sensor));
    }

    #[test]
    fn query_does_not_mutate_state() {
        let mut fuser =
            OrientationFuser::new(FusionPolicy::SensorThenLocalOffset, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(45.0, 10.0, 2.0));
        fuser.apply_offset(OffsetDirection::Down);

        let a = fuser.camera_rotation();
        let b = fuser.camera_rotation();
        let c = fuser.camera_rotation();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn reset_clears_manual_offsets() {
        let mut fuser =
            OrientationFuser::new(FusionPolicy::SensorThenLocalOffset, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(5.0, 5.0, 0.0));
        let clean = fuser.camera_rotation();

        fuser.apply_offset(OffsetDirection::Left);
        fuser.apply_offset(OffsetDirection::Down);
        assert!(!approx_eq(fuser.camera_rotation(), clean));

        fuser.reset_offsets();
        assert!(approx_eq(fuser.camera_rotation(), clean));
    }

    #[test]
    fn local_pitch_axis_follows_the_yawed_frame() {
        // With a 90° sensor yaw, a manual pitch-up must tilt about the
        // rotated frame's X axis, not the world's.
        let mut fuser =
            OrientationFuser::new(FusionPolicy::SensorThenLocalOffset, DEFAULT_STEP_RADIANS);
        fuser.ingest(&reading(90.0, 0.0, 0.0));
        fuser.apply_offset(OffsetDirection::Up);

        let q = fuser.camera_rotation();
        let sensor = Quat::from_rotation_y(-90.0_f32.to_radians());
        let axis = sensor * Vec3::X;
        let expected = sensor * Quat::from_axis_angle(axis, DEFAULT_STEP_RADIANS);
        assert!(approx_eq(q, expected.normalize()));
    }
}
