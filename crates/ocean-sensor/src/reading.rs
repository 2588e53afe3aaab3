use thiserror::Error;

/// Size of one sensor packet on the wire (sentinel pair excluded).
pub const PACKET_LEN: usize = 17;

/// Degrees per raw angle unit: angles arrive as signed centi-degrees.
const ANGLE_SCALE: f32 = 0.01;

#[derive(Debug, Error)]
pub enum FramingError {
    #[error("candidate packet is {len} bytes, expected {PACKET_LEN}")]
    Length { len: usize },
}

/// One decoded orientation-and-motion reading.
///
/// Angles are in degrees. Accelerations and the trailing status bytes are
/// raw device units. The device's checksum scheme is unknown, so the
/// checksum byte is reported but never checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub index: u8,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub x_acceleration: i16,
    pub y_acceleration: i16,
    pub z_acceleration: i16,
    pub mi: u8,
    pub mr: u8,
    pub reserved: u8,
    pub checksum: u8,
}

impl SensorReading {
    /// Decode a 17-byte candidate packet.
    ///
    /// Multi-byte fields are little-endian; yaw/pitch/roll and the
    /// accelerations are signed. Every 17-byte bit pattern decodes to some
    /// reading, so the only failure is a length mismatch.
    pub fn decode(bytes: &[u8]) -> Result<Self, FramingError> {
        if bytes.len() != PACKET_LEN {
            return Err(FramingError::Length { len: bytes.len() });
        }

        let i16_at = |offset: usize| i16::from_le_bytes([bytes[offset], bytes[offset + 1]]);

        Ok(Self {
            index: bytes[0],
            yaw: f32::from(i16_at(1)) * ANGLE_SCALE,
            pitch: f32::from(i16_at(3)) * ANGLE_SCALE,
            roll: f32::from(i16_at(5)) * ANGLE_SCALE,
            x_acceleration: i16_at(7),
            y_acceleration: i16_at(9),
            z_acceleration: i16_at(11),
            mi: bytes[13],
            mr: bytes[14],
            reserved: bytes[15],
            checksum: bytes[16],
        })
    }
}

impl Default for SensorReading {
    /// A level, motionless reading.
    fn default() -> Self {
        Self {
            index: 0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            x_acceleration: 0,
            y_acceleration: 0,
            z_acceleration: 0,
            mi: 0,
            mr: 0,
            reserved: 0,
            checksum: 0,
        }
    }
}
