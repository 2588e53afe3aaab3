pub mod framing;
pub mod fusion;
pub mod reading;
pub mod transport;

use anyhow::Result;
use tokio::sync::{mpsc, watch};

use framing::FrameSynchronizer;
use reading::SensorReading;

/// Client for the serial orientation sensor.
///
/// Owns the background parse/decode task and publishes the latest complete
/// reading. Readings replace each other wholesale; a consumer polling
/// `latest` sees either the previous reading or the new one, never a torn
/// value.
pub struct SensorClient {
    reading_rx: watch::Receiver<SensorReading>,
    _task: tokio::task::JoinHandle<()>,
}

impl SensorClient {
    /// Open the serial port and start streaming readings.
    ///
    /// `port` of `None` auto-detects; `baud_rate` is typically 115200.
    pub fn connect(port: Option<&str>, baud_rate: u32) -> Result<Self> {
        let port = transport::open(port, baud_rate)?;
        let chunk_rx = transport::spawn_reader(port)?;

        let (reading_tx, reading_rx) = watch::channel(SensorReading::default());
        let task = tokio::spawn(sensor_read_loop(chunk_rx, reading_tx));

        Ok(Self {
            reading_rx,
            _task: task,
        })
    }

    /// Create a client with no hardware behind it: the reading stays at the
    /// level, motionless default. For development without the sensor.
    pub fn mock() -> Self {
        let (reading_tx, reading_rx) = watch::channel(SensorReading::default());
        let task = tokio::spawn(async move {
            // Keep the sender alive.
            let _tx = reading_tx;
            std::future::pending::<()>().await;
        });
        Self {
            reading_rx,
            _task: task,
        }
    }

    /// Snapshot of the newest complete reading (non-blocking).
    pub fn latest(&self) -> SensorReading {
        *self.reading_rx.borrow()
    }
}

/// Background task: drain byte chunks, recover candidate packets, decode,
/// publish. Ends when the byte stream does; malformed candidates are
/// dropped and the stream continues from the next sentinel pair.
async fn sensor_read_loop(
    mut chunk_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    reading_tx: watch::Sender<SensorReading>,
) {
    let mut sync = FrameSynchronizer::new();
    let mut packet_count: u64 = 0;

    while let Some(chunk) = chunk_rx.recv().await {
        sync.push_data(&chunk);

        while let Some(packet) = sync.next_packet() {
            match SensorReading::decode(&packet) {
                Ok(reading) => {
                    let _ = reading_tx.send(reading);
                    packet_count += 1;
                    if packet_count % 1000 == 0 {
                        tracing::debug!(packet_count, "Sensor packets decoded");
                    }
                }
                Err(e) => {
                    tracing::trace!(?e, "Skipping malformed candidate packet");
                }
            }
        }
    }

    tracing::warn!(packet_count, "Sensor byte stream ended");
}
