//! Serial byte source for the orientation sensor.
//!
//! A dedicated OS thread owns the port and blocks on reads, forwarding owned
//! chunks into a tokio channel. The port is closed by drop on every exit
//! path of that thread; there is no reconnect policy.

use std::io::Read;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tokio::sync::mpsc;

/// Chunk read size. The sensor streams ~19 bytes per packet at 115200 baud,
/// so reads typically return a handful of packets at most.
const READ_BUF_LEN: usize = 512;

/// Blocking-read timeout. A timeout is not an error, just an empty poll.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Open the sensor's serial port: 8 data bits, no parity, one stop bit.
///
/// With no explicit path the first enumerated port is used, mirroring a
/// previously granted device pick.
pub fn open(path: Option<&str>, baud_rate: u32) -> Result<Box<dyn SerialPort>> {
    let path = match path {
        Some(path) => path.to_string(),
        None => {
            let ports = serialport::available_ports()?;
            let first = ports
                .first()
                .ok_or_else(|| anyhow!("no serial port available"))?;
            tracing::info!(port = %first.port_name, "Auto-detected serial port");
            first.port_name.clone()
        }
    };

    let port = serialport::new(&path, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()?;

    tracing::info!(port = %path, baud_rate, "Opened sensor serial port");
    Ok(port)
}

/// Spawn the reader thread. The returned channel yields raw byte chunks and
/// closes when the stream ends or fails.
pub fn spawn_reader(mut port: Box<dyn SerialPort>) -> Result<mpsc::UnboundedReceiver<Vec<u8>>> {
    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("ocean-sensor-reader".into())
        .spawn(move || {
            tracing::debug!("Serial reader thread started");
            let mut buf = [0u8; READ_BUF_LEN];
            loop {
                match port.read(&mut buf) {
                    Ok(0) => {
                        tracing::warn!("Serial stream ended");
                        return;
                    }
                    Ok(n) => {
                        if chunk_tx.send(buf[..n].to_vec()).is_err() {
                            tracing::debug!("Chunk receiver dropped, reader exiting");
                            return;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                    Err(e) => {
                        tracing::error!(?e, "Serial read error");
                        return;
                    }
                }
            }
        })?;

    Ok(chunk_rx)
}
