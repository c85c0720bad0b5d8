pub mod record;

use std::io::Write;
use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;

use chrono::Utc;
use tokio::net::UdpSocket;
use tokio::sync::watch;

pub use record::{DEFAULT_SENSOR_ID, LuminosityRecord, decode_payload};

use crate::error::SensorError;
use crate::service::wait_for_shutdown;

/// Datagrams larger than this are truncated by the receive call
const RECV_BUFFER_SIZE: usize = 1024;

/// Pause before receiving again after a socket error
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(200);

/// How long to wait before the next receive after a failed one
///
/// Bad payloads are the sender's problem and need no pause; socket errors
/// tend to repeat.
fn retry_delay(error: &SensorError) -> Option<Duration> {
    match error {
        SensorError::InvalidPayload(_) => None,
        _ => Some(RECV_ERROR_BACKOFF),
    }
}

/// Receiving end of the UDP reporter
///
/// Every valid datagram becomes one JSON line on the output writer.
pub struct Collector {
    socket: UdpSocket,
    sensor_id: String,
}

impl Collector {
    pub async fn bind(addr: SocketAddrV4, sensor_id: String) -> Result<Self, SensorError> {
        let socket = UdpSocket::bind(addr).await?;
        let collector = Self { socket, sensor_id };

        tracing::info!("UDP collector listening on {}", collector.local_addr()?);

        Ok(collector)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SensorError> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait for the next datagram and decode it
    pub async fn receive(&self) -> Result<LuminosityRecord, SensorError> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let (len, from) = self.socket.recv_from(&mut buf).await?;

        let value = decode_payload(&buf[..len])?;
        tracing::debug!("Received {}% from {}", value, from);

        Ok(LuminosityRecord::new(&self.sensor_id, value, from, Utc::now()))
    }

    /// Write records as JSON lines until shutdown, returning how many were written
    ///
    /// Undecodable datagrams are logged and skipped.
    pub async fn run<W: Write>(
        &self,
        out: &mut W,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<u64, SensorError> {
        let mut written = 0;

        loop {
            tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => {
                    tracing::info!("Received shutdown signal");
                    break;
                }
                result = self.receive() => {
                    match result {
                        Ok(record) => {
                            serde_json::to_writer(&mut *out, &record)?;
                            writeln!(out)?;
                            out.flush()?;
                            written += 1;
                        }
                        Err(e) => match retry_delay(&e) {
                            None => {
                                tracing::warn!("Ignoring datagram: {}", e);
                            }
                            Some(delay) => {
                                tracing::error!("UDP collector receive error: {}", e);
                                tokio::time::sleep(delay).await;
                            }
                        },
                    }
                }
            }
        }

        tracing::info!("UDP collector stopped after {} records", written);
        Ok(written)
    }
}
