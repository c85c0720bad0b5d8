use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use async_trait::async_trait;
use tokio::net::UdpSocket;

use super::Reporter;
use crate::error::SensorError;
use crate::processing::Percent;

/// Reporter sending each reading as a standalone UDP datagram
///
/// Delivery is best effort: no acknowledgement, sequence number or resend.
pub struct UdpReporter {
    socket: UdpSocket,
    destination: SocketAddrV4,
    display_name: String,
}

impl UdpReporter {
    /// Bind an unconnected socket on an ephemeral local port
    pub async fn bind(destination: SocketAddrV4) -> Result<Self, SensorError> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).await?;
        let reporter = Self {
            socket,
            destination,
            display_name: destination.to_string(),
        };

        tracing::info!(
            "UDP socket created on {}, sending to {}",
            reporter.local_addr()?,
            destination
        );

        Ok(reporter)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SensorError> {
        Ok(self.socket.local_addr()?)
    }
}

/// Parse the collector address from its textual form
pub fn parse_destination(ip: &str, port: u16) -> Result<SocketAddrV4, SensorError> {
    let ip: Ipv4Addr = ip.trim().parse()?;
    Ok(SocketAddrV4::new(ip, port))
}

/// Datagram payload for a reading: ASCII decimal digits, no terminator
pub fn encode_payload(percent: Percent) -> String {
    percent.to_string()
}

#[async_trait]
impl Reporter for UdpReporter {
    async fn report(&mut self, percent: Percent) -> Result<(), SensorError> {
        let payload = encode_payload(percent);

        let bytes_sent = self
            .socket
            .send_to(payload.as_bytes(), self.destination)
            .await
            .map_err(|source| SensorError::Transmission {
                destination: self.display_name.clone(),
                source,
            })?;

        tracing::info!(
            "Datagram sent ({} bytes) to {}, luminosity {}%",
            bytes_sent,
            self.destination,
            percent
        );

        Ok(())
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}
