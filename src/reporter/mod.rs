pub mod console;
pub mod udp;

use std::net::{Ipv4Addr, SocketAddrV4};

use async_trait::async_trait;

use crate::error::SensorError;
use crate::processing::Percent;

/// Default collector address
pub const DEFAULT_SERVER_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 42, 10);

/// Default collector UDP port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Trait for the sinks luminosity readings are reported to
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Report a single reading
    async fn report(&mut self, percent: Percent) -> Result<(), SensorError>;

    /// Get the name of this reporter for logging
    fn name(&self) -> &str;
}

/// Configuration for creating reporters
#[derive(Debug, Clone)]
pub enum ReporterConfig {
    /// Print readings to stdout
    Console,
    /// Send each reading as a UDP datagram
    Udp { destination: SocketAddrV4 },
}

impl ReporterConfig {
    /// Create a reporter from this configuration
    ///
    /// For UDP this binds the sending socket, so it fails if no socket can be
    /// created.
    pub async fn create_reporter(&self) -> Result<Box<dyn Reporter>, SensorError> {
        match self {
            ReporterConfig::Console => Ok(Box::new(console::ConsoleReporter::stdout())),
            ReporterConfig::Udp { destination } => {
                let reporter = udp::UdpReporter::bind(*destination).await?;
                Ok(Box::new(reporter))
            }
        }
    }
}
