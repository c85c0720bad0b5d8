use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::collector::DEFAULT_SENSOR_ID;
use crate::data_source::{DEFAULT_ADC_PATH, SampleSourceConfig};
use crate::error::SensorError;
use crate::processing::Calibration;
use crate::reporter::{DEFAULT_SERVER_IP, DEFAULT_SERVER_PORT, ReporterConfig};
use crate::reporter::udp::parse_destination;

#[derive(Parser, Debug)]
#[command(name = "ldr-reporter")]
#[command(about = "LDR luminosity sensor reporter")]
#[command(version)]
pub struct Cli {
    /// Sysfs file of the ADC channel the LDR divider is wired to
    #[arg(long, env = "LDR_ADC_PATH", default_value = DEFAULT_ADC_PATH)]
    pub adc_path: PathBuf,

    /// Replay raw samples from a file instead of reading the ADC
    #[arg(long)]
    pub playback: Option<PathBuf>,

    /// Restart playback when the file is exhausted
    #[arg(long, default_value = "false")]
    pub loop_playback: bool,

    /// Milliseconds between readings
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// Stop after this many readings (runs until Ctrl+C when omitted)
    #[arg(long)]
    pub cycles: Option<u64>,

    /// TOML file with calibration constants
    #[arg(long, env = "LDR_CALIBRATION")]
    pub calibration: Option<PathBuf>,

    /// LDR resistance in full light (ohms)
    #[arg(long)]
    pub bright_resistance: Option<f64>,

    /// LDR resistance in darkness (ohms)
    #[arg(long)]
    pub dark_resistance: Option<f64>,

    /// Full-scale ADC reading
    #[arg(long)]
    pub adc_max: Option<f64>,

    /// Fixed divider resistor (ohms)
    #[arg(long)]
    pub fixed_resistance: Option<f64>,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Print readings to stdout
    Console,

    /// Send readings as UDP datagrams to a collector
    Udp(UdpArgs),

    /// Receive readings from UDP reporters and print them as JSON lines
    Collect(CollectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UdpArgs {
    /// Collector IPv4 address
    #[arg(long, env = "LDR_SERVER_IP", default_value_t = DEFAULT_SERVER_IP)]
    pub server_ip: Ipv4Addr,

    /// Collector UDP port
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Local IPv4 address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Local UDP port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,

    /// Sensor id attached to every record
    #[arg(long, default_value = DEFAULT_SENSOR_ID)]
    pub sensor_id: String,
}

impl CollectArgs {
    pub fn to_bind_addr(&self) -> Result<SocketAddrV4, SensorError> {
        parse_destination(&self.bind, self.port)
    }
}

impl Cli {
    /// Convert CLI args to SampleSourceConfig
    pub fn to_sample_source_config(&self) -> SampleSourceConfig {
        match &self.playback {
            Some(samples_file) => SampleSourceConfig::Playback {
                samples_file: samples_file.clone(),
                loop_playback: self.loop_playback,
            },
            None => SampleSourceConfig::Sysfs {
                path: self.adc_path.clone(),
            },
        }
    }

    /// Build the calibration: defaults, then the TOML file, then flag overrides
    pub fn to_calibration(&self) -> Result<Calibration, SensorError> {
        let mut calibration = match &self.calibration {
            Some(path) => Calibration::from_toml_file(path)?,
            None => Calibration::default(),
        };

        if let Some(value) = self.bright_resistance {
            calibration.bright_resistance = value;
        }
        if let Some(value) = self.dark_resistance {
            calibration.dark_resistance = value;
        }
        if let Some(value) = self.adc_max {
            calibration.adc_max = value;
        }
        if let Some(value) = self.fixed_resistance {
            calibration.fixed_resistance = value;
        }

        calibration.validate()?;
        Ok(calibration)
    }

    /// Convert CLI args to ReporterConfig
    ///
    /// Returns `None` when no reporting mode was selected.
    pub fn to_reporter_config(&self) -> Option<ReporterConfig> {
        match &self.mode {
            Some(Mode::Console) => Some(ReporterConfig::Console),
            Some(Mode::Udp(args)) => Some(ReporterConfig::Udp {
                destination: SocketAddrV4::new(args.server_ip, args.port),
            }),
            Some(Mode::Collect(_)) | None => None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
