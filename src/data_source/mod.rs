pub mod playback;
pub mod sysfs;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::SensorError;
use crate::processing::RawSample;

/// IIO channel the LDR divider is wired to
pub const DEFAULT_ADC_PATH: &str = "/sys/bus/iio/devices/iio:device0/in_voltage13_raw";

/// Trait for abstracting sample sources (real ADC vs playback)
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Read the latest raw ADC sample
    async fn read_raw(&mut self) -> Result<RawSample, SensorError>;

    /// Get the name of this source for logging
    fn name(&self) -> &str;
}

/// Configuration for creating sample sources
#[derive(Debug, Clone)]
pub enum SampleSourceConfig {
    /// ADC channel exported through sysfs
    Sysfs { path: PathBuf },
    /// Raw samples replayed from a text file
    Playback {
        samples_file: PathBuf,
        loop_playback: bool,
    },
}

impl Default for SampleSourceConfig {
    fn default() -> Self {
        SampleSourceConfig::Sysfs {
            path: PathBuf::from(DEFAULT_ADC_PATH),
        }
    }
}

impl SampleSourceConfig {
    /// Create a sample source from this configuration
    pub fn create_source(&self) -> Box<dyn SampleSource> {
        match self {
            SampleSourceConfig::Sysfs { path } => Box::new(sysfs::SysfsAdcSource::new(path.clone())),
            SampleSourceConfig::Playback {
                samples_file,
                loop_playback,
            } => Box::new(playback::PlaybackSource::new(
                samples_file.clone(),
                *loop_playback,
            )),
        }
    }
}

/// Parse the first whitespace-delimited integer of a sysfs-style text value
pub fn parse_sample(text: &str) -> Result<RawSample, SensorError> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| SensorError::InvalidSample(text.to_string()))?;

    token
        .parse::<RawSample>()
        .map_err(|_| SensorError::InvalidSample(token.to_string()))
}
