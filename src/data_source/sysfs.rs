use std::path::PathBuf;

use async_trait::async_trait;

use super::{SampleSource, parse_sample};
use crate::error::SensorError;
use crate::processing::RawSample;

/// ADC channel exported by the Linux IIO subsystem
///
/// The file is reopened on every read, sysfs attributes are regenerated on
/// each open.
pub struct SysfsAdcSource {
    path: PathBuf,
    display_name: String,
}

impl SysfsAdcSource {
    pub fn new(path: PathBuf) -> Self {
        let display_name = path.display().to_string();
        Self { path, display_name }
    }
}

#[async_trait]
impl SampleSource for SysfsAdcSource {
    async fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SensorError::SampleRead {
                path: self.display_name.clone(),
                source,
            })?;

        let sample = parse_sample(&contents)?;
        tracing::trace!("Read raw sample {} from {}", sample, self.display_name);

        Ok(sample)
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}
