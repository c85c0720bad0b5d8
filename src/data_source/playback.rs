use std::path::PathBuf;

use async_trait::async_trait;

use super::{SampleSource, parse_sample};
use crate::error::SensorError;
use crate::processing::RawSample;

/// Sample source replaying raw ADC values from a text file
///
/// One value per line; blank lines and lines starting with `#` are skipped.
pub struct PlaybackSource {
    samples_file: PathBuf,
    display_name: String,
    loop_playback: bool,
    samples: Option<Vec<RawSample>>,
    position: usize,
}

impl PlaybackSource {
    pub fn new(samples_file: PathBuf, loop_playback: bool) -> Self {
        let display_name = samples_file.display().to_string();
        Self {
            samples_file,
            display_name,
            loop_playback,
            samples: None,
            position: 0,
        }
    }

    /// Parse the contents of a playback file
    fn parse_samples(contents: &str) -> Result<Vec<RawSample>, SensorError> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(parse_sample)
            .collect()
    }

    async fn load(&mut self) -> Result<&[RawSample], SensorError> {
        if self.samples.is_none() {
            let contents = tokio::fs::read_to_string(&self.samples_file)
                .await
                .map_err(|source| SensorError::SampleRead {
                    path: self.display_name.clone(),
                    source,
                })?;
            let samples = Self::parse_samples(&contents)?;

            tracing::info!(
                "Loaded {} samples for playback from {}",
                samples.len(),
                self.display_name
            );
            self.samples = Some(samples);
        }

        Ok(self.samples.as_deref().unwrap_or_default())
    }
}

#[async_trait]
impl SampleSource for PlaybackSource {
    async fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let loop_playback = self.loop_playback;
        let mut position = self.position;
        let samples = self.load().await?;

        if samples.is_empty() {
            return Err(SensorError::DataSource("Playback file has no samples".into()));
        }

        if position >= samples.len() {
            if !loop_playback {
                return Err(SensorError::DataSource("Playback finished".into()));
            }
            tracing::info!("Looping playback from start");
            position = 0;
        }

        let sample = samples[position];
        self.position = position + 1;

        Ok(sample)
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn samples_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_parse_samples_skips_comments_and_blanks() {
        let samples = PlaybackSource::parse_samples("# dusk\n100\n\n  2048 \n# noon\n4000\n").unwrap();
        assert_eq!(samples, vec![100, 2048, 4000]);
    }

    #[test]
    fn test_parse_samples_rejects_garbage() {
        let result = PlaybackSource::parse_samples("100\nbright\n");
        assert!(matches!(result, Err(SensorError::InvalidSample(_))));
    }

    #[tokio::test]
    async fn test_playback_in_order_then_finishes() {
        let file = samples_file("10\n20\n30\n");
        let mut source = PlaybackSource::new(file.path().to_path_buf(), false);

        assert_eq!(source.read_raw().await.unwrap(), 10);
        assert_eq!(source.read_raw().await.unwrap(), 20);
        assert_eq!(source.read_raw().await.unwrap(), 30);
        assert!(matches!(
            source.read_raw().await,
            Err(SensorError::DataSource(_))
        ));
    }

    #[tokio::test]
    async fn test_playback_loops() {
        let file = samples_file("1\n2\n");
        let mut source = PlaybackSource::new(file.path().to_path_buf(), true);

        let mut read = Vec::new();
        for _ in 0..5 {
            read.push(source.read_raw().await.unwrap());
        }
        assert_eq!(read, vec![1, 2, 1, 2, 1]);
    }

    #[tokio::test]
    async fn test_empty_playback_file() {
        let file = samples_file("# nothing here\n");
        let mut source = PlaybackSource::new(file.path().to_path_buf(), true);

        assert!(matches!(
            source.read_raw().await,
            Err(SensorError::DataSource(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_playback_file() {
        let mut source = PlaybackSource::new(PathBuf::from("/nonexistent/samples.txt"), false);

        assert!(matches!(
            source.read_raw().await,
            Err(SensorError::SampleRead { .. })
        ));
    }
}
