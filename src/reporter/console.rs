use std::io::{Stdout, Write};

use async_trait::async_trait;

use super::Reporter;
use crate::error::SensorError;
use crate::processing::Percent;

/// Reporter writing one human-readable line per reading
pub struct ConsoleReporter<W> {
    writer: W,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + Sync> ConsoleReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[cfg(test)]
impl<W> ConsoleReporter<W> {
    fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send + Sync> Reporter for ConsoleReporter<W> {
    async fn report(&mut self, percent: Percent) -> Result<(), SensorError> {
        writeln!(self.writer, "Luminosity: {}%", percent)?;
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
