use thiserror::Error;

/// Main error type for the luminosity reporter
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read ADC sample from {path}: {source}")]
    SampleRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ADC sample: {0:?}")]
    InvalidSample(String),

    #[error("Invalid datagram payload: {0:?}")]
    InvalidPayload(String),

    #[error("Invalid destination address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Calibration file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Calibration error: {0}")]
    Calibration(String),

    #[error("Failed to send datagram to {destination}: {source}")]
    Transmission {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Data source error: {0}")]
    DataSource(String),
}
