use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SensorError;
use crate::processing::Percent;

/// Sensor id attached to readings when none is configured
pub const DEFAULT_SENSOR_ID: &str = "LDR_KY-018";

/// Unit attached to every reading
pub const PERCENT_UNIT: &str = "%";

/// A received luminosity reading, enriched for downstream consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuminosityRecord {
    pub id: String,
    pub value: Percent,
    pub unit: String,
    pub source: SocketAddr,
    pub received_at: DateTime<Utc>,
}

impl LuminosityRecord {
    pub fn new(id: &str, value: Percent, source: SocketAddr, received_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            value,
            unit: PERCENT_UNIT.to_string(),
            source,
            received_at,
        }
    }
}

/// Decode a datagram payload into a percentage
///
/// Surrounding whitespace is tolerated; anything else that is not a decimal
/// integer in 0..=100 is rejected.
pub fn decode_payload(payload: &[u8]) -> Result<Percent, SensorError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| SensorError::InvalidPayload(String::from_utf8_lossy(payload).to_string()))?
        .trim();

    match text.parse::<Percent>() {
        Ok(value) if value <= 100 => Ok(value),
        _ => Err(SensorError::InvalidPayload(text.to_string())),
    }
}
