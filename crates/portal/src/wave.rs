//! The wave record as shown on the page, and its on-chain sources.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};

/// A wave as recorded by the contract's `getAllWaves()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawWave {
    pub waver: Address,
    /// Seconds since the Unix epoch.
    pub timestamp: U256,
    pub message: String,
}

/// A decoded `NewWave(address indexed from, uint256 timestamp, string message)` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewWaveEvent {
    pub from: Address,
    /// Seconds since the Unix epoch.
    pub timestamp: U256,
    pub message: String,
}

/// A wave, immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wave {
    pub address: Address,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Wave {
    /// Returns the card timestamp, e.g. `Tue Nov 14 2023 22:13:20 GMT+0000`.
    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
    }
}

impl From<RawWave> for Wave {
    fn from(raw: RawWave) -> Self {
        Self { address: raw.waver, timestamp: point_in_time(raw.timestamp), message: raw.message }
    }
}

impl From<NewWaveEvent> for Wave {
    fn from(event: NewWaveEvent) -> Self {
        Self {
            address: event.from,
            timestamp: point_in_time(event.timestamp),
            message: event.message,
        }
    }
}

/// Converts an on-chain timestamp in seconds to a point in time.
///
/// The value is scaled to milliseconds first. Anything outside the representable calendar range
/// saturates to [`DateTime::<Utc>::MAX_UTC`].
pub fn point_in_time(seconds: U256) -> DateTime<Utc> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Maps the raw `getAllWaves()` records into waves, preserving chain order.
pub fn from_records(records: impl IntoIterator<Item = RawWave>) -> Vec<Wave> {
    records.into_iter().map(Wave::from).collect()
}
