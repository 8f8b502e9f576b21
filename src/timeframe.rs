//! Timeframe symbols and bar-boundary utilities

use crate::error::{Result, SimError};
use crate::types::Timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar duration used when a timeframe symbol is not recognized (M1)
pub const FALLBACK_BAR_SECONDS: i64 = 60;

/// Bar duration symbol
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Timeframe {
    #[default]
    M1,
    M2,
    M3,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    /// All timeframes offered by the dashboard, shortest first
    pub const ALL: [Timeframe; 9] = [
        Timeframe::M1,
        Timeframe::M2,
        Timeframe::M3,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// Bar length in seconds
    pub fn bar_seconds(&self) -> i64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M2 => 120,
            Timeframe::M3 => 180,
            Timeframe::M5 => 300,
            Timeframe::M15 => 900,
            Timeframe::M30 => 1800,
            Timeframe::H1 => 3600,
            Timeframe::H4 => 14400,
            Timeframe::D1 => 86400,
        }
    }

    /// Get the duration of one bar
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.bar_seconds())
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M2 => "M2",
            Timeframe::M3 => "M3",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }

}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Timeframe::ALL
            .iter()
            .copied()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::InvalidTimeframe(s.to_string()))
    }
}

/// Look up the bar duration for a timeframe symbol
///
/// Unrecognized symbols fall back to one-minute bars instead of failing.
pub fn timeframe_to_bar_seconds(symbol: &str) -> i64 {
    match symbol.parse::<Timeframe>() {
        Ok(tf) => tf.bar_seconds(),
        Err(_) => {
            log::warn!(
                "Unrecognized timeframe {:?}, using {}s bars",
                symbol,
                FALLBACK_BAR_SECONDS
            );
            FALLBACK_BAR_SECONDS
        }
    }
}

/// Floor a timestamp to the enclosing epoch-aligned bar boundary
pub fn align_to_bar(timestamp: Timestamp, bar_seconds: i64) -> Timestamp {
    if bar_seconds <= 0 {
        return timestamp;
    }
    let secs = timestamp.timestamp();
    let aligned = secs - secs.rem_euclid(bar_seconds);
    DateTime::<Utc>::from_timestamp(aligned, 0).unwrap_or(timestamp)
}
