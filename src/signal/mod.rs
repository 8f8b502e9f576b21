//! Directional signal scoring
//!
//! A [`Signal`] is produced by a [`SignalScorer`] from a candle history and
//! the live market snapshot. Scoring is a pure function of its inputs; the
//! indicator weighting lives behind the replaceable [`ScoringPolicy`].

pub mod indicators;
pub mod policy;
pub mod scorer;

pub use policy::{Assessment, MomentumPolicy, MomentumPolicyConfig, ScoringPolicy};
pub use scorer::{score_signal, SignalScorer};

use crate::timeframe::Timeframe;
use crate::types::{Symbol, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicted price direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Price expected to rise
    Call,
    /// Price expected to fall
    Put,
}

impl Direction {
    /// Direction implied by the sign of a score; zero has none
    pub fn from_score(score: f64) -> Option<Self> {
        if score > 0.0 {
            Some(Direction::Call)
        } else if score < 0.0 {
            Some(Direction::Put)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Call => write!(f, "CALL"),
            Direction::Put => write!(f, "PUT"),
        }
    }
}

/// Discrete confidence bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Bucket a confidence in `[0, 1]`
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence < 1.0 / 3.0 {
            Strength::Weak
        } else if confidence < 2.0 / 3.0 {
            Strength::Moderate
        } else {
            Strength::Strong
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Weak => write!(f, "Weak"),
            Strength::Moderate => write!(f, "Moderate"),
            Strength::Strong => write!(f, "Strong"),
        }
    }
}

/// One indicator reading backing a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Indicator name
    pub indicator: String,
    /// Raw indicator value
    pub value: f64,
    /// Signed, weighted contribution to the combined score
    pub contribution: f64,
    /// Human-readable reading
    pub note: String,
}

impl Finding {
    pub fn new(
        indicator: impl Into<String>,
        value: f64,
        contribution: f64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            indicator: indicator.into(),
            value,
            contribution,
            note: note.into(),
        }
    }

    /// Direction this finding leans toward, if any
    pub fn bias(&self) -> Option<Direction> {
        Direction::from_score(self.contribution)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.indicator, self.note)
    }
}

/// Result of one successful scoring invocation
///
/// Immutable once produced; the next analysis supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub instrument: Symbol,
    pub timeframe: Timeframe,
    pub direction: Direction,
    /// In `[0, 1]`
    pub confidence: f64,
    pub strength: Strength,
    /// Combined policy score the call was derived from
    pub score: f64,
    /// Indicator findings in evaluation order
    pub reasoning: Vec<Finding>,
    /// Close time of the newest candle analyzed
    pub generated_at: Timestamp,
}

impl Signal {
    /// Confidence as a whole percentage
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({}, {}%)",
            self.instrument,
            self.timeframe,
            self.direction,
            self.strength,
            self.confidence_percent()
        )
    }
}
