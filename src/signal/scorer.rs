//! Signal scorer

use super::policy::{MomentumPolicy, ScoringPolicy};
use super::{Direction, Signal, Strength};
use crate::market::MarketSnapshot;
use crate::timeframe::Timeframe;
use crate::types::Candle;

/// Turns a policy assessment into a [`Signal`] or no-call
///
/// Synchronous and side-effect free: identical inputs always give an
/// identical result.
#[derive(Debug, Clone, Default)]
pub struct SignalScorer<P: ScoringPolicy = MomentumPolicy> {
    policy: P,
}

impl<P: ScoringPolicy> SignalScorer<P> {
    /// Create a scorer around a policy
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Get the active policy
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Score one instrument/timeframe pair
    ///
    /// Returns `None` when the instrument is missing from the snapshot, the
    /// history is shorter than the policy window, or the score stays inside
    /// the threshold.
    pub fn score(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        snapshot: &MarketSnapshot,
        candles: &[Candle],
    ) -> Option<Signal> {
        let Some(live) = snapshot.get(instrument) else {
            log::debug!("{} not in market snapshot, no signal", instrument);
            return None;
        };

        if candles.len() < self.policy.min_window() {
            log::debug!(
                "{} {}: {} candles below {} window of {}",
                instrument,
                timeframe,
                candles.len(),
                self.policy.name(),
                self.policy.min_window()
            );
            return None;
        }

        let assessment = self.policy.assess(candles, Some(&live))?;
        if !assessment.is_actionable() {
            log::debug!(
                "{} {}: score {:.3} inside threshold {:.3}",
                instrument,
                timeframe,
                assessment.score,
                assessment.threshold
            );
            return None;
        }

        let direction = Direction::from_score(assessment.score)?;
        let confidence = assessment.confidence();
        let newest = candles.last()?;

        let signal = Signal {
            instrument: instrument.to_string(),
            timeframe,
            direction,
            confidence,
            strength: Strength::from_confidence(confidence),
            score: assessment.score,
            reasoning: assessment.findings,
            generated_at: newest
                .timestamp
                .checked_add_signed(timeframe.duration())
                .unwrap_or(newest.timestamp),
        };
        log::debug!("Scored {}", signal);
        Some(signal)
    }
}

/// Score with the default momentum policy
pub fn score_signal(
    instrument: &str,
    timeframe: Timeframe,
    snapshot: &MarketSnapshot,
    candles: &[Candle],
) -> Option<Signal> {
    SignalScorer::<MomentumPolicy>::default().score(instrument, timeframe, snapshot, candles)
}
