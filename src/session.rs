//! Caller-side analysis flow
//!
//! The "analysis delay" shown to users is a presentation affordance. The
//! session stamps each request with a `ready_at` instant and discards any
//! result whose request was superseded by a newer request or a selection
//! change, so a stale signal can never replace a fresh one.

use crate::instrument::ALL_CURRENCY_PAIRS;
use crate::signal::Signal;
use crate::timeframe::Timeframe;
use crate::types::{Symbol, Timestamp};
use chrono::Duration;
use rand::Rng;

/// One pending analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub sequence: u64,
    pub instrument: Symbol,
    pub timeframe: Timeframe,
    pub requested_at: Timestamp,
    pub ready_at: Timestamp,
}

impl AnalysisRequest {
    /// Artificial delay attached to this request
    pub fn delay(&self) -> Duration {
        self.ready_at - self.requested_at
    }
}

/// What happened when a result was handed back to the session
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The artificial delay has not elapsed yet
    Pending { remaining: Duration },
    /// A newer request or selection replaced this one; result dropped
    Superseded,
    /// Result accepted; `None` is the informational "no clear signal"
    Delivered(Option<Signal>),
}

/// Selection and request bookkeeping for one display session
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    instrument: Symbol,
    timeframe: Timeframe,
    sequence: u64,
    delay_ms: [u64; 2],
    active: Option<Signal>,
}

impl AnalysisSession {
    /// Create a session with an initial selection and delay range
    pub fn new(instrument: impl Into<Symbol>, timeframe: Timeframe, delay_ms: [u64; 2]) -> Self {
        let [a, b] = delay_ms;
        Self {
            instrument: instrument.into(),
            timeframe,
            sequence: 0,
            delay_ms: [a.min(b), a.max(b)],
            active: None,
        }
    }

    /// Currently selected instrument
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Currently selected timeframe
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Sequence number of the newest request or selection change
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Last delivered signal, cleared on every new request or selection change
    pub fn active_signal(&self) -> Option<&Signal> {
        self.active.as_ref()
    }

    /// Change the selection; any in-flight request becomes stale
    pub fn select(&mut self, instrument: impl Into<Symbol>, timeframe: Timeframe) {
        let instrument = instrument.into();
        if instrument != self.instrument || timeframe != self.timeframe {
            log::debug!(
                "Selection {} {} -> {} {}",
                self.instrument,
                self.timeframe,
                instrument,
                timeframe
            );
            self.instrument = instrument;
            self.timeframe = timeframe;
            self.sequence += 1;
            self.active = None;
        }
    }

    /// Start an analysis of the current selection
    pub fn request<R: Rng + ?Sized>(&mut self, now: Timestamp, rng: &mut R) -> AnalysisRequest {
        self.sequence += 1;
        self.active = None;

        let [min_delay, max_delay] = self.delay_ms;
        let delay_ms = rng.gen_range(min_delay..=max_delay);
        let request = AnalysisRequest {
            sequence: self.sequence,
            instrument: self.instrument.clone(),
            timeframe: self.timeframe,
            requested_at: now,
            ready_at: now
                .checked_add_signed(Duration::milliseconds(delay_ms as i64))
                .unwrap_or(now),
        };
        log::debug!(
            "Analysis #{} for {} {} ready in {}ms",
            request.sequence,
            request.instrument,
            request.timeframe,
            delay_ms
        );
        request
    }

    /// Check if a request still matches the newest selection and sequence
    pub fn is_current(&self, request: &AnalysisRequest) -> bool {
        request.sequence == self.sequence
            && request.instrument == self.instrument
            && request.timeframe == self.timeframe
    }

    /// Hand back the result of a request
    pub fn complete(
        &mut self,
        request: &AnalysisRequest,
        now: Timestamp,
        signal: Option<Signal>,
    ) -> AnalysisOutcome {
        if !self.is_current(request) {
            log::debug!("Dropping superseded analysis #{}", request.sequence);
            return AnalysisOutcome::Superseded;
        }
        if now < request.ready_at {
            return AnalysisOutcome::Pending {
                remaining: request.ready_at - now,
            };
        }
        if signal.is_none() {
            log::info!(
                "No clear signal for {} on {}",
                request.instrument,
                request.timeframe
            );
        }
        self.active = signal.clone();
        AnalysisOutcome::Delivered(signal)
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(ALL_CURRENCY_PAIRS[0], Timeframe::default(), [800, 2300])
    }
}
