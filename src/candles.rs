//! Synthetic OHLC candle histories
//!
//! A candle history is resynthesized wholesale from a single reference
//! price; it is a simulation, not a replay, so two calls with the same
//! inputs are free to differ unless they share a seeded RNG.

use crate::error::Result;
use crate::instrument::DEFAULT_BASE_PRICE;
use crate::market::RandomWalk;
use crate::timeframe::{align_to_bar, FALLBACK_BAR_SECONDS};
use crate::types::{Candle, Price, Timestamp};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::io;

/// Bars per chart in the dashboard
pub const DEFAULT_CANDLE_COUNT: usize = 100;

/// Relative volatility of a one-minute bar
pub const DEFAULT_MINUTE_VOLATILITY: f64 = 0.0003;

/// Intra-bar excursions sampled per candle
pub const DEFAULT_INTRA_BAR_STEPS: usize = 4;

/// Mean synthetic volume of a one-minute bar
const BASE_VOLUME: f64 = 500.0;

/// Longest bar accepted; longer durations are clamped (one week)
pub const MAX_BAR_SECONDS: i64 = 7 * 86_400;

/// Expands a reference price into a candle history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleSynthesizer {
    minute_volatility: f64,
    intra_bar_steps: usize,
    fallback_price: Price,
}

impl CandleSynthesizer {
    /// Create a synthesizer
    pub fn new(minute_volatility: f64, intra_bar_steps: usize, fallback_price: Price) -> Self {
        let fallback_price = if fallback_price.is_finite() && fallback_price > 0.0 {
            fallback_price
        } else {
            DEFAULT_BASE_PRICE
        };
        Self {
            minute_volatility: RandomWalk::new(minute_volatility).max_step(),
            intra_bar_steps: intra_bar_steps.max(1),
            fallback_price,
        }
    }

    /// Price substituted for a non-positive or non-finite reference
    pub fn fallback_price(&self) -> Price {
        self.fallback_price
    }

    /// Relative move bound of one bar; grows with the square root of its length
    pub fn bar_volatility(&self, bar_seconds: i64) -> f64 {
        let minutes = bar_seconds.max(1) as f64 / 60.0;
        self.minute_volatility * minutes.sqrt()
    }

    /// Synthesize `count` candles ending at the last completed bar before now
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        reference_price: Price,
        count: usize,
        bar_seconds: i64,
        rng: &mut R,
    ) -> Vec<Candle> {
        self.synthesize_at(reference_price, count, bar_seconds, Utc::now(), rng)
    }

    /// Synthesize against an explicit "now"
    ///
    /// The newest candle opens one bar before the boundary at or before
    /// `now`, so every returned bar is complete.
    pub fn synthesize_at<R: Rng + ?Sized>(
        &self,
        reference_price: Price,
        count: usize,
        bar_seconds: i64,
        now: Timestamp,
        rng: &mut R,
    ) -> Vec<Candle> {
        if count == 0 {
            return Vec::new();
        }

        let reference = if reference_price.is_finite() && reference_price > 0.0 {
            reference_price
        } else {
            log::warn!(
                "Reference price {} unusable, synthesizing from {}",
                reference_price,
                self.fallback_price
            );
            self.fallback_price
        };

        let bar_seconds = if bar_seconds <= 0 {
            log::warn!(
                "Bar duration {}s unusable, using {}s",
                bar_seconds,
                FALLBACK_BAR_SECONDS
            );
            FALLBACK_BAR_SECONDS
        } else if bar_seconds > MAX_BAR_SECONDS {
            log::warn!(
                "Bar duration {}s too long, clamping to {}s",
                bar_seconds,
                MAX_BAR_SECONDS
            );
            MAX_BAR_SECONDS
        } else {
            bar_seconds
        };

        let boundary = align_to_bar(now, bar_seconds).timestamp();
        let earliest = DateTime::<Utc>::MIN_UTC.timestamp();
        let representable = usize::try_from(boundary.saturating_sub(earliest) / bar_seconds)
            .unwrap_or(usize::MAX);
        let count = if count > representable {
            log::warn!(
                "Only {} of {} bars fit before the start of time; dropping the oldest",
                representable,
                count
            );
            representable
        } else {
            count
        };
        let span = bar_seconds.saturating_mul(count as i64);
        let first_open = boundary.saturating_sub(span);

        let bar_volatility = self.bar_volatility(bar_seconds);
        let step_walk = RandomWalk::new(bar_volatility / (self.intra_bar_steps as f64).sqrt());
        let volume_scale = (bar_seconds as f64 / 60.0).sqrt();

        let mut candles = Vec::with_capacity(count);
        let mut price = reference;

        for i in 0..count {
            let open_secs = first_open.saturating_add(bar_seconds.saturating_mul(i as i64));
            let Some(timestamp) = DateTime::<Utc>::from_timestamp(open_secs, 0) else {
                log::warn!("Bar {} falls outside the representable time range", i);
                continue;
            };

            let open = price;
            let mut high = open;
            let mut low = open;
            for _ in 0..self.intra_bar_steps {
                price = step_walk.step(price, rng);
                high = high.max(price);
                low = low.min(price);
            }
            let close = price;
            let volume = BASE_VOLUME * volume_scale * rng.gen_range(0.2..1.8);

            candles.push(Candle::new(timestamp, open, high, low, close, volume));
        }

        log::debug!(
            "Synthesized {} candles of {}s from {}",
            candles.len(),
            bar_seconds,
            reference
        );
        candles
    }
}

impl Default for CandleSynthesizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_MINUTE_VOLATILITY,
            DEFAULT_INTRA_BAR_STEPS,
            DEFAULT_BASE_PRICE,
        )
    }
}

/// Write candles as CSV with a header row
pub fn write_csv<W: io::Write>(candles: &[Candle], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for candle in candles {
        csv_writer.serialize(candle)?;
    }
    csv_writer.flush()?;
    Ok(())
}
