//! Rolling indicators over candle closes and ranges

use crate::types::Candle;
use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Exponential Moving Average (EMA)
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    alpha: f64,
    current_ema: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create new EMA with given span
    pub fn new(span: usize) -> Self {
        let alpha = 2.0 / (span.max(1) as f64 + 1.0);
        Self {
            alpha,
            current_ema: None,
        }
    }

    /// Update with new value
    pub fn update(&mut self, value: f64) -> f64 {
        let ema = match self.current_ema {
            None => value,
            Some(prev_ema) => self.alpha * value + (1.0 - self.alpha) * prev_ema,
        };
        self.current_ema = Some(ema);
        ema
    }

    /// EMA of a whole series, `None` when empty
    pub fn last_of(span: usize, values: &[f64]) -> Option<f64> {
        let mut ema = Self::new(span);
        values.iter().map(|&v| ema.update(v)).last()
    }
}

/// Relative Strength Index (RSI), simple-average flavour
#[derive(Debug, Clone)]
pub struct RSI {
    period: usize,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    prev_value: Option<f64>,
}

impl RSI {
    /// Create new RSI with given period
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            gains: VecDeque::with_capacity(period),
            losses: VecDeque::with_capacity(period),
            prev_value: None,
        }
    }

    /// Update with new value and compute RSI
    pub fn update(&mut self, value: f64) -> Option<f64> {
        let prev = self.prev_value.replace(value)?;
        let change = value - prev;
        self.gains.push_back(change.max(0.0));
        self.losses.push_back((-change).max(0.0));

        if self.gains.len() > self.period {
            self.gains.pop_front();
            self.losses.pop_front();
        }

        if self.gains.len() < self.period {
            return None;
        }

        let avg_gain = self.gains.iter().sum::<f64>() / self.period as f64;
        let avg_loss = self.losses.iter().sum::<f64>() / self.period as f64;

        if avg_loss == 0.0 {
            return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }

    /// RSI at the end of a series
    pub fn last_of(period: usize, values: &[f64]) -> Option<f64> {
        let mut rsi = Self::new(period);
        values.iter().fold(None, |_, &v| rsi.update(v))
    }
}

/// Closing prices of a candle slice
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Mean high-low range of the last `window` candles
pub fn average_range(candles: &[Candle], window: usize) -> Option<f64> {
    if window == 0 || candles.len() < window {
        return None;
    }
    let ranges = candles[candles.len() - window..].iter().map(|c| c.range());
    Some(ranges.mean())
}

/// Net close-to-close move across the last `window` bars
pub fn net_change(candles: &[Candle], window: usize) -> Option<f64> {
    if window == 0 || candles.len() <= window {
        return None;
    }
    let last = candles[candles.len() - 1].close;
    let anchor = candles[candles.len() - 1 - window].close;
    Some(last - anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut open = closes[0];
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let candle = Candle::new(
                    start + Duration::minutes(i as i64),
                    open,
                    open.max(close) + 0.001,
                    open.min(close) - 0.001,
                    close,
                    100.0,
                );
                open = close;
                candle
            })
            .collect()
    }

    #[test]
    fn test_ema_seeds_with_first_value() {
        let mut ema = ExponentialMovingAverage::new(3);
        assert_eq!(ema.update(10.0), 10.0);
        assert_relative_eq!(ema.update(20.0), 15.0);
        assert_eq!(ExponentialMovingAverage::last_of(3, &[]), None);
    }

    #[test]
    fn test_rsi_extremes() {
        let rising: Vec<f64> = (0..20).map(|i| 1.0 + i as f64 * 0.01).collect();
        assert_relative_eq!(RSI::last_of(14, &rising).unwrap(), 100.0);

        let falling: Vec<f64> = rising.iter().rev().copied().collect();
        assert_relative_eq!(RSI::last_of(14, &falling).unwrap(), 0.0);

        let flat = vec![1.0; 20];
        assert_relative_eq!(RSI::last_of(14, &flat).unwrap(), 50.0);

        assert_eq!(RSI::last_of(14, &rising[..10]), None);
    }

    #[test]
    fn test_candle_helpers() {
        let candles = candles_from_closes(&[1.0, 1.1, 1.2, 1.15, 1.3]);

        assert_relative_eq!(net_change(&candles, 2).unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(net_change(&candles, 5), None);

        let avg = average_range(&candles, 2).unwrap();
        assert_relative_eq!(avg, (0.05 + 0.002 + 0.15 + 0.002) / 2.0, epsilon = 1e-12);

        assert_eq!(closes(&candles).len(), 5);
    }
}
