//! Scoring policies
//!
//! The thresholds and weights here are arbitrary heuristics, so they sit
//! behind [`ScoringPolicy`] and can be swapped without touching the scorer.

use super::indicators::{self, ExponentialMovingAverage, RSI};
use super::Finding;
use crate::error::{Result, SimError};
use crate::market::PriceState;
use crate::types::Candle;
use serde::{Deserialize, Serialize};

/// Combined score of one assessment plus the findings behind it
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Signed score, positive leans CALL
    pub score: f64,
    /// Minimum |score| for a call
    pub threshold: f64,
    /// |score| at which confidence reaches 1.0
    pub saturation: f64,
    pub findings: Vec<Finding>,
}

impl Assessment {
    /// Check if the score clears the threshold
    pub fn is_actionable(&self) -> bool {
        self.score.is_finite() && self.score.abs() > self.threshold
    }

    /// How far the score clears the threshold, scaled into `[0, 1]`
    pub fn confidence(&self) -> f64 {
        let headroom = self.saturation - self.threshold;
        if headroom <= 0.0 {
            return 1.0;
        }
        ((self.score.abs() - self.threshold) / headroom).clamp(0.0, 1.0)
    }
}

/// Replaceable scoring formula
pub trait ScoringPolicy: Send + Sync {
    /// Get policy name
    fn name(&self) -> &str;

    /// Fewest candles the policy can assess
    fn min_window(&self) -> usize;

    /// Score a candle history; `None` when it cannot be assessed
    ///
    /// Must be deterministic in its inputs.
    fn assess(&self, candles: &[Candle], live: Option<&PriceState>) -> Option<Assessment>;
}

impl<P: ScoringPolicy + ?Sized> ScoringPolicy for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn min_window(&self) -> usize {
        (**self).min_window()
    }

    fn assess(&self, candles: &[Candle], live: Option<&PriceState>) -> Option<Assessment> {
        (**self).assess(candles, live)
    }
}

/// Parameters of [`MomentumPolicy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumPolicyConfig {
    /// Bars of net close-to-close movement
    pub momentum_window: usize,
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub rsi_period: usize,
    /// Bars averaged for the high-low range
    pub range_window: usize,
    pub momentum_weight: f64,
    pub trend_weight: f64,
    pub rsi_weight: f64,
    pub live_weight: f64,
    /// Live change (in percent) that counts as a full-strength reading
    pub live_change_scale: f64,
    pub threshold: f64,
    pub saturation: f64,
}

impl Default for MomentumPolicyConfig {
    fn default() -> Self {
        Self {
            momentum_window: 14,
            fast_ema: 5,
            slow_ema: 20,
            rsi_period: 14,
            range_window: 14,
            momentum_weight: 0.4,
            trend_weight: 0.3,
            rsi_weight: 0.2,
            live_weight: 0.1,
            live_change_scale: 0.05,
            threshold: 0.2,
            saturation: 0.75,
        }
    }
}

impl MomentumPolicyConfig {
    /// Validate windows, weights and the threshold band
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("momentum_window", self.momentum_window),
            ("fast_ema", self.fast_ema),
            ("slow_ema", self.slow_ema),
            ("rsi_period", self.rsi_period),
            ("range_window", self.range_window),
        ];
        for (name, window) in windows {
            if window == 0 {
                return Err(SimError::ConfigError(format!("{} must be greater than 0", name)));
            }
        }
        if self.fast_ema >= self.slow_ema {
            return Err(SimError::ConfigError(format!(
                "fast_ema ({}) must be shorter than slow_ema ({})",
                self.fast_ema, self.slow_ema
            )));
        }

        let weights = [
            self.momentum_weight,
            self.trend_weight,
            self.rsi_weight,
            self.live_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimError::ConfigError(
                "indicator weights must be finite and non-negative".to_string(),
            ));
        }
        if !(self.live_change_scale.is_finite() && self.live_change_scale > 0.0) {
            return Err(SimError::ConfigError(
                "live_change_scale must be positive".to_string(),
            ));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(SimError::ConfigError("threshold must be non-negative".to_string()));
        }
        if !(self.saturation.is_finite() && self.saturation > self.threshold) {
            return Err(SimError::ConfigError(format!(
                "saturation ({}) must exceed threshold ({})",
                self.saturation, self.threshold
            )));
        }
        Ok(())
    }
}

/// Momentum-following blend of four bounded readings
///
/// Each reading is squashed with `tanh` into `[-1, 1]` and weighted:
/// normalized net momentum, fast/slow EMA spread, RSI bias and the live
/// tick change. Average range is reported but does not vote.
#[derive(Debug, Clone, Default)]
pub struct MomentumPolicy {
    config: MomentumPolicyConfig,
}

impl MomentumPolicy {
    pub fn new(config: MomentumPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MomentumPolicyConfig {
        &self.config
    }
}

fn leaning(value: f64, up: &str, down: &str) -> String {
    if value > 0.0 {
        up.to_string()
    } else if value < 0.0 {
        down.to_string()
    } else {
        "neutral".to_string()
    }
}

impl ScoringPolicy for MomentumPolicy {
    fn name(&self) -> &str {
        "momentum"
    }

    fn min_window(&self) -> usize {
        let c = &self.config;
        c.slow_ema
            .max(c.momentum_window + 1)
            .max(c.rsi_period + 1)
            .max(c.range_window)
    }

    fn assess(&self, candles: &[Candle], live: Option<&PriceState>) -> Option<Assessment> {
        let c = &self.config;
        if candles.len() < self.min_window() {
            return None;
        }

        let last_close = candles.last()?.close;
        let avg_range = indicators::average_range(candles, c.range_window)?;
        let scale = avg_range.max(last_close.abs() * 1e-9);
        if !(scale.is_finite() && scale > 0.0) {
            return None;
        }

        let closes = indicators::closes(candles);
        let mut findings = Vec::with_capacity(5);

        let net = indicators::net_change(candles, c.momentum_window)?;
        let momentum = net / (scale * (c.momentum_window as f64).sqrt());
        findings.push(Finding::new(
            "momentum",
            momentum,
            c.momentum_weight * momentum.tanh(),
            format!(
                "net {:+.5} over {} bars, {}",
                net,
                c.momentum_window,
                leaning(net, "rising", "falling")
            ),
        ));

        let fast = ExponentialMovingAverage::last_of(c.fast_ema, &closes)?;
        let slow = ExponentialMovingAverage::last_of(c.slow_ema, &closes)?;
        let spread = (fast - slow) / scale;
        findings.push(Finding::new(
            "ema_trend",
            spread,
            c.trend_weight * spread.tanh(),
            format!(
                "EMA{} {} EMA{}",
                c.fast_ema,
                leaning(fast - slow, "above", "below"),
                c.slow_ema
            ),
        ));

        let rsi = RSI::last_of(c.rsi_period, &closes)?;
        let rsi_bias = (rsi - 50.0) / 50.0;
        findings.push(Finding::new(
            "rsi",
            rsi,
            c.rsi_weight * rsi_bias,
            format!(
                "RSI{} at {:.1}, {}",
                c.rsi_period,
                rsi,
                leaning(rsi_bias, "bullish pressure", "bearish pressure")
            ),
        ));

        if let Some(state) = live {
            let change = if state.change_percent.is_finite() {
                state.change_percent
            } else {
                0.0
            };
            let reading = change / c.live_change_scale;
            findings.push(Finding::new(
                "live_change",
                change,
                c.live_weight * reading.tanh(),
                format!("last tick {:+.4}%", change),
            ));
        }

        findings.push(Finding::new(
            "volatility",
            avg_range,
            0.0,
            format!(
                "average range {:.5} ({:.3}% of price) over {} bars",
                avg_range,
                avg_range / last_close * 100.0,
                c.range_window
            ),
        ));

        let score: f64 = findings.iter().map(|f| f.contribution).sum();
        Some(Assessment {
            score,
            threshold: c.threshold,
            saturation: c.saturation,
            findings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MomentumPolicyConfig::default().validate().is_ok());
        assert_eq!(MomentumPolicy::default().min_window(), 20);
    }

    #[test]
    fn test_config_validation() {
        let mut config = MomentumPolicyConfig::default();
        config.fast_ema = 30;
        assert!(config.validate().is_err());

        let mut config = MomentumPolicyConfig::default();
        config.saturation = config.threshold;
        assert!(config.validate().is_err());

        let mut config = MomentumPolicyConfig::default();
        config.rsi_weight = -0.1;
        assert!(config.validate().is_err());

        let mut config = MomentumPolicyConfig::default();
        config.range_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_assessment_confidence() {
        let assessment = Assessment {
            score: -0.475,
            threshold: 0.2,
            saturation: 0.75,
            findings: Vec::new(),
        };
        assert!(assessment.is_actionable());
        assert_relative_eq!(assessment.confidence(), 0.5, epsilon = 1e-12);

        let weak = Assessment {
            score: 0.1,
            ..assessment.clone()
        };
        assert!(!weak.is_actionable());
        assert_eq!(weak.confidence(), 0.0);

        let huge = Assessment {
            score: 9.0,
            ..assessment
        };
        assert_eq!(huge.confidence(), 1.0);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: MomentumPolicyConfig = toml::from_str("threshold = 0.3").unwrap();
        assert_eq!(config.threshold, 0.3);
        assert_eq!(config.slow_ema, 20);
    }
}
