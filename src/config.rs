//! Simulation configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.

use crate::candles::{DEFAULT_CANDLE_COUNT, DEFAULT_INTRA_BAR_STEPS, DEFAULT_MINUTE_VOLATILITY};
use crate::error::{Result, SimError};
use crate::instrument::DEFAULT_BASE_PRICE;
use crate::market::walk::MAX_STEP_CAP;
use crate::market::DEFAULT_MAX_TICK_STEP;
use crate::signal::MomentumPolicyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables of the market simulation and the default scoring policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Seconds between tick cycles driven by the caller
    pub tick_interval_secs: u64,
    /// Candles per synthesized history
    pub candle_count: usize,
    /// Relative bound of one tick
    pub max_tick_step: f64,
    /// Relative volatility of a one-minute candle
    pub minute_volatility: f64,
    /// Intra-bar excursions per candle
    pub intra_bar_steps: usize,
    /// Reference price used when none is usable
    pub fallback_price: f64,
    /// Caller-side analysis delay range in milliseconds, `[min, max]`
    pub analysis_delay_ms: [u64; 2],
    /// Instruments to simulate; empty means the full catalog
    pub instruments: Vec<String>,
    pub scoring: MomentumPolicyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_secs: 3,
            candle_count: DEFAULT_CANDLE_COUNT,
            max_tick_step: DEFAULT_MAX_TICK_STEP,
            minute_volatility: DEFAULT_MINUTE_VOLATILITY,
            intra_bar_steps: DEFAULT_INTRA_BAR_STEPS,
            fallback_price: DEFAULT_BASE_PRICE,
            analysis_delay_ms: [800, 2300],
            instruments: Vec::new(),
            scoring: MomentumPolicyConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                let config = Self::from_toml_str(&contents)?;
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check ranges of every field
    pub fn validate(&self) -> Result<()> {
        let in_step_range = |v: f64| v.is_finite() && v >= 0.0 && v <= MAX_STEP_CAP;

        if self.tick_interval_secs == 0 {
            return Err(SimError::ConfigError(
                "tick_interval_secs must be greater than 0".to_string(),
            ));
        }
        if !in_step_range(self.max_tick_step) {
            return Err(SimError::ConfigError(format!(
                "max_tick_step must be within [0, {}], got {}",
                MAX_STEP_CAP, self.max_tick_step
            )));
        }
        if !in_step_range(self.minute_volatility) {
            return Err(SimError::ConfigError(format!(
                "minute_volatility must be within [0, {}], got {}",
                MAX_STEP_CAP, self.minute_volatility
            )));
        }
        if self.intra_bar_steps == 0 {
            return Err(SimError::ConfigError(
                "intra_bar_steps must be greater than 0".to_string(),
            ));
        }
        if !(self.fallback_price.is_finite() && self.fallback_price > 0.0) {
            return Err(SimError::ConfigError(format!(
                "fallback_price must be positive, got {}",
                self.fallback_price
            )));
        }
        let [min_delay, max_delay] = self.analysis_delay_ms;
        if min_delay > max_delay {
            return Err(SimError::ConfigError(format!(
                "analysis_delay_ms range is inverted: [{}, {}]",
                min_delay, max_delay
            )));
        }
        self.scoring.validate()
    }
}
