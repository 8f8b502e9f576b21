//! Engine-facing interface consumed by the presentation layer
//!
//! [`MarketEngine`] owns the injected RNG and the three engine components.
//! Market state is never held here: callers own the [`MarketSnapshot`] and
//! pass it through each call.

use crate::candles::CandleSynthesizer;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::instrument::{self, ALL_CURRENCY_PAIRS};
use crate::market::{MarketSnapshot, PriceState, TickGenerator};
use crate::signal::{MomentumPolicy, ScoringPolicy, Signal, SignalScorer};
use crate::timeframe::Timeframe;
use crate::types::{Candle, Price, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use crate::timeframe::timeframe_to_bar_seconds;

/// Market simulation and signal engine
pub struct MarketEngine<R: Rng = StdRng> {
    config: SimulationConfig,
    rng: R,
    ticks: TickGenerator,
    candles: CandleSynthesizer,
    scorer: SignalScorer<Box<dyn ScoringPolicy>>,
}

impl MarketEngine<StdRng> {
    /// Create an engine seeded from the config, or from entropy
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Engine with default config and a fixed seed
    pub fn seeded(seed: u64) -> Self {
        let config = SimulationConfig::default().with_seed(seed);
        let policy = MomentumPolicy::new(config.scoring.clone());
        Self::assemble(config, StdRng::seed_from_u64(seed), Box::new(policy))
    }
}

impl<R: Rng> MarketEngine<R> {
    /// Create an engine around an injected random source
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let policy = MomentumPolicy::new(config.scoring.clone());
        Ok(Self::assemble(config, rng, Box::new(policy)))
    }

    fn assemble(config: SimulationConfig, rng: R, policy: Box<dyn ScoringPolicy>) -> Self {
        Self {
            ticks: TickGenerator::new(config.max_tick_step),
            candles: CandleSynthesizer::new(
                config.minute_volatility,
                config.intra_bar_steps,
                config.fallback_price,
            ),
            scorer: SignalScorer::new(policy),
            config,
            rng,
        }
    }

    /// Swap the scoring policy
    pub fn with_policy(mut self, policy: impl ScoringPolicy + 'static) -> Self {
        self.scorer = SignalScorer::new(Box::new(policy));
        self
    }

    /// Get the active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Mutable access to the random source, for caller-side draws
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Symbols simulated by this engine
    pub fn universe(&self) -> Vec<String> {
        if self.config.instruments.is_empty() {
            instrument::default_universe()
        } else {
            self.config.instruments.clone()
        }
    }

    /// Seed every instrument of the universe
    pub fn initialize_market(&mut self) -> MarketSnapshot {
        let universe = self.universe();
        self.ticks.initialize_market(universe.as_slice(), &mut self.rng)
    }

    /// One tick for all instruments
    pub fn advance_market(&mut self, snapshot: MarketSnapshot) -> MarketSnapshot {
        self.ticks.advance_market(snapshot, &mut self.rng)
    }

    /// Tick a single instrument in place, seeding it if unknown
    pub fn advance_instrument(&mut self, snapshot: &mut MarketSnapshot, symbol: &str) -> PriceState {
        self.ticks.advance_instrument(snapshot, symbol, &mut self.rng)
    }

    /// Synthesize a candle history ending before the current time
    pub fn synthesize_candles(
        &mut self,
        reference_price: Price,
        count: usize,
        bar_seconds: i64,
    ) -> Vec<Candle> {
        self.candles
            .synthesize(reference_price, count, bar_seconds, &mut self.rng)
    }

    /// Synthesize a candle history against an explicit "now"
    pub fn synthesize_candles_at(
        &mut self,
        reference_price: Price,
        count: usize,
        bar_seconds: i64,
        now: Timestamp,
    ) -> Vec<Candle> {
        self.candles
            .synthesize_at(reference_price, count, bar_seconds, now, &mut self.rng)
    }

    /// Reference price for a chart of `symbol`
    ///
    /// Falls back to the first catalog instrument, then to the configured
    /// fallback price.
    pub fn reference_price(&self, symbol: &str, snapshot: &MarketSnapshot) -> Price {
        let usable = |symbol: &str| snapshot.price(symbol).filter(|p| p.is_finite() && *p > 0.0);
        usable(symbol)
            .or_else(|| usable(ALL_CURRENCY_PAIRS[0]))
            .unwrap_or(self.config.fallback_price)
    }

    /// Chart candles for a selection, at the configured count
    pub fn candles_for(
        &mut self,
        symbol: &str,
        timeframe: Timeframe,
        snapshot: &MarketSnapshot,
        now: Timestamp,
    ) -> Vec<Candle> {
        let reference = self.reference_price(symbol, snapshot);
        let count = self.config.candle_count;
        self.synthesize_candles_at(reference, count, timeframe.bar_seconds(), now)
    }

    /// Score a signal; pure in its arguments
    pub fn score_signal(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        snapshot: &MarketSnapshot,
        candles: &[Candle],
    ) -> Option<Signal> {
        self.scorer.score(symbol, timeframe, snapshot, candles)
    }

    /// Synthesize fresh candles for the selection and score them
    pub fn analyze(
        &mut self,
        symbol: &str,
        timeframe: Timeframe,
        snapshot: &MarketSnapshot,
        now: Timestamp,
    ) -> Option<Signal> {
        let candles = self.candles_for(symbol, timeframe, snapshot, now);
        self.score_signal(symbol, timeframe, snapshot, &candles)
    }
}
