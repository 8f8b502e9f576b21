//! # rusty_signal_sim
//!
//! Simulated FX/OTC price feeds, synthetic candle histories and heuristic
//! directional signals for a single display session.
//!
//! The engine is three pieces: a tick generator that random-walks one
//! price per instrument, a candle synthesizer that expands a price into an
//! OHLC history at any timeframe, and a signal scorer that reads that
//! history. All randomness comes from an injected, seedable RNG and all
//! market state is owned by the caller.
//!
//! ## Example
//!
//! ```rust
//! use rusty_signal_sim::prelude::*;
//! use chrono::Utc;
//!
//! let mut engine = MarketEngine::seeded(7);
//! let mut market = engine.initialize_market();
//! market = engine.advance_market(market);
//!
//! let candles = engine.candles_for("EUR/USD", Timeframe::M5, &market, Utc::now());
//! assert_eq!(candles.len(), 100);
//!
//! match engine.score_signal("EUR/USD", Timeframe::M5, &market, &candles) {
//!     Some(signal) => println!("{}", signal),
//!     None => println!("No clear signal"),
//! }
//! ```

pub mod candles;
pub mod config;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod market;
pub mod session;
pub mod signal;
pub mod timeframe;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::candles::CandleSynthesizer;
    pub use crate::config::SimulationConfig;
    pub use crate::engine::{timeframe_to_bar_seconds, MarketEngine};
    pub use crate::error::{Result, SimError};
    pub use crate::instrument::{Instrument, InstrumentCategory, ALL_CURRENCY_PAIRS};
    pub use crate::market::{MarketSnapshot, PriceState, SharedMarket, TickGenerator};
    pub use crate::session::{AnalysisOutcome, AnalysisRequest, AnalysisSession};
    pub use crate::signal::{
        score_signal, Direction, Finding, ScoringPolicy, Signal, SignalScorer, Strength,
    };
    pub use crate::timeframe::Timeframe;
    pub use crate::types::*;
}
