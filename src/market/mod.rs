//! Simulated market: price states, the tick generator and the shared store

pub mod state;
pub mod store;
pub mod tick;
pub mod walk;

pub use state::{MarketSnapshot, PriceState};
pub use store::SharedMarket;
pub use tick::{TickGenerator, DEFAULT_MAX_TICK_STEP};
pub use walk::RandomWalk;
