//! Price tick generator

use super::state::{MarketSnapshot, PriceState};
use super::walk::RandomWalk;
use crate::instrument::{self, DEFAULT_BASE_PRICE};
use rand::Rng;

/// Default bound of one tick, ±0.05% of the current price
pub const DEFAULT_MAX_TICK_STEP: f64 = 0.0005;

/// Produces the next price state of an instrument from its previous one
#[derive(Debug, Clone, Copy)]
pub struct TickGenerator {
    walk: RandomWalk,
}

impl TickGenerator {
    /// Create a generator whose steps stay within `±max_step` (relative)
    pub fn new(max_step: f64) -> Self {
        Self {
            walk: RandomWalk::new(max_step),
        }
    }

    /// The underlying random walk
    pub fn walk(&self) -> RandomWalk {
        self.walk
    }

    /// Seed a fresh state around the instrument's category base price
    pub fn seed<R: Rng + ?Sized>(&self, symbol: &str, rng: &mut R) -> PriceState {
        let jitter = instrument::category_of(symbol).seed_jitter();
        let base = instrument::base_price(symbol);
        let price = base * (1.0 + rng.gen_range(-jitter..=jitter));
        let price = if price.is_finite() && price > 0.0 {
            price
        } else {
            DEFAULT_BASE_PRICE
        };
        log::debug!("Seeded {} at {}", symbol, price);
        PriceState::seeded(price)
    }

    /// Next state for one instrument; `None` or a corrupt state reseeds
    pub fn next_state<R: Rng + ?Sized>(
        &self,
        symbol: &str,
        previous: Option<&PriceState>,
        rng: &mut R,
    ) -> PriceState {
        match previous.filter(|state| state.is_valid()) {
            Some(state) => state.advanced(self.walk.step(state.price, rng)),
            None => {
                if previous.is_some() {
                    log::warn!("Discarding invalid state for {}; reseeding", symbol);
                }
                self.seed(symbol, rng)
            }
        }
    }

    /// Seed every symbol of the universe
    pub fn initialize_market<R, S>(&self, symbols: &[S], rng: &mut R) -> MarketSnapshot
    where
        R: Rng + ?Sized,
        S: AsRef<str>,
    {
        let snapshot: MarketSnapshot = symbols
            .iter()
            .map(|symbol| {
                let symbol = symbol.as_ref();
                (symbol.to_string(), self.seed(symbol, rng))
            })
            .collect();
        log::info!("Initialized market with {} instruments", snapshot.len());
        snapshot
    }

    /// Advance exactly one instrument in place, seeding it if absent
    pub fn advance_instrument<R: Rng + ?Sized>(
        &self,
        snapshot: &mut MarketSnapshot,
        symbol: &str,
        rng: &mut R,
    ) -> PriceState {
        let previous = snapshot.get(symbol);
        let next = self.next_state(symbol, previous.as_ref(), rng);
        snapshot.insert(symbol, next);
        next
    }

    /// One tick cycle: every instrument advances once
    pub fn advance_market<R: Rng + ?Sized>(
        &self,
        snapshot: MarketSnapshot,
        rng: &mut R,
    ) -> MarketSnapshot {
        let next: MarketSnapshot = snapshot
            .into_iter()
            .map(|(symbol, state)| {
                let state = self.next_state(&symbol, Some(&state), rng);
                (symbol, state)
            })
            .collect();
        log::debug!("Advanced {} instruments", next.len());
        next
    }
}

impl Default for TickGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TICK_STEP)
    }
}
