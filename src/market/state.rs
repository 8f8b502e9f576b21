//! Per-instrument price state and the market snapshot

use crate::types::{Price, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live price state of one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceState {
    pub price: Price,
    pub previous_price: Price,
    /// `price - previous_price`
    pub change: f64,
    /// `change / previous_price * 100`
    pub change_percent: f64,
    /// Running maximum over the session
    pub high: Price,
    /// Running minimum over the session
    pub low: Price,
}

impl PriceState {
    /// Fresh state at `price` with no history
    pub fn seeded(price: Price) -> Self {
        Self {
            price,
            previous_price: price,
            change: 0.0,
            change_percent: 0.0,
            high: price,
            low: price,
        }
    }

    /// The state after moving to `next`, extending the running extrema
    pub fn advanced(&self, next: Price) -> Self {
        let change = next - self.price;
        Self {
            price: next,
            previous_price: self.price,
            change,
            change_percent: change / self.price * 100.0,
            high: self.high.max(next),
            low: self.low.min(next),
        }
    }

    /// Positive finite price within `[low, high]`
    pub fn is_valid(&self) -> bool {
        self.price.is_finite()
            && self.price > 0.0
            && self.low <= self.price
            && self.price <= self.high
    }

    /// Session range (high - low)
    pub fn range(&self) -> Price {
        self.high - self.low
    }
}

/// Price states of every simulated instrument, keyed by symbol
///
/// Owned by the caller and threaded through each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    states: BTreeMap<Symbol, PriceState>,
}

impl MarketSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of one instrument's state
    pub fn get(&self, symbol: &str) -> Option<PriceState> {
        self.states.get(symbol).copied()
    }

    /// Current price of one instrument
    pub fn price(&self, symbol: &str) -> Option<Price> {
        self.states.get(symbol).map(|s| s.price)
    }

    /// Insert or replace an instrument's state
    pub fn insert(&mut self, symbol: impl Into<Symbol>, state: PriceState) {
        self.states.insert(symbol.into(), state);
    }

    /// Check if instrument is present
    pub fn contains(&self, symbol: &str) -> bool {
        self.states.contains_key(symbol)
    }

    /// Iterate states in symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &PriceState)> {
        self.states.iter()
    }

    /// Symbols in the snapshot
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.states.keys()
    }

    /// Number of instruments
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if snapshot holds no instruments
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(Symbol, PriceState)> for MarketSnapshot {
    fn from_iter<I: IntoIterator<Item = (Symbol, PriceState)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MarketSnapshot {
    type Item = (Symbol, PriceState);
    type IntoIter = std::collections::btree_map::IntoIter<Symbol, PriceState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}
