//! Shared price store for hosts with concurrent readers
//!
//! A single producer applies tick cycles; readers copy a consistent view
//! under the read lock so no read ever straddles a tick.

use super::state::{MarketSnapshot, PriceState};
use super::tick::TickGenerator;
use rand::Rng;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to one market snapshot
#[derive(Debug, Clone, Default)]
pub struct SharedMarket {
    inner: Arc<RwLock<MarketSnapshot>>,
}

impl SharedMarket {
    /// Wrap an initialized snapshot
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MarketSnapshot> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MarketSnapshot> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Consistent copy of one instrument's state
    pub fn instrument(&self, symbol: &str) -> Option<PriceState> {
        self.read().get(symbol)
    }

    /// Consistent copy of the whole market
    pub fn snapshot(&self) -> MarketSnapshot {
        self.read().clone()
    }

    /// Apply one tick cycle to every instrument
    pub fn tick<R: Rng + ?Sized>(&self, generator: &TickGenerator, rng: &mut R) {
        let mut guard = self.write();
        let current = std::mem::take(&mut *guard);
        *guard = generator.advance_market(current, rng);
    }

    /// Number of instruments held
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if store holds no instruments
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
