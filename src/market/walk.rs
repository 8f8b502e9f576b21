//! Bounded multiplicative random walk shared by ticks and candles

use crate::types::Price;
use rand::Rng;

/// Largest relative step accepted by [`RandomWalk::new`]
pub const MAX_STEP_CAP: f64 = 0.5;

/// Zero-centred uniform relative perturbation within `±max_step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalk {
    max_step: f64,
}

impl RandomWalk {
    /// Create a walk with the given bound; non-finite bounds collapse to zero
    pub fn new(max_step: f64) -> Self {
        let max_step = if max_step.is_finite() {
            max_step.abs().min(MAX_STEP_CAP)
        } else {
            0.0
        };
        Self { max_step }
    }

    /// Relative bound of one step
    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Draw a relative perturbation in `[-max_step, max_step]`
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max_step == 0.0 {
            return 0.0;
        }
        rng.gen_range(-self.max_step..=self.max_step)
    }

    /// Advance `price` by one random step
    pub fn step<R: Rng + ?Sized>(&self, price: Price, rng: &mut R) -> Price {
        let relative = self.draw(rng);
        Self::apply(price, relative)
    }

    /// Apply a relative move, keeping the old price if the result is unusable
    pub fn apply(price: Price, relative: f64) -> Price {
        let candidate = price * (1.0 + relative);
        if candidate.is_finite() && candidate > 0.0 {
            candidate
        } else {
            log::warn!(
                "Rejected random-walk move {} from {}; holding price",
                relative,
                price
            );
            price
        }
    }
}
