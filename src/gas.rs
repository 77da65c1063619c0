//! Gas budget for one block.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("gas limit reached: requested {requested}, remaining {remaining}")]
pub struct GasLimitReached {
    pub requested: u64,
    pub remaining: u64,
}

/// Remaining gas available to the transactions of a single block.
/// Seeded once from the header's gas limit; single-owner, never shared
/// across blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasPool(u64);

impl GasPool {
    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub fn add_gas(&mut self, amount: u64) -> &mut Self {
        self.0 = self.0.saturating_add(amount);
        self
    }

    /// Take `amount` from the pool. Fails without mutating if the pool
    /// holds less; the counter can never go negative.
    pub fn sub_gas(&mut self, amount: u64) -> Result<(), GasLimitReached> {
        if amount > self.0 {
            return Err(GasLimitReached {
                requested: amount,
                remaining: self.0,
            });
        }
        self.0 -= amount;
        Ok(())
    }

    pub fn remaining(&self) -> u64 {
        self.0
    }
}
