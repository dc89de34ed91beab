//! The machine's own coin reserve.
//!
//! Counts are kept per denomination and never go negative. Change is made
//! with a greedy, largest-denomination-first pass computed against a scratch
//! copy of the counts; nothing is removed from the till unless the whole
//! amount can be paid out.

use crate::coin::{Coin, Denomination};
use crate::decimal::Decimal2;
use crate::error::{Result, VendingError};
use log::debug;
use std::collections::BTreeMap;

/// Per-denomination coin stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinTill {
    counts: BTreeMap<Denomination, u32>,
}

/// Change assembled by the greedy pass but not yet taken out of the till.
///
/// Produced by [`CoinTill::plan_change`]. Dropping a plan leaves the till
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePlan {
    owed: Decimal2,
    take: Vec<(Denomination, u32)>,
}

impl ChangePlan {
    /// The amount this plan pays out.
    pub fn value(&self) -> Decimal2 {
        self.owed
    }

    /// The coins this plan pays out, highest denomination first.
    pub fn coins(&self) -> Vec<Coin> {
        self.take
            .iter()
            .flat_map(|&(denomination, count)| {
                std::iter::repeat(Coin::from(denomination)).take(count as usize)
            })
            .collect()
    }
}

impl CoinTill {
    /// Creates an empty till.
    pub fn new() -> Self {
        CoinTill {
            counts: BTreeMap::new(),
        }
    }

    /// Creates a till holding `per_denomination` coins of every denomination.
    pub fn with_uniform_stock(per_denomination: u32) -> Self {
        CoinTill {
            counts: Denomination::ALL
                .into_iter()
                .map(|d| (d, per_denomination))
                .collect(),
        }
    }

    /// Number of coins held for `denomination`.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Counts for every denomination, smallest first.
    pub fn counts(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL.into_iter().map(|d| (d, self.count(d)))
    }

    /// Sum of `denomination × count` over the whole till.
    pub fn total_value(&self) -> Decimal2 {
        self.counts().map(|(d, count)| d.value() * count).sum()
    }

    /// Adds coins to the till. Always succeeds.
    pub fn deposit(&mut self, coins: Vec<Coin>) {
        for coin in &coins {
            *self.counts.entry(coin.denomination()).or_insert(0) += 1;
        }
        debug!("Till: deposited {} coins", coins.len());
    }

    /// Computes the greedy change for `owed` without touching the till.
    ///
    /// Fails with [`VendingError::ExactChangeOnly`] carrying the amount that
    /// could not be covered. The greedy pass can miss a combination a
    /// smarter search would find when small coins are short; that case is
    /// reported as `ExactChangeOnly` too.
    pub fn plan_change(&self, owed: Decimal2) -> Result<ChangePlan> {
        let mut remaining = owed;
        let mut take = Vec::new();

        for denomination in Denomination::ALL.into_iter().rev() {
            if !remaining.is_positive() {
                break;
            }
            let wanted = remaining.whole_multiples_of(denomination.value());
            let count = wanted.min(self.count(denomination));
            if count > 0 {
                remaining -= denomination.value() * count;
                take.push((denomination, count));
            }
        }

        if remaining.is_positive() {
            debug!("Till: cannot assemble {} (short by {})", owed, remaining);
            return Err(VendingError::ExactChangeOnly { remaining });
        }

        Ok(ChangePlan { owed, take })
    }

    /// Removes the coins of a plan made against this till and returns them.
    pub(crate) fn commit(&mut self, plan: &ChangePlan) -> Vec<Coin> {
        for &(denomination, count) in &plan.take {
            let held = self.counts.entry(denomination).or_insert(0);
            debug_assert!(*held >= count, "change plan is stale");
            *held = held.saturating_sub(count);
        }
        debug!("Till: paid out {} in change", plan.owed);
        plan.coins()
    }

    /// Assembles `owed` from the till and removes those coins.
    ///
    /// All-or-nothing: on failure no count is modified.
    pub fn withdraw_exact_change(&mut self, owed: Decimal2) -> Result<Vec<Coin>> {
        let plan = self.plan_change(owed)?;
        Ok(self.commit(&plan))
    }
}
