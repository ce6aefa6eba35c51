// Resource ledger: who pays for placements.
//
// The placement session never reaches into global resource state. It is
// handed a `&mut dyn ResourceLedger` for the duration of a poll and calls
// `has_sufficient()` / `deduct()` when a commit is attempted, and `credit()`
// to roll a deduction back if the occupancy insert then fails. `Inventory`
// is the stock in-memory implementation that `ColonyState` owns; hosts with
// their own economy can implement the trait instead.
//
// See also: `session.rs` for the commit transaction, `structure.rs` for
// how a definition's cost scales with a dragged rectangle.

use crate::types::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource amounts keyed by kind. BTreeMap for stable iteration and
/// stable JSON output.
pub type Costs = BTreeMap<ResourceKind, u64>;

/// Multiply every amount by `factor`, saturating.
pub fn scale_costs(costs: &Costs, factor: u64) -> Costs {
    costs
        .iter()
        .map(|(&kind, &amount)| (kind, amount.saturating_mul(factor)))
        .collect()
}

/// `percent` of every amount, rounded down. Zero results are dropped.
pub fn percent_of(costs: &Costs, percent: u32) -> Costs {
    costs
        .iter()
        .map(|(&kind, &amount)| (kind, amount.saturating_mul(percent as u64) / 100))
        .filter(|&(_, amount)| amount > 0)
        .collect()
}

/// Anything that can pay for structures.
pub trait ResourceLedger {
    /// Whether every listed amount is currently available.
    fn has_sufficient(&self, costs: &Costs) -> bool;

    /// Remove every listed amount. Returns `false` and changes nothing if
    /// any amount is unavailable.
    fn deduct(&mut self, costs: &Costs) -> bool;

    /// Add every listed amount (rollback or refund).
    fn credit(&mut self, costs: &Costs);
}

/// A plain stockpile of resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    amounts: BTreeMap<ResourceKind, u64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_amounts(amounts: Costs) -> Self {
        Self { amounts }
    }

    pub fn amount(&self, kind: ResourceKind) -> u64 {
        self.amounts.get(&kind).copied().unwrap_or(0)
    }
}

impl ResourceLedger for Inventory {
    fn has_sufficient(&self, costs: &Costs) -> bool {
        costs
            .iter()
            .all(|(&kind, &needed)| self.amount(kind) >= needed)
    }

    fn deduct(&mut self, costs: &Costs) -> bool {
        if !self.has_sufficient(costs) {
            return false;
        }
        for (&kind, &needed) in costs {
            let entry = self.amounts.entry(kind).or_insert(0);
            *entry -= needed;
        }
        true
    }

    fn credit(&mut self, costs: &Costs) {
        for (&kind, &amount) in costs {
            let entry = self.amounts.entry(kind).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iron(n: u64) -> Costs {
        Costs::from([(ResourceKind::Iron, n)])
    }

    #[test]
    fn deduct_exact_amount_leaves_zero() {
        let mut inv = Inventory::from_amounts(iron(10));
        assert!(inv.has_sufficient(&iron(10)));
        assert!(inv.deduct(&iron(10)));
        assert_eq!(inv.amount(ResourceKind::Iron), 0);
    }

    #[test]
    fn failed_deduct_changes_nothing() {
        let mut inv = Inventory::from_amounts(Costs::from([
            (ResourceKind::Iron, 50),
            (ResourceKind::Copper, 1),
        ]));
        let costs = Costs::from([(ResourceKind::Iron, 10), (ResourceKind::Copper, 5)]);
        assert!(!inv.deduct(&costs));
        assert_eq!(inv.amount(ResourceKind::Iron), 50);
        assert_eq!(inv.amount(ResourceKind::Copper), 1);
    }

    #[test]
    fn credit_restores_a_deduction() {
        let mut inv = Inventory::from_amounts(iron(30));
        assert!(inv.deduct(&iron(12)));
        inv.credit(&iron(12));
        assert_eq!(inv, Inventory::from_amounts(iron(30)));
    }

    #[test]
    fn missing_resource_counts_as_zero() {
        let inv = Inventory::new();
        assert!(inv.has_sufficient(&Costs::new()));
        assert!(!inv.has_sufficient(&iron(1)));
    }

    #[test]
    fn scaling_and_percentages() {
        let costs = Costs::from([(ResourceKind::Iron, 5), (ResourceKind::Silicon, 1)]);
        assert_eq!(
            scale_costs(&costs, 6),
            Costs::from([(ResourceKind::Iron, 30), (ResourceKind::Silicon, 6)])
        );
        // 50% of 1 rounds down to zero and is dropped.
        assert_eq!(percent_of(&costs, 50), iron(2));
    }
}
