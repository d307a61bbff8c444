//! Investment plan catalog.
//!
//! Three fixed tiers, defined at startup and immutable for the process
//! lifetime. All tiers currently share the same rate and duration; only
//! the contribution bounds differ.

use crate::returns::{self, ReturnBreakdown};

/// A fixed investment tier.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentPlan {
    /// Stable identifier used in forms and URLs.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Minimum contribution in rubles.
    pub min_amount: f64,
    /// Maximum contribution in rubles.
    pub max_amount: f64,
    /// Daily return in percent.
    pub daily_return_percent: f64,
    /// Plan duration in working days.
    pub duration_days: u32,
}

/// The three fixed tiers.
pub static PLANS: [InvestmentPlan; 3] = [
    InvestmentPlan {
        id: "starter",
        name: "Стартовый",
        min_amount: 500.0,
        max_amount: 5_000.0,
        daily_return_percent: 50.0,
        duration_days: 3,
    },
    InvestmentPlan {
        id: "standard",
        name: "Стандарт",
        min_amount: 1_000.0,
        max_amount: 25_000.0,
        daily_return_percent: 50.0,
        duration_days: 3,
    },
    InvestmentPlan {
        id: "premium",
        name: "Премиум",
        min_amount: 5_000.0,
        max_amount: 100_000.0,
        daily_return_percent: 50.0,
        duration_days: 3,
    },
];

impl InvestmentPlan {
    /// Look up a plan by its stable id.
    #[must_use]
    pub fn by_id(id: &str) -> Option<&'static InvestmentPlan> {
        PLANS.iter().find(|p| p.id == id)
    }

    /// Whether the amount lies within this plan's contribution bounds.
    #[must_use]
    pub fn contains_amount(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }

    /// Compute the return breakdown for an amount invested in this plan.
    #[must_use]
    pub fn returns_for(&self, amount: f64) -> ReturnBreakdown {
        returns::calculate(amount, self.daily_return_percent, self.duration_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_id_finds_all_tiers() {
        for plan in &PLANS {
            assert_eq!(InvestmentPlan::by_id(plan.id), Some(plan));
        }
    }

    #[test]
    fn by_id_unknown_returns_none() {
        assert_eq!(InvestmentPlan::by_id("platinum"), None);
    }

    #[test]
    fn bounds_are_inclusive() {
        let starter = InvestmentPlan::by_id("starter").unwrap();
        assert!(starter.contains_amount(500.0));
        assert!(starter.contains_amount(5_000.0));
        assert!(!starter.contains_amount(499.99));
        assert!(!starter.contains_amount(5_000.01));
    }

    #[test]
    fn starter_rejects_amount_above_max() {
        let starter = InvestmentPlan::by_id("starter").unwrap();
        assert!(!starter.contains_amount(6_000.0));
    }
}
