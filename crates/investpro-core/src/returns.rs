//! Return calculator.
//!
//! One pure function used by every surface that quotes numbers: the
//! landing calculator, the checkout summary, the issuance message, and
//! the dashboard accrual figures. The formula is the system invariant:
//!
//! `final_payout = amount + amount * rate / 100 * duration`

use serde::{Deserialize, Serialize};

/// The computed returns for one contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnBreakdown {
    /// Profit accrued per working day.
    pub daily_profit: f64,
    /// Profit over the full duration.
    pub total_profit: f64,
    /// Contribution plus total profit.
    pub final_payout: f64,
}

/// Compute the return breakdown for an amount at a daily rate over a
/// duration.
///
/// Deterministic and stateless. Non-numeric or out-of-bounds amounts are
/// rejected at the form boundary before this is called.
#[must_use]
pub fn calculate(amount: f64, daily_return_percent: f64, duration_days: u32) -> ReturnBreakdown {
    let daily_profit = amount * daily_return_percent / 100.0;
    let total_profit = daily_profit * f64::from(duration_days);
    ReturnBreakdown {
        daily_profit,
        total_profit,
        final_payout: amount + total_profit,
    }
}
