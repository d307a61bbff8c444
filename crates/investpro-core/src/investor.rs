//! Investor records and investments.
//!
//! An [`InvestorRecord`] is what the registry persists under an access
//! code and what the session hands back at login. Records are write-once:
//! created at issuance, read back verbatim afterwards. All persisted types
//! serialize with the field names the original store used.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::returns;

/// Lifecycle of a single investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    /// Still accruing daily profit.
    Active,
    /// Ran its full duration.
    Completed,
}

/// One contribution under a plan, owned exclusively by its parent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// Unique id.
    pub id: Uuid,
    /// Display name of the plan.
    pub plan: String,
    /// Contributed amount in rubles.
    pub amount: f64,
    /// Daily return in percent.
    #[serde(rename = "dailyReturn")]
    pub daily_return_percent: f64,
    /// Plan duration in working days.
    #[serde(rename = "duration")]
    pub duration_days: u32,
    /// First accrual day.
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    /// Payout day.
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    /// Expected payout (amount plus total profit).
    #[serde(rename = "totalReturn")]
    pub total_return: f64,
    /// Current lifecycle state.
    pub status: InvestmentStatus,
    /// Working days remaining until payout.
    #[serde(rename = "daysLeft")]
    pub days_left: u32,
}

impl Investment {
    /// Working days already accrued.
    #[must_use]
    pub fn completed_days(&self) -> u32 {
        self.duration_days.saturating_sub(self.days_left)
    }

    /// Profit accrued so far, at the plan's daily rate.
    #[must_use]
    pub fn earned_profit(&self) -> f64 {
        let breakdown = returns::calculate(self.amount, self.daily_return_percent, self.duration_days);
        breakdown.daily_profit * f64::from(self.completed_days())
    }

    /// Progress toward payout, 0–100.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.duration_days == 0 {
            return 100.0;
        }
        f64::from(self.completed_days()) / f64::from(self.duration_days) * 100.0
    }
}

/// Stored profile of an investor: the value under `investors/<CODE>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorRecord {
    /// Client name.
    pub name: String,
    /// Sum of all contributions.
    #[serde(rename = "totalInvested")]
    pub total_invested: f64,
    /// Investments owned by this record.
    #[serde(rename = "activeInvestments")]
    pub active_investments: Vec<Investment>,
}

impl InvestorRecord {
    /// Profit accrued so far across all investments.
    #[must_use]
    pub fn accrued_profit(&self) -> f64 {
        self.active_investments.iter().map(Investment::earned_profit).sum()
    }

    /// Expected payout across all investments.
    #[must_use]
    pub fn expected_return(&self) -> f64 {
        self.active_investments.iter().map(|inv| inv.total_return).sum()
    }
}

/// Issuance details for a generated code: the value under `codes/<CODE>`.
///
/// Everything the operator needs to re-send the client hand-off message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeIssuance {
    /// The access code this issuance is bound to.
    pub code: String,
    /// Client name.
    pub name: String,
    /// Display name of the plan.
    pub plan: String,
    /// Contributed amount in rubles.
    pub amount: f64,
    /// Telegram handle for the hand-off message, if given.
    pub telegram: Option<String>,
    /// First accrual day.
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    /// Payout day.
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    /// Daily return in percent at issuance time.
    #[serde(rename = "dailyReturn")]
    pub daily_return_percent: f64,
    /// Expected payout (amount plus total profit).
    #[serde(rename = "totalReturn")]
    pub total_return: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn investment(days_left: u32) -> Investment {
        Investment {
            id: Uuid::new_v4(),
            plan: "Стандарт".to_owned(),
            amount: 10_000.0,
            daily_return_percent: 50.0,
            duration_days: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 7, 18).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 21).unwrap(),
            total_return: 25_000.0,
            status: InvestmentStatus::Active,
            days_left,
        }
    }

    #[test]
    fn earned_profit_accrues_per_completed_day() {
        assert_eq!(investment(3).earned_profit(), 0.0);
        assert_eq!(investment(2).earned_profit(), 5_000.0);
        assert_eq!(investment(0).earned_profit(), 15_000.0);
    }

    #[test]
    fn progress_tracks_completed_days() {
        assert_eq!(investment(3).progress_percent(), 0.0);
        assert_eq!(investment(1).progress_percent(), (2.0 / 3.0) * 100.0);
        assert_eq!(investment(0).progress_percent(), 100.0);
    }

    #[test]
    fn record_totals_sum_over_investments() {
        let record = InvestorRecord {
            name: "Иван Петров".to_owned(),
            total_invested: 20_000.0,
            active_investments: vec![investment(2), investment(0)],
        };
        assert_eq!(record.accrued_profit(), 5_000.0 + 15_000.0);
        assert_eq!(record.expected_return(), 50_000.0);
    }

    #[test]
    fn record_roundtrips_through_the_stored_field_names() {
        let record = InvestorRecord {
            name: "Мария Сидорова".to_owned(),
            total_invested: 50_000.0,
            active_investments: vec![investment(2)],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("totalInvested"));
        assert!(json.contains("activeInvestments"));
        assert!(json.contains("daysLeft"));
        let back: InvestorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
