//! Illustrative dashboard data.
//!
//! The client dashboard renders a fixed set of sample transactions and
//! investments — purely demonstrative, never persisted, and not derived
//! from any investor record. Kept here so every surface shows the same
//! figures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WithdrawError;
use crate::investor::{Investment, InvestmentStatus};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Profit,
}

/// Processing state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
}

/// One row of the dashboard ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub status: TransactionStatus,
    pub date: NaiveDate,
    /// Payment or payout method, where one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Plan the entry relates to, where one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    pub description: String,
}

/// Headline figures for the account panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub name: String,
    pub email: String,
    pub balance: f64,
    #[serde(rename = "totalInvested")]
    pub total_invested: f64,
    #[serde(rename = "totalEarned")]
    pub total_earned: f64,
    #[serde(rename = "activeInvestments")]
    pub active_investments: u32,
}

/// An accepted withdrawal request, queued for processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: f64,
    /// Payout method (card, wallet).
    pub method: String,
    /// Card number or wallet id to pay out to.
    pub details: String,
    pub status: TransactionStatus,
}

/// Validate a withdrawal form against the account balance.
///
/// Amount and payout details are both mandatory; the amount must not
/// exceed the withdrawable balance. Accepted requests start out pending,
/// like the sample ledger's in-flight withdrawal.
///
/// # Errors
///
/// Returns [`WithdrawError::MissingField`] for an empty field and
/// [`WithdrawError::InsufficientFunds`] when the amount exceeds the
/// balance. Both are recoverable — the form is re-submitted.
pub fn withdraw_request(
    account: &AccountSummary,
    amount: Option<f64>,
    method: &str,
    details: &str,
) -> Result<WithdrawalRequest, WithdrawError> {
    let Some(amount) = amount else {
        return Err(WithdrawError::MissingField { field: "amount" });
    };
    if method.trim().is_empty() {
        return Err(WithdrawError::MissingField { field: "method" });
    }
    if details.trim().is_empty() {
        return Err(WithdrawError::MissingField { field: "details" });
    }
    if amount > account.balance {
        return Err(WithdrawError::InsufficientFunds {
            requested: amount,
            available: account.balance,
        });
    }
    Ok(WithdrawalRequest {
        amount,
        method: method.trim().to_owned(),
        details: details.trim().to_owned(),
        status: TransactionStatus::Pending,
    })
}

/// The demo account shown on the dashboard.
#[must_use]
pub fn sample_account() -> AccountSummary {
    AccountSummary {
        name: "Иван Петров".to_owned(),
        email: "ivan@example.com".to_owned(),
        balance: 15_750.0,
        total_invested: 50_000.0,
        total_earned: 8_250.0,
        active_investments: 3,
    }
}

/// The fixed sample ledger.
#[must_use]
pub fn sample_transactions() -> Vec<Transaction> {
    let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        Transaction {
            id: 1,
            kind: TransactionKind::Deposit,
            amount: 10_000.0,
            status: TransactionStatus::Completed,
            date: ymd(2024, 7, 18),
            method: Some("ЮKassa".to_owned()),
            plan: Some("Стандарт".to_owned()),
            description: "Пополнение через ЮKassa".to_owned(),
        },
        Transaction {
            id: 2,
            kind: TransactionKind::Profit,
            amount: 500.0,
            status: TransactionStatus::Completed,
            date: ymd(2024, 7, 19),
            method: None,
            plan: None,
            description: "Дневная прибыль (План: Стандарт)".to_owned(),
        },
        Transaction {
            id: 3,
            kind: TransactionKind::Withdrawal,
            amount: 2_500.0,
            status: TransactionStatus::Completed,
            date: ymd(2024, 7, 19),
            method: Some("СберБанк".to_owned()),
            plan: None,
            description: "Вывод на карту СберБанк".to_owned(),
        },
        Transaction {
            id: 4,
            kind: TransactionKind::Deposit,
            amount: 25_000.0,
            status: TransactionStatus::Completed,
            date: ymd(2024, 7, 20),
            method: Some("Тинькофф".to_owned()),
            plan: Some("Премиум".to_owned()),
            description: "Пополнение через Тинькофф".to_owned(),
        },
        Transaction {
            id: 5,
            kind: TransactionKind::Profit,
            amount: 1_250.0,
            status: TransactionStatus::Completed,
            date: ymd(2024, 7, 20),
            method: None,
            plan: None,
            description: "Дневная прибыль (План: Премиум)".to_owned(),
        },
        Transaction {
            id: 6,
            kind: TransactionKind::Withdrawal,
            amount: 5_000.0,
            status: TransactionStatus::Pending,
            date: ymd(2024, 7, 20),
            method: Some("ЮMoney".to_owned()),
            plan: None,
            description: "Вывод на ЮMoney кошелек".to_owned(),
        },
    ]
}

/// The fixed sample investments, payouts computed through the calculator.
#[must_use]
pub fn sample_investments() -> Vec<Investment> {
    let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        Investment {
            id: Uuid::new_v4(),
            plan: "Стандарт".to_owned(),
            amount: 10_000.0,
            daily_return_percent: 50.0,
            duration_days: 3,
            start_date: ymd(2024, 7, 18),
            end_date: ymd(2024, 7, 21),
            total_return: 25_000.0,
            status: InvestmentStatus::Active,
            days_left: 1,
        },
        Investment {
            id: Uuid::new_v4(),
            plan: "Премиум".to_owned(),
            amount: 25_000.0,
            daily_return_percent: 50.0,
            duration_days: 3,
            start_date: ymd(2024, 7, 20),
            end_date: ymd(2024, 7, 23),
            total_return: 62_500.0,
            status: InvestmentStatus::Active,
            days_left: 2,
        },
        Investment {
            id: Uuid::new_v4(),
            plan: "Стартовый".to_owned(),
            amount: 5_000.0,
            daily_return_percent: 50.0,
            duration_days: 3,
            start_date: ymd(2024, 7, 15),
            end_date: ymd(2024, 7, 18),
            total_return: 12_500.0,
            status: InvestmentStatus::Completed,
            days_left: 0,
        },
    ]
}

/// Filter the ledger by entry kind, for the tabbed views.
#[must_use]
pub fn filter_by_kind(transactions: &[Transaction], kind: TransactionKind) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_splits_into_the_three_tabs() {
        let all = sample_transactions();
        let deposits = filter_by_kind(&all, TransactionKind::Deposit);
        let withdrawals = filter_by_kind(&all, TransactionKind::Withdrawal);
        let profits = filter_by_kind(&all, TransactionKind::Profit);
        assert_eq!(deposits.len(), 2);
        assert_eq!(withdrawals.len(), 2);
        assert_eq!(profits.len(), 2);
        assert_eq!(deposits.len() + withdrawals.len() + profits.len(), all.len());
    }

    #[test]
    fn one_withdrawal_is_pending() {
        let pending: Vec<_> = sample_transactions()
            .into_iter()
            .filter(|t| t.status == TransactionStatus::Pending)
            .collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, TransactionKind::Withdrawal);
    }

    #[test]
    fn sample_investments_satisfy_the_payout_invariant() {
        for inv in sample_investments() {
            let breakdown = crate::returns::calculate(
                inv.amount,
                inv.daily_return_percent,
                inv.duration_days,
            );
            assert_eq!(inv.total_return, breakdown.final_payout);
        }
    }

    #[test]
    fn completed_investment_has_accrued_everything() {
        let completed = sample_investments()
            .into_iter()
            .find(|i| i.status == InvestmentStatus::Completed)
            .unwrap();
        assert_eq!(completed.progress_percent(), 100.0);
        assert_eq!(completed.earned_profit(), 7_500.0);
    }

    #[test]
    fn withdraw_request_requires_amount_and_details() {
        let account = sample_account();
        let err = withdraw_request(&account, None, "sberbank", "4276 **** 1234").unwrap_err();
        assert!(matches!(err, WithdrawError::MissingField { field: "amount" }));
        let err = withdraw_request(&account, Some(1_000.0), "sberbank", "  ").unwrap_err();
        assert!(matches!(err, WithdrawError::MissingField { field: "details" }));
    }

    #[test]
    fn withdraw_request_rejects_amounts_over_the_balance() {
        let account = sample_account();
        let err =
            withdraw_request(&account, Some(20_000.0), "sberbank", "4276 **** 1234").unwrap_err();
        assert!(matches!(
            err,
            WithdrawError::InsufficientFunds { requested, available }
                if requested == 20_000.0 && available == 15_750.0
        ));
    }

    #[test]
    fn accepted_withdrawal_is_pending() {
        let account = sample_account();
        let request =
            withdraw_request(&account, Some(5_000.0), "sberbank", "4276 **** 1234").unwrap();
        assert_eq!(request.status, TransactionStatus::Pending);
        assert_eq!(request.amount, 5_000.0);
        assert_eq!(request.method, "sberbank");
    }

    #[test]
    fn the_full_balance_is_withdrawable() {
        let account = sample_account();
        assert!(withdraw_request(&account, Some(15_750.0), "sberbank", "кошелек 410012345").is_ok());
    }

    #[test]
    fn transactions_serialize_with_the_original_field_names() {
        let json = serde_json::to_string(&sample_transactions()[0]).unwrap();
        assert!(json.contains("\"type\":\"deposit\""));
        assert!(json.contains("\"status\":\"completed\""));
    }
}
