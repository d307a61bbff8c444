//! Investor code registry.
//!
//! Binds access codes to investor records over a [`StorageBackend`]. One
//! registry instance serves both flows: issuance writes through it and
//! login reads through it, so a code is always resolvable by the path
//! that issued it. Registration enforces write-once semantics — a bound
//! code is never silently overwritten.
//!
//! Storage layout (JSON values):
//! - `codes/<CODE>` — issuance details ([`CodeIssuance`])
//! - `investors/<CODE>` — the investor profile ([`InvestorRecord`])

use std::sync::Arc;

use chrono::{Days, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use investpro_storage::StorageBackend;

use crate::code;
use crate::error::{IssuanceError, RegistryError};
use crate::investor::{CodeIssuance, Investment, InvestmentStatus, InvestorRecord};
use crate::plan::InvestmentPlan;

/// Storage prefix for issuance details.
const CODES_PREFIX: &str = "codes/";

/// Storage prefix for investor profiles.
const INVESTORS_PREFIX: &str = "investors/";

/// How many candidate codes to try before giving up on issuance.
const MAX_CODE_ATTEMPTS: u32 = 8;

/// Operator input for issuing a new code.
#[derive(Debug, Clone)]
pub struct IssueParams {
    /// Client name.
    pub client_name: String,
    /// Selected plan id (`starter`, `standard`, `premium`).
    pub plan_id: String,
    /// Contribution amount in rubles.
    pub amount: f64,
    /// Telegram handle for the hand-off message, if given.
    pub telegram: Option<String>,
}

/// Result of a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The newly bound access code.
    pub code: String,
    /// Issuance details, as persisted under `codes/<CODE>`.
    pub issuance: CodeIssuance,
    /// The investor profile, as persisted under `investors/<CODE>`.
    pub record: InvestorRecord,
    /// Ready-to-send client notification text.
    pub message: String,
}

/// Source of candidate access codes.
type CodeSource = Arc<dyn Fn() -> String + Send + Sync>;

/// Registry mapping access codes to investor records.
///
/// Cheap to clone; clones share the underlying backend.
#[derive(Clone)]
pub struct InvestorRegistry {
    storage: Arc<dyn StorageBackend>,
    code_source: CodeSource,
}

impl std::fmt::Debug for InvestorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestorRegistry").finish_non_exhaustive()
    }
}

impl InvestorRegistry {
    /// Create a registry over the given backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            code_source: Arc::new(code::generate),
        }
    }

    /// Create a registry with a custom candidate code source, so tests
    /// can force collisions deterministically.
    #[cfg(test)]
    fn with_code_source(storage: Arc<dyn StorageBackend>, code_source: CodeSource) -> Self {
        Self {
            storage,
            code_source,
        }
    }

    /// Bind a code to an investor record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CodeExists`] if the code is already bound,
    /// [`RegistryError::Storage`] on backend failure.
    pub async fn register(&self, code: &str, record: &InvestorRecord) -> Result<(), RegistryError> {
        let code = code::normalize(code);
        let key = format!("{INVESTORS_PREFIX}{code}");
        if self.storage.exists(&key).await? {
            warn!(%code, "rejected re-registration of bound code");
            return Err(RegistryError::CodeExists { code });
        }
        let bytes = serde_json::to_vec(record).map_err(|e| RegistryError::Encoding {
            code: code.clone(),
            reason: e.to_string(),
        })?;
        self.storage.put(&key, &bytes).await?;
        info!(%code, investor = %record.name, "registered investor");
        Ok(())
    }

    /// Resolve a code to its investor record.
    ///
    /// Input is case-normalized, matching how codes are issued.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the code is not registered.
    pub async fn lookup(&self, code: &str) -> Result<InvestorRecord, RegistryError> {
        let code = code::normalize(code);
        let key = format!("{INVESTORS_PREFIX}{code}");
        let bytes = self
            .storage
            .get(&key)
            .await?
            .ok_or_else(|| RegistryError::NotFound { code: code.clone() })?;
        serde_json::from_slice(&bytes).map_err(|e| RegistryError::Encoding {
            code,
            reason: e.to_string(),
        })
    }

    /// Fetch the issuance details for a code.
    ///
    /// Seeded demo records have no issuance entry, so absence is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] on backend failure.
    pub async fn issuance(&self, code: &str) -> Result<Option<CodeIssuance>, RegistryError> {
        let code = code::normalize(code);
        let key = format!("{CODES_PREFIX}{code}");
        match self.storage.get(&key).await? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| RegistryError::Encoding {
                    code,
                    reason: e.to_string(),
                }),
        }
    }

    /// Whether a code is bound to a record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] on backend failure.
    pub async fn exists(&self, code: &str) -> Result<bool, RegistryError> {
        let code = code::normalize(code);
        let key = format!("{INVESTORS_PREFIX}{code}");
        Ok(self.storage.exists(&key).await?)
    }

    /// List all registered codes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] on backend failure.
    pub async fn list_codes(&self) -> Result<Vec<String>, RegistryError> {
        let keys = self.storage.list(INVESTORS_PREFIX).await?;
        Ok(keys
            .into_iter()
            .map(|k| k[INVESTORS_PREFIX.len()..].to_owned())
            .collect())
    }

    /// Validate operator input, generate a fresh code, and bind it.
    ///
    /// Candidate codes that collide with bound ones are regenerated, up
    /// to a small attempt cap.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::MissingField`] for an empty client name,
    /// [`IssuanceError::UnknownPlan`] for a bad plan id,
    /// [`IssuanceError::AmountOutOfRange`] when the amount is outside the
    /// plan's bounds, and [`IssuanceError::CodeSpaceExhausted`] if no
    /// unique code could be generated.
    pub async fn issue(&self, params: IssueParams) -> Result<IssuedCode, IssuanceError> {
        let client_name = params.client_name.trim();
        if client_name.is_empty() {
            return Err(IssuanceError::MissingField { field: "name" });
        }
        let plan = InvestmentPlan::by_id(&params.plan_id).ok_or_else(|| {
            IssuanceError::UnknownPlan {
                id: params.plan_id.clone(),
            }
        })?;
        if !plan.contains_amount(params.amount) {
            warn!(
                plan = plan.name,
                amount = params.amount,
                "rejected issuance with out-of-bounds amount"
            );
            return Err(IssuanceError::AmountOutOfRange {
                plan: plan.name.to_owned(),
                min: plan.min_amount,
                max: plan.max_amount,
                amount: params.amount,
            });
        }

        let breakdown = plan.returns_for(params.amount);
        let start_date = Utc::now().date_naive();
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(plan.duration_days)))
            .unwrap_or(start_date);

        let record = InvestorRecord {
            name: client_name.to_owned(),
            total_invested: params.amount,
            active_investments: vec![Investment {
                id: Uuid::new_v4(),
                plan: plan.name.to_owned(),
                amount: params.amount,
                daily_return_percent: plan.daily_return_percent,
                duration_days: plan.duration_days,
                start_date,
                end_date,
                total_return: breakdown.final_payout,
                status: InvestmentStatus::Active,
                days_left: plan.duration_days,
            }],
        };

        for attempt in 0..MAX_CODE_ATTEMPTS {
            let candidate = (self.code_source)();
            match self.register(&candidate, &record).await {
                Ok(()) => {
                    let issuance = CodeIssuance {
                        code: candidate.clone(),
                        name: client_name.to_owned(),
                        plan: plan.name.to_owned(),
                        amount: params.amount,
                        telegram: params
                            .telegram
                            .as_deref()
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_owned),
                        start_date,
                        end_date,
                        daily_return_percent: plan.daily_return_percent,
                        total_return: breakdown.final_payout,
                    };
                    self.store_issuance(&issuance).await?;
                    let message = notification_message(&issuance, plan);
                    info!(code = %candidate, plan = plan.name, "issued investor code");
                    return Ok(IssuedCode {
                        code: candidate,
                        issuance,
                        record,
                        message,
                    });
                }
                Err(RegistryError::CodeExists { code }) => {
                    warn!(%code, attempt, "code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(IssuanceError::CodeSpaceExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Load the two demo investors used for walkthroughs.
    ///
    /// Writes through the normal registration path so login resolves them
    /// like any issued code. Codes that already exist are left alone, so
    /// seeding is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] on backend failure.
    pub async fn seed_demo(&self) -> Result<(), RegistryError> {
        for (code, record) in demo_investors() {
            match self.register(code, &record).await {
                Ok(()) | Err(RegistryError::CodeExists { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn store_issuance(&self, issuance: &CodeIssuance) -> Result<(), RegistryError> {
        let key = format!("{CODES_PREFIX}{}", issuance.code);
        let bytes = serde_json::to_vec(issuance).map_err(|e| RegistryError::Encoding {
            code: issuance.code.clone(),
            reason: e.to_string(),
        })?;
        self.storage.put(&key, &bytes).await?;
        Ok(())
    }
}

/// The client hand-off text sent over Telegram after payment.
fn notification_message(issuance: &CodeIssuance, plan: &InvestmentPlan) -> String {
    format!(
        "🎉 Ваша инвестиция успешно активирована!\n\
         \n\
         👤 Инвестор: {name}\n\
         💼 Тариф: {plan_name}\n\
         💰 Сумма: {amount:.0} ₽\n\
         📈 Доходность: {rate:.0}% в день на {duration} рабочих дня\n\
         💵 К выплате: {payout:.0} ₽\n\
         \n\
         🔑 Ваш код доступа: {code}\n\
         \n\
         📱 Войдите в личный кабинет на сайте:\n\
         Используйте кнопку \"Вход инвестора\" и введите ваш код.\n\
         \n\
         📊 В личном кабинете вы сможете:\n\
         • Отслеживать прогресс инвестиции\n\
         • Видеть ежедневные начисления\n\
         • Связываться с менеджером\n\
         • Скачивать отчеты\n\
         \n\
         Спасибо за доверие! 🚀",
        name = issuance.name,
        plan_name = issuance.plan,
        amount = issuance.amount,
        rate = plan.daily_return_percent,
        duration = plan.duration_days,
        payout = issuance.total_return,
        code = issuance.code,
    )
}

/// The two demo profiles from the original walkthrough, payouts computed
/// through the calculator.
fn demo_investors() -> Vec<(&'static str, InvestorRecord)> {
    let ymd = |y, m, d| {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    };
    vec![
        (
            "INV001",
            InvestorRecord {
                name: "Иван Петров".to_owned(),
                total_invested: 25_000.0,
                active_investments: vec![
                    Investment {
                        id: Uuid::new_v4(),
                        plan: "Стандарт".to_owned(),
                        amount: 15_000.0,
                        daily_return_percent: 50.0,
                        duration_days: 3,
                        start_date: ymd(2024, 7, 28),
                        end_date: ymd(2024, 7, 31),
                        total_return: 37_500.0,
                        status: InvestmentStatus::Active,
                        days_left: 1,
                    },
                    Investment {
                        id: Uuid::new_v4(),
                        plan: "Премиум".to_owned(),
                        amount: 10_000.0,
                        daily_return_percent: 50.0,
                        duration_days: 3,
                        start_date: ymd(2024, 7, 30),
                        end_date: ymd(2024, 8, 2),
                        total_return: 25_000.0,
                        status: InvestmentStatus::Active,
                        days_left: 3,
                    },
                ],
            },
        ),
        (
            "INV002",
            InvestorRecord {
                name: "Мария Сидорова".to_owned(),
                total_invested: 50_000.0,
                active_investments: vec![Investment {
                    id: Uuid::new_v4(),
                    plan: "Премиум".to_owned(),
                    amount: 50_000.0,
                    daily_return_percent: 50.0,
                    duration_days: 3,
                    start_date: ymd(2024, 7, 29),
                    end_date: ymd(2024, 8, 1),
                    total_return: 125_000.0,
                    status: InvestmentStatus::Active,
                    days_left: 2,
                }],
            },
        ),
    ]
}
