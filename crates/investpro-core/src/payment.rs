//! Payment checkout flow.
//!
//! A staged state machine: `form → processing → payment → success`, with
//! validation and provider failures returning to `form`. The original
//! drove these transitions with fixed timers; here the provider is a
//! trait so a real payment integration can be substituted without
//! changing the machine's shape. [`MockProvider`] keeps the simulated
//! behavior — configurable delays and a cosmetic hosted-page URL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::PaymentError;
use crate::plan::InvestmentPlan;
use crate::returns::ReturnBreakdown;

/// A selectable payment method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    /// Stable identifier used in forms.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description shown under the name.
    pub description: &'static str,
    /// Whether checkout goes through a hosted payment page before
    /// completing (the primary method does; the rest redirect directly).
    pub hosted_page: bool,
    /// Test card number, where the sandbox provides one.
    pub test_card: Option<&'static str>,
}

/// The method catalog, primary method first.
pub static PAYMENT_METHODS: [PaymentMethod; 4] = [
    PaymentMethod {
        id: "yookassa",
        name: "ЮKassa",
        description: "Карты, Apple Pay, Google Pay",
        hosted_page: true,
        test_card: Some("4111 1111 1111 1111"),
    },
    PaymentMethod {
        id: "sberbank",
        name: "СберБанк Онлайн",
        description: "Переход в СберБанк Онлайн",
        hosted_page: false,
        test_card: None,
    },
    PaymentMethod {
        id: "tinkoff",
        name: "Тинькофф",
        description: "Мгновенная оплата",
        hosted_page: false,
        test_card: None,
    },
    PaymentMethod {
        id: "paypal",
        name: "PayPal",
        description: "Международные платежи",
        hosted_page: false,
        test_card: None,
    },
];

impl PaymentMethod {
    /// Look up a method by its stable id.
    #[must_use]
    pub fn by_id(id: &str) -> Option<&'static PaymentMethod> {
        PAYMENT_METHODS.iter().find(|m| m.id == id)
    }
}

/// Contact details collected by the checkout form. All fields mandatory.
#[derive(Debug, Clone, Default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    fn validate(&self) -> Result<(), PaymentError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(PaymentError::MissingContact { field });
            }
        }
        Ok(())
    }
}

/// A created payment, waiting to be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Provider-side order identifier.
    pub order_id: String,
    /// Hosted payment page URL, for methods that use one.
    pub payment_url: Option<String>,
}

/// A confirmed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// Provider-side transaction identifier.
    pub transaction_id: String,
}

/// Checkout summary shown next to the form — all figures from the one
/// calculator.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSummary {
    pub plan_name: &'static str,
    pub amount: f64,
    pub duration_days: u32,
    pub daily_return_percent: f64,
    pub returns: ReturnBreakdown,
}

/// Receipt presented in the terminal `success` state.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    /// Provider-side transaction identifier.
    pub transaction_id: String,
    /// Display name of the plan.
    pub plan: String,
    /// Paid amount in rubles.
    pub amount: f64,
    /// Display name of the method used.
    pub method: String,
    /// Expected returns on the paid amount.
    pub returns: ReturnBreakdown,
    /// When the payment completed.
    pub completed_at: DateTime<Utc>,
}

/// Where the checkout flow currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    /// Collecting method selection and contact fields.
    Form,
    /// Payment is being created with the provider.
    Processing,
    /// Hosted payment page is open, awaiting confirmation.
    Payment(PaymentIntent),
    /// Terminal: payment confirmed.
    Success(PaymentReceipt),
}

impl CheckoutState {
    /// Short state name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Processing => "processing",
            Self::Payment(_) => "payment",
            Self::Success(_) => "success",
        }
    }
}

/// Creates and confirms payments. Implemented by [`MockProvider`] here;
/// a real gateway integration implements the same two calls.
#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment for the amount under the plan.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Provider`] if the provider rejects the
    /// payment.
    async fn create_payment(
        &self,
        amount: f64,
        plan: &InvestmentPlan,
        method: &PaymentMethod,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Wait for the created payment to be confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Provider`] if confirmation fails.
    async fn await_confirmation(
        &self,
        intent: &PaymentIntent,
    ) -> Result<PaymentConfirmation, PaymentError>;
}

/// Simulated provider. No network calls; delays stand in for gateway
/// latency and the payment URL is a cosmetic placeholder.
#[derive(Debug, Clone)]
pub struct MockProvider {
    create_delay: Duration,
    confirm_delay: Duration,
}

impl MockProvider {
    /// Delays matching the original demo: 2s to create, 5s to confirm.
    #[must_use]
    pub fn new() -> Self {
        Self {
            create_delay: Duration::from_secs(2),
            confirm_delay: Duration::from_secs(5),
        }
    }

    /// No delays. For tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            create_delay: Duration::ZERO,
            confirm_delay: Duration::ZERO,
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PaymentProvider for MockProvider {
    async fn create_payment(
        &self,
        _amount: f64,
        _plan: &InvestmentPlan,
        method: &PaymentMethod,
    ) -> Result<PaymentIntent, PaymentError> {
        tokio::time::sleep(self.create_delay).await;
        let order_id = format!("test_{}", Utc::now().timestamp_millis());
        let payment_url = method.hosted_page.then(|| {
            format!("https://yoomoney.ru/checkout/payments/v2/contract?orderId={order_id}")
        });
        Ok(PaymentIntent {
            order_id,
            payment_url,
        })
    }

    async fn await_confirmation(
        &self,
        _intent: &PaymentIntent,
    ) -> Result<PaymentConfirmation, PaymentError> {
        tokio::time::sleep(self.confirm_delay).await;
        Ok(PaymentConfirmation {
            transaction_id: format!("tx_{}", Utc::now().timestamp_millis()),
        })
    }
}

/// The checkout state machine for one contribution.
#[derive(Debug)]
pub struct CheckoutFlow {
    plan: &'static InvestmentPlan,
    amount: f64,
    method: Option<&'static PaymentMethod>,
    state: CheckoutState,
}

impl CheckoutFlow {
    /// Start a checkout for an amount under a plan.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::AmountOutOfRange`] if the amount is outside
    /// the plan's contribution bounds — checked here, at the flow
    /// boundary, before any provider is involved.
    pub fn new(plan: &'static InvestmentPlan, amount: f64) -> Result<Self, PaymentError> {
        if !plan.contains_amount(amount) {
            return Err(PaymentError::AmountOutOfRange {
                plan: plan.name.to_owned(),
                min: plan.min_amount,
                max: plan.max_amount,
                amount,
            });
        }
        Ok(Self {
            plan,
            amount,
            method: None,
            state: CheckoutState::Form,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Figures for the order summary pane.
    #[must_use]
    pub fn summary(&self) -> CheckoutSummary {
        CheckoutSummary {
            plan_name: self.plan.name,
            amount: self.amount,
            duration_days: self.plan.duration_days,
            daily_return_percent: self.plan.daily_return_percent,
            returns: self.plan.returns_for(self.amount),
        }
    }

    /// Submit the form: validate contact fields, create the payment.
    ///
    /// Methods with a hosted page land in [`CheckoutState::Payment`] and
    /// need a [`confirm`](Self::confirm) call; direct methods complete in
    /// one step. Validation failures keep the flow in the form state;
    /// provider failures return it there.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidTransition`] outside the form state,
    /// [`PaymentError::MissingContact`] for an empty mandatory field,
    /// [`PaymentError::UnknownMethod`] for a bad method id, and
    /// [`PaymentError::Provider`] when payment creation fails.
    pub async fn submit(
        &mut self,
        method_id: &str,
        contact: &ContactInfo,
        provider: &dyn PaymentProvider,
    ) -> Result<&CheckoutState, PaymentError> {
        if self.state != CheckoutState::Form {
            return Err(PaymentError::InvalidTransition {
                state: self.state.name(),
            });
        }
        if let Err(e) = contact.validate() {
            warn!(error = %e, "checkout form rejected");
            return Err(e);
        }
        let method = PaymentMethod::by_id(method_id).ok_or_else(|| PaymentError::UnknownMethod {
            id: method_id.to_owned(),
        })?;
        self.method = Some(method);
        self.state = CheckoutState::Processing;

        let intent = match provider.create_payment(self.amount, self.plan, method).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(method = method.id, error = %e, "payment creation failed");
                self.state = CheckoutState::Form;
                return Err(e);
            }
        };
        info!(method = method.id, order = %intent.order_id, "payment created");

        if method.hosted_page {
            self.state = CheckoutState::Payment(intent);
            return Ok(&self.state);
        }
        self.complete(provider, &intent).await?;
        Ok(&self.state)
    }

    /// Confirm a payment sitting on the hosted page.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidTransition`] outside the payment
    /// state and [`PaymentError::Provider`] when confirmation fails (the
    /// flow returns to the form state).
    pub async fn confirm(
        &mut self,
        provider: &dyn PaymentProvider,
    ) -> Result<&CheckoutState, PaymentError> {
        let CheckoutState::Payment(intent) = self.state.clone() else {
            return Err(PaymentError::InvalidTransition {
                state: self.state.name(),
            });
        };
        self.complete(provider, &intent).await?;
        Ok(&self.state)
    }

    async fn complete(
        &mut self,
        provider: &dyn PaymentProvider,
        intent: &PaymentIntent,
    ) -> Result<(), PaymentError> {
        let method = self.method.ok_or(PaymentError::InvalidTransition {
            state: self.state.name(),
        })?;
        let confirmation = match provider.await_confirmation(intent).await {
            Ok(c) => c,
            Err(e) => {
                warn!(method = method.id, error = %e, "payment confirmation failed");
                self.state = CheckoutState::Form;
                return Err(e);
            }
        };
        info!(
            method = method.id,
            transaction = %confirmation.transaction_id,
            "payment confirmed"
        );
        self.state = CheckoutState::Success(PaymentReceipt {
            transaction_id: confirmation.transaction_id,
            plan: self.plan.name.to_owned(),
            amount: self.amount,
            method: method.name.to_owned(),
            returns: self.plan.returns_for(self.amount),
            completed_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait::async_trait]
    impl PaymentProvider for FailingProvider {
        async fn create_payment(
            &self,
            _amount: f64,
            _plan: &InvestmentPlan,
            method: &PaymentMethod,
        ) -> Result<PaymentIntent, PaymentError> {
            Err(PaymentError::Provider {
                method: method.id.to_owned(),
                reason: "gateway unavailable".to_owned(),
            })
        }

        async fn await_confirmation(
            &self,
            _intent: &PaymentIntent,
        ) -> Result<PaymentConfirmation, PaymentError> {
            Err(PaymentError::Provider {
                method: "yookassa".to_owned(),
                reason: "gateway unavailable".to_owned(),
            })
        }
    }

    fn standard() -> &'static InvestmentPlan {
        InvestmentPlan::by_id("standard").unwrap()
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Иван Петров".to_owned(),
            email: "ivan@example.com".to_owned(),
            phone: "+7 (999) 123-45-67".to_owned(),
        }
    }

    #[tokio::test]
    async fn empty_contact_keeps_the_form_state() {
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let err = flow
            .submit("yookassa", &ContactInfo::default(), &MockProvider::immediate())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::MissingContact { field: "name" }));
        assert_eq!(flow.state(), &CheckoutState::Form);
    }

    #[tokio::test]
    async fn partially_filled_contact_names_the_missing_field() {
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let mut partial = contact();
        partial.phone = String::new();
        let err = flow
            .submit("yookassa", &partial, &MockProvider::immediate())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::MissingContact { field: "phone" }));
        assert_eq!(flow.state(), &CheckoutState::Form);
    }

    #[tokio::test]
    async fn amount_outside_plan_bounds_is_rejected_upfront() {
        let err = CheckoutFlow::new(standard(), 100.0).unwrap_err();
        assert!(matches!(
            err,
            PaymentError::AmountOutOfRange { min, .. } if min == 1_000.0
        ));
    }

    #[tokio::test]
    async fn hosted_method_pauses_on_the_payment_page() {
        let provider = MockProvider::immediate();
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let state = flow.submit("yookassa", &contact(), &provider).await.unwrap();
        let CheckoutState::Payment(intent) = state else {
            panic!("expected payment state, got {}", state.name());
        };
        let url = intent.payment_url.as_deref().unwrap();
        assert!(url.starts_with("https://yoomoney.ru/checkout/"));

        let state = flow.confirm(&provider).await.unwrap();
        let CheckoutState::Success(receipt) = state else {
            panic!("expected success state, got {}", state.name());
        };
        assert!(receipt.transaction_id.starts_with("tx_"));
        assert_eq!(receipt.plan, "Стандарт");
        assert_eq!(receipt.returns.final_payout, 25_000.0);
    }

    #[tokio::test]
    async fn direct_method_completes_in_one_step() {
        let provider = MockProvider::immediate();
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let state = flow.submit("sberbank", &contact(), &provider).await.unwrap();
        let CheckoutState::Success(receipt) = state else {
            panic!("expected success state, got {}", state.name());
        };
        assert_eq!(receipt.method, "СберБанк Онлайн");
    }

    #[tokio::test]
    async fn unknown_method_keeps_the_form_state() {
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let err = flow
            .submit("webmoney", &contact(), &MockProvider::immediate())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::UnknownMethod { id } if id == "webmoney"));
        assert_eq!(flow.state(), &CheckoutState::Form);
    }

    #[tokio::test]
    async fn provider_failure_returns_to_the_form_state() {
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let err = flow
            .submit("yookassa", &contact(), &FailingProvider)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Provider { .. }));
        assert_eq!(flow.state(), &CheckoutState::Form);
    }

    #[tokio::test]
    async fn confirm_before_submit_is_an_invalid_transition() {
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let err = flow.confirm(&MockProvider::immediate()).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::InvalidTransition { state: "form" }
        ));
    }

    #[tokio::test]
    async fn success_is_terminal() {
        let provider = MockProvider::immediate();
        let mut flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        flow.submit("tinkoff", &contact(), &provider).await.unwrap();
        let err = flow.submit("tinkoff", &contact(), &provider).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::InvalidTransition { state: "success" }
        ));
    }

    #[tokio::test]
    async fn summary_quotes_the_calculator() {
        let flow = CheckoutFlow::new(standard(), 10_000.0).unwrap();
        let summary = flow.summary();
        assert_eq!(summary.returns.daily_profit, 5_000.0);
        assert_eq!(summary.returns.total_profit, 15_000.0);
        assert_eq!(summary.returns.final_payout, 25_000.0);
    }

    #[test]
    fn the_catalog_has_one_hosted_method() {
        let hosted: Vec<_> = PAYMENT_METHODS.iter().filter(|m| m.hosted_page).collect();
        assert_eq!(hosted.len(), 1);
        assert_eq!(hosted[0].id, "yookassa");
        assert!(hosted[0].test_card.is_some());
    }
}
