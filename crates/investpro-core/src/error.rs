//! Error types for `investpro-core`.
//!
//! Each error variant carries enough context to diagnose the problem
//! without a debugger. All errors here are recoverable — the caller
//! re-submits a corrected form or re-enters a code; nothing is retried
//! automatically.

use investpro_storage::StorageError;

/// Errors from the investor registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The investor code is not registered.
    #[error("investor code not found: {code}")]
    NotFound { code: String },

    /// The code is already bound to a record. Records are write-once;
    /// re-registering is rejected rather than silently overwriting.
    #[error("investor code already registered: {code}")]
    CodeExists { code: String },

    /// A stored record could not be encoded or decoded.
    #[error("record encoding failed for code '{code}': {reason}")]
    Encoding { code: String, reason: String },

    /// The underlying storage backend returned an error.
    #[error("registry storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from code issuance.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    /// A required form field was empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// The selected plan id does not exist.
    #[error("unknown plan: {id}")]
    UnknownPlan { id: String },

    /// The amount is outside the selected plan's bounds.
    #[error("amount {amount} outside plan '{plan}' bounds [{min}, {max}]")]
    AmountOutOfRange {
        plan: String,
        min: f64,
        max: f64,
        amount: f64,
    },

    /// Code generation kept colliding with registered codes.
    #[error("could not generate a unique code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    /// The registry rejected the registration.
    #[error("issuance registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Errors from the session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The submitted code does not resolve to an investor. The session is
    /// left untouched.
    #[error("invalid investor code: {code}")]
    UnknownCode { code: String },

    /// A session value could not be encoded or decoded.
    #[error("session encoding failed: {reason}")]
    Encoding { reason: String },

    /// The registry failed while resolving the code.
    #[error("session registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The underlying storage backend returned an error.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the withdrawal request form.
#[derive(Debug, thiserror::Error)]
pub enum WithdrawError {
    /// A required form field was empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// The requested amount exceeds the withdrawable balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },
}

/// Errors from the payment checkout flow.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// A required contact field was empty. The flow stays in the form
    /// state.
    #[error("missing required contact field: {field}")]
    MissingContact { field: &'static str },

    /// The amount is outside the selected plan's bounds.
    #[error("amount {amount} outside plan '{plan}' bounds [{min}, {max}]")]
    AmountOutOfRange {
        plan: String,
        min: f64,
        max: f64,
        amount: f64,
    },

    /// The selected payment method id does not exist.
    #[error("unknown payment method: {id}")]
    UnknownMethod { id: String },

    /// The requested operation is not valid in the flow's current state.
    #[error("invalid checkout transition from state '{state}'")]
    InvalidTransition { state: &'static str },

    /// The payment provider failed. The flow returns to the form state.
    #[error("payment provider '{method}' failed: {reason}")]
    Provider { method: String, reason: String },
}
