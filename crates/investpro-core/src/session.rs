//! Investor session store.
//!
//! Holds the logged-in investor between visits, the way the original kept
//! `currentInvestor`/`investorCode` in browser storage. Login resolves the
//! code through the registry — the same store issuance writes to — and
//! only touches the session keys on success.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use investpro_storage::StorageBackend;

use crate::code;
use crate::error::{RegistryError, SessionError};
use crate::investor::InvestorRecord;
use crate::registry::InvestorRegistry;

/// Storage key for the logged-in investor record.
const SESSION_INVESTOR_KEY: &str = "session/current";

/// Storage key for the logged-in code.
const SESSION_CODE_KEY: &str = "session/code";

/// A resolved, logged-in session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    /// The access code used to log in.
    pub code: String,
    /// The investor record at login time.
    pub investor: InvestorRecord,
}

/// Stores the current investor session over a [`StorageBackend`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn StorageBackend>,
    registry: InvestorRegistry,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a session store sharing the registry's view of the world.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, registry: InvestorRegistry) -> Self {
        Self { storage, registry }
    }

    /// Log in with an access code.
    ///
    /// The code is case-normalized and resolved through the registry. On
    /// success the session keys are populated and the record returned; on
    /// an unknown code the session is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownCode`] if the code does not resolve.
    pub async fn login(&self, input: &str) -> Result<ActiveSession, SessionError> {
        let code = code::normalize(input);
        let investor = match self.registry.lookup(&code).await {
            Ok(record) => record,
            Err(RegistryError::NotFound { code }) => {
                warn!(%code, "login rejected: unknown code");
                return Err(SessionError::UnknownCode { code });
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = serde_json::to_vec(&investor).map_err(|e| SessionError::Encoding {
            reason: e.to_string(),
        })?;
        self.storage.put(SESSION_INVESTOR_KEY, &bytes).await?;
        self.storage.put(SESSION_CODE_KEY, code.as_bytes()).await?;
        info!(%code, investor = %investor.name, "investor logged in");
        Ok(ActiveSession { code, investor })
    }

    /// The current session, if an investor is logged in.
    ///
    /// Both session keys must be present; a half-written session reads as
    /// logged out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Encoding`] if a stored value is corrupt.
    pub async fn current(&self) -> Result<Option<ActiveSession>, SessionError> {
        let Some(investor_bytes) = self.storage.get(SESSION_INVESTOR_KEY).await? else {
            return Ok(None);
        };
        let Some(code_bytes) = self.storage.get(SESSION_CODE_KEY).await? else {
            return Ok(None);
        };
        let investor = serde_json::from_slice(&investor_bytes).map_err(|e| {
            SessionError::Encoding {
                reason: e.to_string(),
            }
        })?;
        let code = String::from_utf8(code_bytes).map_err(|e| SessionError::Encoding {
            reason: e.to_string(),
        })?;
        Ok(Some(ActiveSession { code, investor }))
    }

    /// Clear the session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] on backend failure.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.storage.delete(SESSION_INVESTOR_KEY).await?;
        self.storage.delete(SESSION_CODE_KEY).await?;
        info!("investor logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::IssueParams;
    use investpro_storage::MemoryBackend;

    fn stores() -> (InvestorRegistry, SessionStore) {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let registry = InvestorRegistry::new(Arc::clone(&backend));
        let session = SessionStore::new(backend, registry.clone());
        (registry, session)
    }

    #[tokio::test]
    async fn login_with_seeded_code_populates_session() {
        let (registry, session) = stores();
        registry.seed_demo().await.unwrap();

        let active = session.login("INV001").await.unwrap();
        assert_eq!(active.investor.name, "Иван Петров");

        let current = session.current().await.unwrap();
        assert_eq!(current, Some(active));
    }

    #[tokio::test]
    async fn login_normalizes_case() {
        let (registry, session) = stores();
        registry.seed_demo().await.unwrap();
        let active = session.login(" inv002 ").await.unwrap();
        assert_eq!(active.code, "INV002");
    }

    #[tokio::test]
    async fn login_with_unknown_code_leaves_session_untouched() {
        let (registry, session) = stores();
        registry.seed_demo().await.unwrap();

        let err = session.login("INV999999").await.unwrap_err();
        assert!(matches!(err, SessionError::UnknownCode { code } if code == "INV999999"));
        assert_eq!(session.current().await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_login_keeps_previous_session() {
        let (registry, session) = stores();
        registry.seed_demo().await.unwrap();

        session.login("INV001").await.unwrap();
        let _ = session.login("INV999999").await.unwrap_err();

        let current = session.current().await.unwrap().unwrap();
        assert_eq!(current.code, "INV001");
    }

    #[tokio::test]
    async fn freshly_issued_code_logs_in() {
        let (registry, session) = stores();
        let issued = registry
            .issue(IssueParams {
                client_name: "Пётр Иванов".to_owned(),
                plan_id: "standard".to_owned(),
                amount: 10_000.0,
                telegram: None,
            })
            .await
            .unwrap();

        let active = session.login(&issued.code).await.unwrap();
        assert_eq!(active.investor, issued.record);
    }

    #[tokio::test]
    async fn logout_clears_session_and_is_idempotent() {
        let (registry, session) = stores();
        registry.seed_demo().await.unwrap();
        session.login("INV001").await.unwrap();

        session.logout().await.unwrap();
        assert_eq!(session.current().await.unwrap(), None);
        session.logout().await.unwrap();
    }

    #[tokio::test]
    async fn current_is_none_before_any_login() {
        let (_registry, session) = stores();
        assert_eq!(session.current().await.unwrap(), None);
    }
}
