//! Platform assembly.
//!
//! Builds the storage backend selected by [`PlatformConfig`], wires the
//! registry and session store on top of it, and seeds the demo investors
//! when configured. The UI holds one [`Platform`] for the process
//! lifetime.

use std::sync::Arc;

use tracing::info;

use investpro_storage::{MemoryBackend, StorageBackend};

#[cfg(feature = "redb-backend")]
use investpro_storage::RedbBackend;

use crate::config::{PlatformConfig, StorageBackendType};
use crate::error::RegistryError;
use crate::registry::InvestorRegistry;
use crate::session::SessionStore;

/// The assembled platform core.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Code issuance and lookup.
    pub registry: InvestorRegistry,
    /// The current investor session.
    pub session: SessionStore,
}

impl Platform {
    /// Open the platform described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] if the backend cannot be opened
    /// or seeding fails.
    pub async fn open(config: &PlatformConfig) -> Result<Self, RegistryError> {
        let backend: Arc<dyn StorageBackend> = match &config.storage_backend {
            StorageBackendType::Memory => Arc::new(MemoryBackend::new()),
            #[cfg(feature = "redb-backend")]
            StorageBackendType::Redb { path } => Arc::new(RedbBackend::open(path)?),
            #[cfg(not(feature = "redb-backend"))]
            StorageBackendType::Redb { path } => {
                return Err(RegistryError::Storage(
                    investpro_storage::StorageError::Open {
                        path: path.clone(),
                        reason: "redb backend not compiled in (feature `redb-backend`)"
                            .to_owned(),
                    },
                ));
            }
        };

        let registry = InvestorRegistry::new(Arc::clone(&backend));
        let session = SessionStore::new(backend, registry.clone());

        if config.seed_demo_data {
            registry.seed_demo().await?;
        }
        info!(backend = ?config.storage_backend, "platform opened");

        Ok(Self { registry, session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_seeds_demo_investors_by_default() {
        let platform = Platform::open(&PlatformConfig::default()).await.unwrap();
        let active = platform.session.login("INV001").await.unwrap();
        assert_eq!(active.investor.name, "Иван Петров");
    }

    #[tokio::test]
    async fn seeding_can_be_disabled() {
        let config = PlatformConfig {
            seed_demo_data: false,
            ..PlatformConfig::default()
        };
        let platform = Platform::open(&config).await.unwrap();
        assert!(platform.registry.list_codes().await.unwrap().is_empty());
    }
}
