//! Platform configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `INVESTPRO_*` environment variables.

/// Platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    ///
    /// This workspace only emits `tracing` events and never installs a
    /// subscriber; the embedding binary reads this and feeds it to its
    /// own subscriber setup.
    pub log_level: String,
    /// Whether to seed the demo investors at startup.
    pub seed_demo_data: bool,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (empty on every run).
    Memory,
    /// Redb persistent storage (state survives restarts).
    Redb { path: String },
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `INVESTPRO_STORAGE` — `memory` or `redb` (default: `memory`)
    /// - `INVESTPRO_STORAGE_PATH` — database path for redb (default: `./data`)
    /// - `INVESTPRO_LOG_LEVEL` — log filter (default: `info`)
    /// - `INVESTPRO_SEED_DEMO` — seed the demo investors (default: `true`)
    #[must_use]
    pub fn from_env() -> Self {
        let storage_path =
            std::env::var("INVESTPRO_STORAGE_PATH").unwrap_or_else(|_| "./data".to_owned());

        let storage_backend = match std::env::var("INVESTPRO_STORAGE")
            .unwrap_or_else(|_| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "redb" => StorageBackendType::Redb { path: storage_path },
            _ => StorageBackendType::Memory,
        };

        let log_level =
            std::env::var("INVESTPRO_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let seed_demo_data = std::env::var("INVESTPRO_SEED_DEMO")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            storage_backend,
            log_level,
            seed_demo_data,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackendType::Memory,
            log_level: "info".to_owned(),
            seed_demo_data: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_memory_with_demo_seed() {
        let config = PlatformConfig::default();
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
        assert!(config.seed_demo_data);
        assert_eq!(config.log_level, "info");
    }
}
