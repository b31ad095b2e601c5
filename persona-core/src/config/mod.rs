//! Layered configuration: every section has defaults, any subset can be
//! overridden from TOML.

pub mod defaults;
mod history_config;
mod mutation_config;
mod observability_config;
mod storage_config;
mod trust_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PersonaError, PersonaResult};

pub use history_config::HistoryConfig;
pub use mutation_config::MutationConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use trust_config::TrustConfig;

/// Root configuration for the Persona system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub storage: StorageConfig,
    pub history: HistoryConfig,
    pub mutation: MutationConfig,
    pub trust: TrustConfig,
    pub observability: ObservabilityConfig,
}

impl PersonaConfig {
    /// Parse a configuration from TOML. Missing sections and keys fall back
    /// to their defaults.
    pub fn from_toml(source: &str) -> PersonaResult<Self> {
        toml::from_str(source).map_err(|e| PersonaError::ConfigError(e.to_string()))
    }

    /// Load a configuration file from disk.
    pub fn from_file(path: &Path) -> PersonaResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            PersonaError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&source)
    }

    /// Render the configuration back to TOML.
    pub fn to_toml(&self) -> PersonaResult<String> {
        toml::to_string(self).map_err(|e| PersonaError::ConfigError(e.to_string()))
    }
}
