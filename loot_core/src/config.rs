//! Configuration for the loot package engine.
//!
//! Loaded from `loot_config.json` with support for an environment variable
//! override; the built-in copy is embedded in the binary.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use loot_schema::{CatalogItemId, BUILTIN_NAMESPACE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_LOOT_CONFIG: &str = include_str!("data/loot_config.json");

/// Environment variable naming a config file that replaces the built-in one.
pub const LOOT_CONFIG_PATH_ENV: &str = "LOOT_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Whether joining recipients receive the one-time starter grant.
    pub give_starter_package: bool,
    pub starter_grant: StarterGrantMode,
    pub namespace_policy: NamespacePolicy,
    /// `0` seeds generation from entropy.
    pub rng_seed: u64,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            give_starter_package: true,
            starter_grant: StarterGrantMode::Loot,
            namespace_policy: NamespacePolicy::default(),
            rng_seed: 0,
        }
    }
}

/// What a first-time recipient is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarterGrantMode {
    /// Generate the starter bundle and deliver its contents.
    #[default]
    Loot,
    /// Deliver one unopened starter package item.
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceMode {
    #[default]
    BuiltinOnly,
    BuiltinPlusAllowed,
}

/// Which namespaces may contribute items to the eligible pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespacePolicy {
    pub mode: NamespaceMode,
    pub builtin_namespace: String,
    /// Individual external items admitted in `builtin_plus_allowed` mode.
    pub allowed_items: Vec<CatalogItemId>,
    /// Whole external namespaces admitted in `builtin_plus_allowed` mode.
    pub allowed_namespaces: Vec<String>,
}

impl Default for NamespacePolicy {
    fn default() -> Self {
        Self {
            mode: NamespaceMode::BuiltinOnly,
            builtin_namespace: BUILTIN_NAMESPACE.to_string(),
            allowed_items: Vec::new(),
            allowed_namespaces: Vec::new(),
        }
    }
}

impl NamespacePolicy {
    pub fn builtin_only() -> Self {
        Self::default()
    }

    pub fn builtin_plus_allowed(
        allowed_items: impl IntoIterator<Item = CatalogItemId>,
        allowed_namespaces: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            mode: NamespaceMode::BuiltinPlusAllowed,
            allowed_items: allowed_items.into_iter().collect(),
            allowed_namespaces: allowed_namespaces.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn admits(&self, id: &CatalogItemId) -> bool {
        if id.namespace() == self.builtin_namespace {
            return true;
        }
        match self.mode {
            NamespaceMode::BuiltinOnly => false,
            NamespaceMode::BuiltinPlusAllowed => {
                self.allowed_items.contains(id)
                    || self
                        .allowed_namespaces
                        .iter()
                        .any(|namespace| namespace == id.namespace())
            }
        }
    }
}

impl LootConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_LOOT_CONFIG).expect("builtin loot config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, LootConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| LootConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        LootConfig::from_json_str(&contents).map_err(|source| LootConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Error)]
pub enum LootConfigError {
    #[error("failed to read loot config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse loot config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Metadata about where the active loot configuration came from.
#[derive(Resource, Debug, Clone, Default)]
pub struct LootConfigMetadata {
    path: Option<PathBuf>,
}

impl LootConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn is_builtin(&self) -> bool {
        self.path.is_none()
    }
}

/// Load the loot configuration from `LOOT_CONFIG_PATH`, falling back to the
/// built-in copy when the variable is unset or the file is unusable.
pub fn load_loot_config_from_env() -> (Arc<LootConfig>, LootConfigMetadata) {
    let Some(path) = env::var(LOOT_CONFIG_PATH_ENV).ok().map(PathBuf::from) else {
        tracing::info!(target: "loot_packages::config", "loot_config.loaded=builtin");
        return (LootConfig::builtin(), LootConfigMetadata::new(None));
    };

    match LootConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "loot_packages::config",
                path = %path.display(),
                give_starter_package = config.give_starter_package,
                "loot_config.loaded=file"
            );
            (Arc::new(config), LootConfigMetadata::new(Some(path)))
        }
        Err(err) => {
            tracing::warn!(
                target: "loot_packages::config",
                path = %path.display(),
                error = %err,
                "loot_config.load_failed"
            );
            tracing::info!(target: "loot_packages::config", "loot_config.loaded=builtin");
            (LootConfig::builtin(), LootConfigMetadata::new(None))
        }
    }
}
