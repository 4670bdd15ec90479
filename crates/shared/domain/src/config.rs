use crate::constants::{ENV_PREFIX, MODULE_CONFIG_FILE};
use serde::Deserialize;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Settings for discovery caching and module configuration sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfigInner {
    /// Maximum number of cached query results per cache.
    pub cache_capacity: u64,
    /// Time-to-live of a cached query result, in milliseconds (expire after write).
    pub cache_ttl_ms: u64,
    /// Optional key-list module configuration file.
    pub module_config: PathBuf,
    /// Prefix of environment-variable overlays for the module configuration.
    pub env_prefix: String,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(flatten, default)]
    inner: Arc<DiscoveryConfigInner>,
}

impl DiscoveryConfig {
    /// Time-to-live of a cached query result.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.inner.cache_ttl_ms)
    }
}

impl Deref for DiscoveryConfig {
    type Target = DiscoveryConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<DiscoveryConfigInner> for DiscoveryConfig {
    fn from(inner: DiscoveryConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

// --- Default ---

impl Default for DiscoveryConfigInner {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            cache_ttl_ms: 100_000,
            module_config: PathBuf::from(MODULE_CONFIG_FILE),
            env_prefix: ENV_PREFIX.to_owned(),
        }
    }
}
