mod modules;

pub use modules::{ListKind, ModuleConfigLoader, ModuleSource, ModuleTable};

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Separator between nested keys in environment overlays (`MODWIRE__PROD__FILTER`).
pub const ENV_SEPARATOR: &str = "__";

/// Custom error type for config loading.
#[modwire_derive::modwire_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `discovery.toml`). If no path is
///    provided, it defaults to `"modwire"`. A missing file is skipped with a warning so that
///    defaults and overrides still apply.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with
///    `prefix` (e.g., `MODWIRE__CACHE_CAPACITY` maps to `cache_capacity`).
///
/// # Errors
/// This function will return an error if:
/// * The file exists but cannot be parsed.
/// * The merged values do not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use modwire_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     #[serde(default)]
///     capacity: u64,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local"), "APP").unwrap_or_default();
/// assert_eq!(cfg.capacity, 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>, prefix: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from("modwire"), |p| p.as_ref().to_path_buf());

    if has_config_file(&effective_path) {
        info!("Loading config from {}", effective_path.display());
    } else {
        warn!(path = %effective_path.display(), "Config file not found, using defaults and overrides");
    }

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(Environment::with_prefix(prefix).separator(ENV_SEPARATOR).try_parsing(true));

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// `config` resolves extension-less paths against every supported format.
fn has_config_file(path: &Path) -> bool {
    path.is_file() || path.with_extension("toml").is_file()
}
