//! Well-known identities shared by the discovery and wiring crates.

/// Scope pattern that matches every type in the catalog.
pub const MATCH_ALL: &str = ".*";

/// Marker carried by every registered wiring module.
pub const MODULE_MARKER: &str = "modwire::module";

/// Supertype identity of every registered wiring module.
pub const MODULE_SUPERTYPE: &str = "modwire::Module";

/// Default name of the module configuration file (tier tables with `filter`/`static` lists).
pub const MODULE_CONFIG_FILE: &str = "modwire-modules.toml";

/// Prefix for environment-variable overlays (`MODWIRE__PROD__FILTER`, ...).
pub const ENV_PREFIX: &str = "MODWIRE";

/// Config key suffix for exclusion patterns.
pub const FILTER_KEY: &str = "filter";

/// Config key suffix for static module lists.
pub const STATIC_KEY: &str = "static";
