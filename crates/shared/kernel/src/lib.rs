//! Kernel utilities shared across the wiring crates.
//! Keep this crate lightweight; it owns configuration loading and nothing else.
//!
//! ## Settings loading
//! ```rust
//! use modwire_kernel::config::load_config;
//! use modwire_kernel::domain::config::DiscoveryConfig;
//!
//! let cfg: DiscoveryConfig = load_config(Some("config/discovery"), "MODWIRE").unwrap_or_default();
//! assert!(cfg.cache_capacity > 0);
//! ```
//!
//! ## Module configuration
//! ```rust
//! use modwire_kernel::config::{ListKind, ModuleConfigLoader};
//! use modwire_kernel::domain::Environment;
//!
//! let table = ModuleConfigLoader::new()
//!     .file("does-not-exist.toml")
//!     .set(Environment::Prod, ListKind::Filter, ["(?i).*dummy.*"])
//!     .load()
//!     .into_table();
//! assert_eq!(table.get(Environment::Prod, ListKind::Filter), ["(?i).*dummy.*"]);
//! ```
pub mod config;

pub use modwire_domain as domain;
