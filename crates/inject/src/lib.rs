//! Environment-scoped module wiring.
//!
//! Modules declare the deployment tiers they apply to with `#[modwire_module(...)]` and are
//! registered in a [`ModuleRegistry`]. A [`ModuleResolver`] then answers "which modules apply
//! to this environment" by combining:
//!
//! 1.  **[`StaticModuleConfiguration`]**: explicit per-tier module lists that replace discovery.
//! 2.  **[`TypeQueryCache`](modwire_reflect::TypeQueryCache)**: memoized marker scans otherwise.
//! 3.  **Eligibility**: a module declared for `E` applies to `r` if `E` contains `r` or `All`.
//! 4.  **[`ModuleFilter`]**: exclusion patterns merged from every compatible tier
//!     ([`FilterConfiguration`]).
//!
//! # Examples
//!
//! ```rust
//! use modwire_inject::{
//!     Environment, FilterConfiguration, InjectError, ModuleRegistry, ModuleResolver,
//!     StaticModuleConfiguration, modwire_module,
//! };
//! use modwire_reflect::TypeQueryCache;
//!
//! #[modwire_module(Prod)]
//! #[derive(Default)]
//! struct Metrics;
//!
//! #[modwire_module(All)]
//! #[derive(Default)]
//! struct Storage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ModuleRegistry::builder()
//!     .register(Metrics::DESCRIPTOR)
//!     .register(Storage::DESCRIPTOR)
//!     .build();
//! let cache = TypeQueryCache::builder().scanner(registry.catalog()).build()?;
//!
//! let resolver = ModuleResolver::new(
//!     cache,
//!     registry,
//!     FilterConfiguration::default(),
//!     StaticModuleConfiguration::default(),
//! );
//!
//! assert_eq!(resolver.resolve_all(Environment::Prod)?.len(), 2);
//! assert_eq!(resolver.resolve_all(Environment::Test)?.len(), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod filter;
mod module;
mod registry;
mod resolver;

pub use config::{FilterConfiguration, StaticModuleConfiguration};
pub use error::{InjectError, InjectErrorExt};
pub use filter::ModuleFilter;
pub use module::{Module, ModuleDescriptor, ModuleFactory};
pub use modwire_derive::modwire_module;
pub use modwire_domain::Environment;
pub use registry::{ModuleRegistry, ModuleRegistryBuilder};
pub use resolver::ModuleResolver;
