//! Facade crate for environment-scoped module wiring.
//! Re-exports the domain, kernel, reflect and inject crates and wires them together.
//! Keep this crate thin: it should compose other crates, not implement resolution logic.
//!
//! ## Usage
//! - Declare modules with `#[modwire_module(...)]`. The generated code refers to
//!   `modwire_inject`, so crates declaring modules depend on `modwire-inject` too.
//! - Register their descriptors on [`Modwire::builder`] and call [`Modwire::resolve_all`]
//!   (through [`Deref`](std::ops::Deref) to [`ModuleResolver`]).
//!
//! ```rust
//! use modwire::{Environment, Modwire, modwire_module};
//!
//! #[modwire_module(Test)]
//! #[derive(Default)]
//! struct InMemoryStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let wiring = Modwire::builder()
//!     .module_config(modwire::kernel::config::ModuleConfigLoader::new().file("no-such-file.toml"))
//!     .register(InMemoryStore::DESCRIPTOR)
//!     .build()?;
//!
//! assert_eq!(wiring.resolve_all(Environment::Test)?.len(), 1);
//! assert!(wiring.resolve_all(Environment::Prod)?.is_empty());
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{ModwireError, ModwireErrorExt};
pub use modwire_domain as domain;
pub use modwire_inject as inject;
pub use modwire_inject::{
    Environment, FilterConfiguration, InjectError, Module, ModuleDescriptor, ModuleFilter,
    ModuleRegistry, ModuleResolver, StaticModuleConfiguration, modwire_module,
};
pub use modwire_kernel as kernel;
pub use modwire_reflect as reflect;

use modwire_domain::config::DiscoveryConfig;
use modwire_domain::constants::ENV_PREFIX;
use modwire_inject::ModuleRegistryBuilder;
use modwire_kernel::config::{ModuleConfigLoader, load_config};
use modwire_reflect::{TypeQueryCache, TypeScanner};
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Wired resolver together with the settings it was built from.
#[derive(Debug, Clone)]
pub struct Modwire {
    settings: DiscoveryConfig,
    resolver: ModuleResolver,
}

impl Modwire {
    #[must_use]
    pub fn builder() -> ModwireBuilder {
        ModwireBuilder::default()
    }

    #[must_use]
    pub const fn settings(&self) -> &DiscoveryConfig {
        &self.settings
    }

    #[must_use]
    pub const fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }
}

impl Deref for Modwire {
    type Target = ModuleResolver;

    fn deref(&self) -> &Self::Target {
        &self.resolver
    }
}

/// Wires settings → cache → module configuration → resolver.
///
/// Defaults: built-in [`DiscoveryConfig`], the registry's own catalog as scanner,
/// and module configuration read from the file and prefix named in the settings.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ModwireBuilder {
    settings: Option<DiscoveryConfig>,
    settings_file: Option<PathBuf>,
    registry: ModuleRegistryBuilder,
    scanner: Option<Arc<dyn TypeScanner>>,
    module_config: Option<ModuleConfigLoader>,
}

impl ModwireBuilder {
    pub fn settings(mut self, settings: DiscoveryConfig) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Loads settings from `path` plus `MODWIRE__*` overrides at build time.
    /// Ignored when [`ModwireBuilder::settings`] is also given.
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn register(mut self, descriptor: ModuleDescriptor) -> Self {
        self.registry = self.registry.register(descriptor);
        self
    }

    pub fn register_all<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = ModuleDescriptor>,
    {
        self.registry = self.registry.register_all(descriptors);
        self
    }

    /// Replaces the registry catalog as the discovery backend.
    pub fn scanner(mut self, scanner: impl TypeScanner + 'static) -> Self {
        self.scanner = Some(Arc::new(scanner));
        self
    }

    /// Replaces the module configuration sources derived from the settings.
    pub fn module_config(mut self, loader: ModuleConfigLoader) -> Self {
        self.module_config = Some(loader);
        self
    }

    /// # Errors
    /// Returns an error if the settings file is malformed or the cache bounds are invalid.
    pub fn build(self) -> Result<Modwire, ModwireError> {
        let settings = match (self.settings, self.settings_file) {
            (Some(settings), _) => settings,
            (None, Some(path)) => load_config::<DiscoveryConfig>(Some(&path), ENV_PREFIX)
                .context(format!("Loading discovery settings from {}", path.display()))?,
            (None, None) => DiscoveryConfig::default(),
        };

        let registry = self.registry.build();
        let scanner: Arc<dyn TypeScanner> =
            self.scanner.unwrap_or_else(|| Arc::new(registry.catalog()));
        let cache = TypeQueryCache::builder().settings(&settings).shared_scanner(scanner).build()?;

        let source = self
            .module_config
            .unwrap_or_else(|| {
                ModuleConfigLoader::new()
                    .file(settings.module_config.clone())
                    .env_prefix(settings.env_prefix.clone())
            })
            .load();

        info!(modules = registry.len(), "Module wiring ready");

        let resolver = ModuleResolver::new(
            cache,
            registry,
            FilterConfiguration::from(source.clone()),
            StaticModuleConfiguration::from(source),
        );

        Ok(Modwire { settings, resolver })
    }
}
