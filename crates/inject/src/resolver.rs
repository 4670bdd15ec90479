use crate::config::{FilterConfiguration, StaticModuleConfiguration};
use crate::error::{InjectError, InjectErrorExt};
use crate::filter::ModuleFilter;
use crate::module::{Module, ModuleDescriptor};
use crate::registry::ModuleRegistry;
use modwire_domain::Environment;
use modwire_domain::constants::{MATCH_ALL, MODULE_MARKER};
use modwire_reflect::TypeQueryCache;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug)]
struct ModuleResolverInner {
    cache: TypeQueryCache,
    registry: ModuleRegistry,
    filters: FilterConfiguration,
    statics: StaticModuleConfiguration,
}

/// Selects, instantiates and filters the modules that apply to an environment.
///
/// Cheap to clone; every clone shares the same cache.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    inner: Arc<ModuleResolverInner>,
}

impl ModuleResolver {
    #[must_use]
    pub fn new(
        cache: TypeQueryCache,
        registry: ModuleRegistry,
        filters: FilterConfiguration,
        statics: StaticModuleConfiguration,
    ) -> Self {
        Self { inner: Arc::new(ModuleResolverInner { cache, registry, filters, statics }) }
    }

    /// Memoized scan results shared by every clone.
    #[must_use]
    pub fn cache(&self) -> &TypeQueryCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    /// Exclusion patterns per tier.
    #[must_use]
    pub fn filters(&self) -> &FilterConfiguration {
        &self.inner.filters
    }

    /// Module lists replacing discovery, per tier.
    #[must_use]
    pub fn statics(&self) -> &StaticModuleConfiguration {
        &self.inner.statics
    }

    /// Modules applying to `env` within `scope`, in type-name order.
    ///
    /// A non-empty static list for `env` replaces discovery and ignores `scope`.
    /// Otherwise the candidates are the registered types carrying the module marker in `scope`.
    /// Candidates not eligible for `env` are dropped; the rest are instantiated and then
    /// passed through the merged exclusion patterns.
    ///
    /// # Errors
    /// * [`InjectError::UnknownModule`] if a candidate name has no registered descriptor.
    /// * [`InjectError::Discovery`] if the scan fails.
    /// * [`InjectError::Pattern`] if an exclusion pattern is invalid.
    /// * Any error from a module factory.
    ///
    /// No partial list is returned on error.
    #[instrument(skip(self))]
    pub fn resolve(&self, env: Environment, scope: &str) -> Result<Vec<Arc<dyn Module>>, InjectError> {
        let filter = ModuleFilter::new(self.inner.filters.filters_for(env))?;

        let candidates = self.candidates(env, scope)?;
        let mut modules = Vec::with_capacity(candidates.len());
        for descriptor in candidates {
            if !descriptor.is_eligible(env) {
                debug!(module = descriptor.name(), environments = ?descriptor.environments(), "Module not declared for environment");
                continue;
            }
            let module: Arc<dyn Module> = Arc::from(descriptor.instantiate()?);
            if filter.accepts(module.name()) {
                modules.push(module);
            }
        }

        info!(count = modules.len(), "Resolved modules");
        Ok(modules)
    }

    /// Same as [`ModuleResolver::resolve`] over every type (`.*`).
    ///
    /// # Errors
    /// See [`ModuleResolver::resolve`].
    pub fn resolve_all(&self, env: Environment) -> Result<Vec<Arc<dyn Module>>, InjectError> {
        self.resolve(env, MATCH_ALL)
    }

    fn candidates(&self, env: Environment, scope: &str) -> Result<Vec<&ModuleDescriptor>, InjectError> {
        let statics = self.inner.statics.modules_for(env);
        let names: BTreeSet<String> = if statics.is_empty() {
            let found = self
                .inner
                .cache
                .lookup_by_annotation(MODULE_MARKER, scope)
                .context(format!("Scanning '{scope}' for modules"))?;
            found.iter().map(ToString::to_string).collect()
        } else {
            debug!(modules = ?statics, "Using static module list");
            statics
        };

        names
            .iter()
            .map(|name| self.inner.registry.lookup(name).context(format!("Resolving modules for {env}")))
            .collect()
    }
}
