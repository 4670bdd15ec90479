use crate::error::InjectError;
use crate::module::ModuleDescriptor;
use fxhash::FxHashMap;
use modwire_domain::constants::{MODULE_MARKER, MODULE_SUPERTYPE};
use modwire_reflect::{TypeCatalog, TypeInfo};
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable name-indexed set of module descriptors.
///
/// Stands in for by-name instantiation: every module a resolver may return has to be
/// registered here, whether it is found by scanning or listed statically.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Arc<FxHashMap<&'static str, ModuleDescriptor>>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    /// Returns the descriptor registered under `name`.
    ///
    /// # Errors
    /// Returns [`InjectError::UnknownModule`] if nothing is registered under that name.
    pub fn lookup(&self, name: &str) -> Result<&ModuleDescriptor, InjectError> {
        self.get(name).ok_or_else(|| InjectError::UnknownModule {
            name: name.to_owned().into(),
            context: None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over registered descriptors (for diagnostics).
    pub fn descriptors(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    /// In-memory type universe where every registered module carries the module
    /// marker and is a subtype of the module trait.
    #[must_use]
    pub fn catalog(&self) -> TypeCatalog {
        self.descriptors().fold(TypeCatalog::new(), |catalog, descriptor| {
            catalog.with(
                TypeInfo::new(descriptor.name()).marker(MODULE_MARKER).supertype(MODULE_SUPERTYPE),
            )
        })
    }
}

#[derive(Debug, Default)]
pub struct ModuleRegistryBuilder {
    modules: FxHashMap<&'static str, ModuleDescriptor>,
}

impl ModuleRegistryBuilder {
    /// Adds a descriptor. A later registration under the same name replaces the earlier one.
    #[must_use]
    pub fn register(mut self, descriptor: ModuleDescriptor) -> Self {
        debug!(module = descriptor.name(), environments = ?descriptor.environments(), "Registering module");
        if self.modules.insert(descriptor.name(), descriptor).is_some() {
            warn!(module = descriptor.name(), "Module registered twice, keeping the last descriptor");
        }
        self
    }

    /// Registers multiple descriptors at once.
    #[must_use]
    pub fn register_all<I>(self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = ModuleDescriptor>,
    {
        descriptors.into_iter().fold(self, Self::register)
    }

    #[must_use]
    pub fn build(self) -> ModuleRegistry {
        ModuleRegistry { modules: Arc::new(self.modules) }
    }
}
