//! Module contract and the registration descriptor generated by `#[modwire_module]`.

use crate::error::{InjectError, InjectErrorExt};
use modwire_domain::Environment;
use std::any::Any;
use std::fmt::{self, Debug};

/// A unit of wiring selected per environment.
///
/// Implemented by `#[modwire_module(...)]`; hand-written impls must return the
/// registered descriptor name from [`Module::name`].
pub trait Module: Any + Debug + Send + Sync {
    /// Fully-qualified type name, the identity used by filters and static lists.
    fn name(&self) -> &'static str;

    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Module {
    /// Downcasts to the concrete module type.
    #[must_use]
    pub fn downcast_ref<T: Module>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Constructs a fresh module instance.
pub type ModuleFactory = fn() -> Result<Box<dyn Module>, InjectError>;

/// Registration record of a module type: its name, declared tiers and factory.
#[derive(Clone, Copy)]
pub struct ModuleDescriptor {
    name: &'static str,
    environments: &'static [Environment],
    factory: ModuleFactory,
}

impl ModuleDescriptor {
    #[must_use]
    pub const fn new(
        name: &'static str,
        environments: &'static [Environment],
        factory: ModuleFactory,
    ) -> Self {
        Self { name, environments, factory }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Tiers the module was declared for.
    #[must_use]
    pub const fn environments(&self) -> &'static [Environment] {
        self.environments
    }

    /// Whether the module may be wired when `requested` is asked for.
    ///
    /// A declared tier qualifies when it equals `requested` or is [`Environment::All`].
    /// Requesting `All` therefore selects only modules declared for `All`.
    #[must_use]
    pub fn is_eligible(&self, requested: Environment) -> bool {
        requested.admits_any(self.environments)
    }

    /// Runs the factory.
    ///
    /// # Errors
    /// Whatever the factory returns, with the module name attached as context.
    pub fn instantiate(&self) -> Result<Box<dyn Module>, InjectError> {
        (self.factory)().context(format!("Instantiating {}", self.name))
    }
}

impl Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("environments", &self.environments)
            .finish_non_exhaustive()
    }
}
