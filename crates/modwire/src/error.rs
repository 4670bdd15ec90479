use modwire_inject::InjectError;
use modwire_kernel::config::ConfigError;
use modwire_reflect::ReflectError;
use std::borrow::Cow;

/// A specialized [`ModwireError`] enum of this crate.
#[modwire_derive::modwire_error]
pub enum ModwireError {
    /// Discovery settings could not be loaded.
    #[error("Settings error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    /// The type query cache rejected its bounds.
    #[error("Discovery cache error{}: {source}", format_context(.context))]
    Reflect { source: ReflectError, context: Option<Cow<'static, str>> },

    /// Module resolution failed.
    #[error("Module wiring error{}: {source}", format_context(.context))]
    Inject { source: InjectError, context: Option<Cow<'static, str>> },
}
