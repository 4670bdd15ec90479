use modwire_reflect::ReflectError;
use std::borrow::Cow;

/// A specialized [`InjectError`] enum of this crate.
#[modwire_derive::modwire_error]
pub enum InjectError {
    /// A module name (static list or scan result) has no registered descriptor.
    #[error("Unknown module{}: {name}", format_context(.context))]
    UnknownModule { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A module factory failed.
    #[error("Module instantiation failed{}: {message}", format_context(.context))]
    Instantiation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The type query cache could not answer a discovery query.
    #[error("Module discovery failed{}: {source}", format_context(.context))]
    Discovery { source: ReflectError, context: Option<Cow<'static, str>> },

    /// An exclusion pattern is not a valid regular expression.
    #[error("Invalid exclusion pattern{}: {source}", format_context(.context))]
    Pattern { source: regex::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal inject error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
