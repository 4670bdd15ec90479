use crate::scanner::ScanError;
use std::borrow::Cow;
use std::sync::Arc;

/// A specialized [`ReflectError`] enum of this crate.
#[modwire_derive::modwire_error]
pub enum ReflectError {
    /// Invalid cache bounds supplied to the builder.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The scanner failed while loading a query; shared by every caller waiting on it.
    #[error("Type query failed{}: {source}", format_context(.context))]
    Scan { source: Arc<ScanError>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal reflect error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
