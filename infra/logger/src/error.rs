use std::borrow::Cow;

#[modwire_derive::modwire_error]
pub enum LoggerError {
    #[error("Logger misconfigured{}: {message}", format_context(context))]
    Misconfigured { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Bad log filter directive{}: {source}", format_context(context))]
    Directive {
        source: tracing_subscriber::filter::ParseError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Log directory unavailable{}: {source}", format_context(context))]
    LogDir { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Log file appender failed{}: {source}", format_context(context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// Another global subscriber was installed first.
    #[error("Logger already installed{}: {source}", format_context(context))]
    AlreadyInstalled {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal logger error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
