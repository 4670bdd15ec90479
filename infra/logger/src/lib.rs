//! # Logger
//!
//! Installs the global `tracing` subscriber for a process that wires modules.
//!
//! Output goes to the console, to a daily log file, or both. The filter starts at
//! the configured level, honours `RUST_LOG`, and with
//! [`LoggerBuilder::trace_discovery`] raises the discovery crates to `debug` so
//! scans, cache misses and dropped candidates show up.
//!
//! ```rust
//! use modwire_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder("my-app")
//!     .level(LevelFilter::INFO)
//!     .trace_discovery(true)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Crates whose `debug` events describe discovery and resolution.
const DISCOVERY_TARGETS: [&str; 3] = ["modwire_reflect", "modwire_inject", "modwire_kernel"];
/// Daily files kept in the log directory.
const KEPT_LOG_FILES: usize = 7;

/// Handle to the installed subscriber. Keep it alive for the life of the process;
/// dropping it flushes the log file.
#[derive(Debug)]
pub struct Logger {
    file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            console: true,
            log_dir: None,
            trace_discovery: false,
            directives: Vec::new(),
        }
    }

    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.file_guard.is_some()
    }
}

#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    console: bool,
    log_dir: Option<PathBuf>,
    trace_discovery: bool,
    directives: Vec<String>,
}

impl LoggerBuilder {
    /// Level for targets without a more specific directive.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Also write `<name>.<date>.log` files into `dir`, created if missing.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Logs every discovery and resolution step at `debug`.
    pub const fn trace_discovery(mut self, enabled: bool) -> Self {
        self.trace_discovery = enabled;
        self
    }

    /// Adds a filter directive such as `my_app::db=trace`. Later directives win.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Installs the subscriber process-wide.
    ///
    /// # Errors
    /// * [`LoggerError::Misconfigured`] for an empty name or when every output is off.
    /// * [`LoggerError::Directive`] if a directive does not parse.
    /// * [`LoggerError::LogDir`] or [`LoggerError::Appender`] if the log file cannot be opened.
    /// * [`LoggerError::AlreadyInstalled`] if another subscriber is already global.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::Misconfigured { message: "name must not be empty".into(), context: None });
        }
        if !self.console && self.log_dir.is_none() {
            return Err(LoggerError::Misconfigured {
                message: "console is off and no log directory is set".into(),
                context: None,
            });
        }

        let filter = self.filter()?;
        let console = self.console.then(|| fmt::layer().compact());

        let (file, file_guard) = match &self.log_dir {
            Some(dir) => {
                fs::create_dir_all(dir).context(format!("Creating {}", dir.display()))?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(&self.name)
                    .filename_suffix("log")
                    .max_log_files(KEPT_LOG_FILES)
                    .build(dir)
                    .context(format!("Opening log files in {}", dir.display()))?;
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
            },
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file)
            .try_init()
            .context(format!("Installing logger '{}'", self.name))?;

        Ok(Logger { file_guard })
    }

    fn directive_list(&self) -> Vec<String> {
        let mut list = Vec::new();
        if self.trace_discovery {
            list.extend(DISCOVERY_TARGETS.iter().map(|target| format!("{target}=debug")));
        }
        list.extend(self.directives.iter().cloned());
        list
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let mut filter = EnvFilter::builder().with_default_directive(self.level.into()).from_env_lossy();
        for raw in self.directive_list() {
            let directive = raw.parse::<Directive>().context(format!("Parsing '{raw}'"))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}
