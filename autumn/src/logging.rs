//! Logging for tools built on autumn.
//!
//! The library itself reports through the `log` facade. Command-line tools
//! use [`Logger`], a small stderr logger whose level comes from flags or the
//! `AUTUMN_LOG_MODE` environment variable, and can route load failures and
//! warnings through it with [`Logger::handlers`].

use std::env;
use std::fmt;

use crate::error::Error;
use crate::handlers::{Disposition, Handlers};

/// Environment variable consulted by [`init_logger`].
pub const LOG_MODE_VAR: &str = "AUTUMN_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// # Examples
///
/// ```
/// use autumn::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Only fatal errors.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Everything, including info and debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `quiet`, `normal` or `verbose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("loud").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }
}

/// A stderr logger filtered by [`LogLevel`].
///
/// Errors are printed at every level, warnings at `Normal` and above, info
/// and debug messages only at `Verbose`.
///
/// # Examples
///
/// ```
/// use autumn::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.warn("profile file not found: dev");
/// logger.debug("not printed at Normal");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs an error message.
    pub fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    /// Logs a warning message.
    pub fn warn(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("warning: {message}");
        }
    }

    /// Logs an informational message.
    pub fn info(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("info: {message}");
        }
    }

    /// Logs a debug message.
    pub fn debug(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("debug: {message}");
        }
    }

    /// Load handlers that report through this logger.
    ///
    /// With `lenient` set, failures are logged as warnings and loading
    /// continues; otherwise the first failure aborts the load. The aborting
    /// error is left for the caller to report.
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn::{Disposition, Error, Logger, LogLevel};
    ///
    /// let handlers = Logger::new(LogLevel::Quiet).handlers(true);
    /// let err = Error::UnknownKey { key: "x".into() };
    /// assert_eq!(handlers.fail(&err), Disposition::Continue);
    /// ```
    #[must_use]
    pub fn handlers(self, lenient: bool) -> Handlers {
        Handlers::new(
            move |err: &Error| {
                if lenient {
                    self.warn(&format!("ignoring: {err}"));
                    Disposition::Continue
                } else {
                    Disposition::Abort
                }
            },
            move |message: &str| self.warn(message),
        )
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

/// Builds a logger from CLI flags and the environment.
///
/// The priority order is:
/// 1. CLI flags (`verbose` wins over `quiet`)
/// 2. `AUTUMN_LOG_MODE`, ignored when unparseable
/// 3. `Normal`
///
/// # Examples
///
/// ```
/// use autumn::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);
/// assert_eq!(init_logger(false, true).level(), LogLevel::Quiet);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    env::var(LOG_MODE_VAR)
        .ok()
        .and_then(|value| LogLevel::parse(&value).ok())
        .map_or_else(Logger::default, Logger::new)
}
