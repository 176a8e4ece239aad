//! Failure and warning handlers used while loading.
//!
//! The loader never exits the process. A fatal load error is passed to the
//! fail handler, which decides whether loading continues or aborts; an abort
//! comes back to the caller as an `Err`. Warnings always return.

use std::fmt;

use crate::error::Error;

/// What the loader should do after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Ignore the failure and carry on with lower-precedence sources.
    Continue,
    /// Stop loading and return the error.
    Abort,
}

/// Consumes a fatal load error and decides how to proceed.
pub type FailFunc = dyn Fn(&Error) -> Disposition + Send + Sync;

/// Consumes a non-fatal message.
pub type WarnFunc = dyn Fn(&str) + Send + Sync;

/// The pair of handlers a load reports through.
///
/// # Examples
///
/// ```
/// use autumn::{Disposition, Error, Handlers};
/// use std::sync::{Arc, Mutex};
///
/// let warnings = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&warnings);
/// let handlers = Handlers::new(
///     |_err: &Error| Disposition::Abort,
///     move |msg: &str| sink.lock().unwrap().push(msg.to_string()),
/// );
///
/// handlers.warn("base configuration not found");
/// assert_eq!(warnings.lock().unwrap().len(), 1);
/// ```
pub struct Handlers {
    fail: Box<FailFunc>,
    warn: Box<WarnFunc>,
}

impl Handlers {
    /// Build handlers from two closures.
    pub fn new<F, W>(fail: F, warn: W) -> Self
    where
        F: Fn(&Error) -> Disposition + Send + Sync + 'static,
        W: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            fail: Box::new(fail),
            warn: Box::new(warn),
        }
    }

    /// Abort on every failure; send warnings to the `log` crate.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(
            |err: &Error| {
                log::error!("{err}");
                Disposition::Abort
            },
            |msg: &str| log::warn!("{msg}"),
        )
    }

    /// Continue past every failure, reporting it as a warning.
    #[must_use]
    pub fn lenient() -> Self {
        Self::new(
            |err: &Error| {
                log::warn!("ignoring configuration error: {err}");
                Disposition::Continue
            },
            |msg: &str| log::warn!("{msg}"),
        )
    }

    /// Report a fatal error and return the handler's decision.
    pub fn fail(&self, err: &Error) -> Disposition {
        (self.fail)(err)
    }

    /// Report a warning.
    pub fn warn(&self, message: &str) {
        (self.warn)(message);
    }

    /// Report `err`; return it if the fail handler aborts.
    ///
    /// # Errors
    ///
    /// Returns `err` when the decision is [`Disposition::Abort`].
    pub(crate) fn check(&self, err: Error) -> Result<(), Error> {
        match self.fail(&err) {
            Disposition::Continue => Ok(()),
            Disposition::Abort => Err(err),
        }
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self::strict()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}
