use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::RunError;

/// Cooperative cancellation token shared between the controller and one run.
///
/// Every clone observes the same flag, so the controller can keep one copy and hand another to the
/// [`Stepper`](crate::Stepper) driving a sorter.
///
/// # Example
/// ```
/// use sortscope_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(token.checkpoint().is_ok());
///
/// token.clone().cancel();
/// assert!(token.is_cancelled());
/// assert!(token.checkpoint().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns [`RunError::Cancelled`] once cancellation has been requested.
    ///
    /// Sorters call this before every comparison, exchange and recursive call.
    pub fn checkpoint(&self) -> Result<(), RunError> {
        if self.is_cancelled() {
            Err(RunError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Returns `true` if both tokens share the same flag.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}
