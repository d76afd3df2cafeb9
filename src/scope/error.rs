//! Error type for scoped runs.

use std::time::Duration;

/// Error returned by a scoped run.
///
/// Each variant names the stage that decided the outcome. A release
/// failure always wins over a work failure; the work failure is kept in
/// `work_error` and reported as the [`source`](std::error::Error::source).
///
/// # Variants
///
/// - `Acquire` - acquisition failed, nothing was held, nothing released
/// - `Work` - the unit of work failed, the resource was released
/// - `Release` - dispose failed, after either outcome of the work
/// - `ReleaseTimeout` - dispose did not finish within the configured limit
/// - `Cancelled` - the cancel signal fired first, the resource was released
///
/// # Example
///
/// ```rust
/// use loaner::ScopeError;
///
/// let err: ScopeError<&str> = ScopeError::Release {
///     error: "close failed",
///     work_error: Some("bad query"),
/// };
///
/// assert!(err.is_release_failure());
/// assert_eq!(err.release_error(), Some(&"close failed"));
/// assert_eq!(err.work_error(), Some(&"bad query"));
/// assert_eq!(
///     err.to_string(),
///     "release failed: close failed (after work failed: bad query)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError<E> {
    /// Acquisition failed; no resource was held.
    Acquire(E),
    /// The unit of work failed; the resource was released.
    Work(E),
    /// Releasing the resource failed.
    Release {
        /// The error from dispose.
        error: E,
        /// The unit of work's error, if it had also failed.
        work_error: Option<E>,
    },
    /// Releasing the resource took longer than the configured limit.
    ReleaseTimeout {
        /// The limit that was exceeded.
        after: Duration,
        /// The unit of work's error, if it had also failed.
        work_error: Option<E>,
    },
    /// The run was cancelled before the work finished; the resource was released.
    Cancelled,
}

impl<E> ScopeError<E> {
    /// Returns the acquisition error, if any.
    pub fn acquire_error(&self) -> Option<&E> {
        match self {
            ScopeError::Acquire(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the unit of work's error, whether it is the primary failure
    /// or attached to a release failure.
    pub fn work_error(&self) -> Option<&E> {
        match self {
            ScopeError::Work(e) => Some(e),
            ScopeError::Release { work_error, .. } | ScopeError::ReleaseTimeout { work_error, .. } => {
                work_error.as_ref()
            }
            _ => None,
        }
    }

    /// Returns the dispose error, if any.
    pub fn release_error(&self) -> Option<&E> {
        match self {
            ScopeError::Release { error, .. } => Some(error),
            _ => None,
        }
    }

    /// True when releasing the resource failed or timed out.
    pub fn is_release_failure(&self) -> bool {
        matches!(
            self,
            ScopeError::Release { .. } | ScopeError::ReleaseTimeout { .. }
        )
    }

    /// True when the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScopeError::Cancelled)
    }

    /// Maps the error type using the provided function.
    pub fn map<F, E2>(self, f: F) -> ScopeError<E2>
    where
        F: Fn(E) -> E2,
    {
        match self {
            ScopeError::Acquire(e) => ScopeError::Acquire(f(e)),
            ScopeError::Work(e) => ScopeError::Work(f(e)),
            ScopeError::Release { error, work_error } => ScopeError::Release {
                error: f(error),
                work_error: work_error.map(&f),
            },
            ScopeError::ReleaseTimeout { after, work_error } => ScopeError::ReleaseTimeout {
                after,
                work_error: work_error.map(&f),
            },
            ScopeError::Cancelled => ScopeError::Cancelled,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for ScopeError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::Acquire(e) => write!(f, "acquire failed: {}", e),
            ScopeError::Work(e) => write!(f, "{}", e),
            ScopeError::Release { error, work_error } => {
                write!(f, "release failed: {}", error)?;
                if let Some(work_error) = work_error {
                    write!(f, " (after work failed: {})", work_error)?;
                }
                Ok(())
            }
            ScopeError::ReleaseTimeout { after, work_error } => {
                write!(f, "release timed out after {:?}", after)?;
                if let Some(work_error) = work_error {
                    write!(f, " (after work failed: {})", work_error)?;
                }
                Ok(())
            }
            ScopeError::Cancelled => write!(f, "scope cancelled before work completed"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ScopeError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScopeError::Acquire(e) | ScopeError::Work(e) => Some(e),
            ScopeError::Release {
                work_error: Some(work_error),
                ..
            } => Some(work_error),
            ScopeError::Release { error, .. } => Some(error),
            ScopeError::ReleaseTimeout { work_error, .. } => work_error
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            ScopeError::Cancelled => None,
        }
    }
}
