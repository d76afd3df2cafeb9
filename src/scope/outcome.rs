//! Combining the work's outcome with the release result.
//!
//! Both the async runner and [`using_sync`](crate::using_sync) finish
//! through [`settle`], so the precedence rules live in one place.

use std::any::Any;
use std::panic;
use std::time::Duration;

use crate::scope::error::ScopeError;

/// How the unit of work ended.
pub(crate) enum Outcome<T, E> {
    Finished(Result<T, E>),
    Panicked(Box<dyn Any + Send>),
    Cancelled,
}

/// Why dispose did not succeed.
#[cfg_attr(not(feature = "async"), allow(dead_code))]
pub(crate) enum ReleaseFailure<E> {
    Failed(E),
    TimedOut(Duration),
}

pub(crate) fn log_outcome<T, E: std::fmt::Debug>(outcome: &Outcome<T, E>) {
    match outcome {
        Outcome::Finished(Ok(_)) => tracing::debug!("Unit of work completed; releasing resource"),
        Outcome::Finished(Err(err)) => {
            tracing::debug!("Unit of work failed: {:?}; releasing resource", err)
        }
        Outcome::Panicked(_) => {
            tracing::error!("Unit of work panicked; releasing resource before resuming panic")
        }
        Outcome::Cancelled => tracing::debug!("Scope cancelled; releasing resource"),
    }
}

pub(crate) fn log_release<E: std::fmt::Debug>(released: &Result<(), ReleaseFailure<E>>) {
    match released {
        Ok(()) => tracing::debug!("Resource released"),
        Err(ReleaseFailure::Failed(err)) => tracing::warn!("Resource release failed: {:?}", err),
        Err(ReleaseFailure::TimedOut(after)) => {
            tracing::warn!("Resource release timed out after {:?}", after)
        }
    }
}

/// Decide the run's single terminal outcome.
///
/// A release failure outranks the work's own result. A panic is resumed
/// after release no matter how release went.
pub(crate) fn settle<T, E>(
    outcome: Outcome<T, E>,
    released: Result<(), ReleaseFailure<E>>,
) -> Result<T, ScopeError<E>> {
    let work_error = match outcome {
        Outcome::Panicked(payload) => panic::resume_unwind(payload),
        Outcome::Finished(Ok(value)) => match released {
            Ok(()) => return Ok(value),
            Err(_) => None,
        },
        Outcome::Finished(Err(err)) => Some(err),
        Outcome::Cancelled => None,
    };

    match (released, work_error) {
        (Ok(()), Some(err)) => Err(ScopeError::Work(err)),
        (Ok(()), None) => Err(ScopeError::Cancelled),
        (Err(ReleaseFailure::Failed(error)), work_error) => {
            Err(ScopeError::Release { error, work_error })
        }
        (Err(ReleaseFailure::TimedOut(after)), work_error) => {
            Err(ScopeError::ReleaseTimeout { after, work_error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok<E>() -> Result<(), ReleaseFailure<E>> {
        Ok(())
    }

    #[test]
    fn success_with_clean_release_returns_value() {
        let result = settle::<_, &str>(Outcome::Finished(Ok(7)), ok());
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn work_failure_with_clean_release_is_work_error() {
        let result = settle::<i32, _>(Outcome::Finished(Err("bad query")), ok());
        assert_eq!(result, Err(ScopeError::Work("bad query")));
    }

    #[test]
    fn release_failure_outranks_success() {
        let result = settle(
            Outcome::Finished(Ok(7)),
            Err(ReleaseFailure::Failed("close failed")),
        );
        assert_eq!(
            result,
            Err(ScopeError::Release {
                error: "close failed",
                work_error: None
            })
        );
    }

    #[test]
    fn release_failure_carries_work_failure() {
        let result = settle::<i32, _>(
            Outcome::Finished(Err("bad query")),
            Err(ReleaseFailure::Failed("close failed")),
        );
        assert_eq!(
            result,
            Err(ScopeError::Release {
                error: "close failed",
                work_error: Some("bad query")
            })
        );
    }

    #[test]
    fn release_timeout_carries_work_failure() {
        let result = settle::<i32, _>(
            Outcome::Finished(Err("bad query")),
            Err(ReleaseFailure::TimedOut(Duration::from_millis(10))),
        );
        assert_eq!(
            result,
            Err(ScopeError::ReleaseTimeout {
                after: Duration::from_millis(10),
                work_error: Some("bad query")
            })
        );
    }

    #[test]
    fn cancellation_with_clean_release_is_cancelled() {
        let result = settle::<i32, &str>(Outcome::Cancelled, ok());
        assert_eq!(result, Err(ScopeError::Cancelled));
    }

    #[test]
    fn cancellation_with_failed_release_reports_release() {
        let result = settle::<i32, _>(
            Outcome::Cancelled,
            Err(ReleaseFailure::Failed("close failed")),
        );
        assert_eq!(
            result,
            Err(ScopeError::Release {
                error: "close failed",
                work_error: None
            })
        );
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn panic_is_resumed_after_release() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let _ = settle::<i32, &str>(Outcome::Panicked(payload), ok());
    }
}
