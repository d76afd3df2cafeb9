//! Synchronous scoped execution.
//!
//! The blocking counterpart of [`Loaner::run`](crate::Loaner::run): plain
//! closures, no futures, and release finishes before the call returns.

use std::panic::{self, AssertUnwindSafe};

use crate::scope::error::ScopeError;
use crate::scope::options::ScopeOptions;
use crate::scope::outcome::{log_outcome, log_release, settle, Outcome, ReleaseFailure};

/// Acquire with `acquire(config)`, lend the resource to `work`, release it
/// with `dispose`.
///
/// The outcome rules are the same as the async runner's:
///
/// - acquisition failure returns [`ScopeError::Acquire`] without calling
///   `work` or `dispose`
/// - `dispose` runs exactly once otherwise, including when `work` panics
///   (the panic is resumed after release)
/// - a failing `dispose` outranks the work's result
///
/// # Example
///
/// ```rust
/// use loaner::{using_sync, ScopeError};
///
/// let mut closed = Vec::new();
///
/// let result = using_sync(
///     "db://metrics",
///     |dsn| Ok::<_, String>(format!("conn[{}]", dsn)),
///     |conn| {
///         closed.push(conn);
///         Ok(())
///     },
///     |conn| Err::<usize, _>(format!("bad query on {}", conn)),
/// );
///
/// assert_eq!(
///     result,
///     Err(ScopeError::Work("bad query on conn[db://metrics]".to_string()))
/// );
/// assert_eq!(closed, vec!["conn[db://metrics]".to_string()]);
/// ```
pub fn using_sync<C, R, T, E, A, D, F>(
    config: C,
    acquire: A,
    dispose: D,
    work: F,
) -> Result<T, ScopeError<E>>
where
    A: FnOnce(C) -> Result<R, E>,
    D: FnOnce(R) -> Result<(), E>,
    F: FnOnce(&mut R) -> Result<T, E>,
    E: std::fmt::Debug,
{
    using_sync_with(&ScopeOptions::default(), config, acquire, dispose, work)
}

/// [`using_sync`] with runner options.
///
/// The scope's span is named after [`ScopeOptions::name`], the same way
/// [`Loaner`](crate::Loaner) names its runs. A blocking `dispose` cannot be
/// interrupted, so a configured release timeout does not apply here.
///
/// ```rust
/// use loaner::{using_sync_with, ScopeOptions};
///
/// let options = ScopeOptions::new().with_name("metrics-file");
/// let lines = using_sync_with(
///     &options,
///     "metrics.csv",
///     |path| Ok::<_, String>(vec![format!("# {}", path)]),
///     |_lines| Ok(()),
///     |lines| {
///         lines.push("metricA,0.25".to_string());
///         Ok(lines.len())
///     },
/// );
///
/// assert_eq!(lines, Ok(2));
/// ```
pub fn using_sync_with<C, R, T, E, A, D, F>(
    options: &ScopeOptions,
    config: C,
    acquire: A,
    dispose: D,
    work: F,
) -> Result<T, ScopeError<E>>
where
    A: FnOnce(C) -> Result<R, E>,
    D: FnOnce(R) -> Result<(), E>,
    F: FnOnce(&mut R) -> Result<T, E>,
    E: std::fmt::Debug,
{
    let span = tracing::debug_span!("scope", name = %options.name());
    let _entered = span.enter();

    let mut resource = match acquire(config) {
        Ok(resource) => resource,
        Err(err) => {
            tracing::debug!("Resource acquisition failed: {:?}", err);
            return Err(ScopeError::Acquire(err));
        }
    };
    tracing::debug!("Resource acquired");

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(&mut resource))) {
        Ok(result) => Outcome::Finished(result),
        Err(payload) => Outcome::Panicked(payload),
    };
    log_outcome(&outcome);

    let released = dispose(resource).map_err(ReleaseFailure::Failed);
    log_release(&released);

    settle(outcome, released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tracing_test::traced_test;

    #[derive(Debug, PartialEq)]
    struct Conn {
        id: u32,
        queries: Vec<String>,
    }

    fn open(id: u32) -> Result<Conn, String> {
        Ok(Conn {
            id,
            queries: Vec::new(),
        })
    }

    #[test]
    fn releases_after_success_and_returns_value() {
        let released = RefCell::new(Vec::new());

        let result = using_sync(
            1,
            open,
            |conn| {
                released.borrow_mut().push(conn);
                Ok(())
            },
            |conn| {
                conn.queries.push("SOME QUERY".to_string());
                Ok(conn.queries.len())
            },
        );

        assert_eq!(result, Ok(1));
        let released = released.into_inner();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].id, 1);
        assert_eq!(released[0].queries, vec!["SOME QUERY"]);
    }

    #[test]
    fn acquire_failure_skips_work_and_release() {
        let mut work_ran = false;
        let mut release_ran = false;

        let result = using_sync(
            (),
            |_| Err::<Conn, _>("conn refused".to_string()),
            |_| {
                release_ran = true;
                Ok(())
            },
            |_| {
                work_ran = true;
                Ok(())
            },
        );

        assert_eq!(result, Err(ScopeError::Acquire("conn refused".to_string())));
        assert!(!work_ran, "work must not run without a resource");
        assert!(!release_ran, "nothing to release when acquire fails");
    }

    #[test]
    fn release_failure_outranks_work_failure() {
        let result = using_sync(
            2,
            open,
            |_| Err("close failed".to_string()),
            |_| Err::<(), _>("bad query".to_string()),
        );

        assert_eq!(
            result,
            Err(ScopeError::Release {
                error: "close failed".to_string(),
                work_error: Some("bad query".to_string()),
            })
        );
    }

    #[test]
    fn release_failure_outranks_success() {
        let result = using_sync(3, open, |_| Err("close failed".to_string()), |_| Ok(42));

        assert_eq!(
            result,
            Err(ScopeError::Release {
                error: "close failed".to_string(),
                work_error: None,
            })
        );
    }

    #[test]
    fn panicking_work_still_releases() {
        let release_count = RefCell::new(0);

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            using_sync(
                4,
                open,
                |_| {
                    *release_count.borrow_mut() += 1;
                    Ok(())
                },
                |_| -> Result<(), String> { panic!("work exploded") },
            )
        }));

        assert!(caught.is_err(), "panic must be resumed after release");
        assert_eq!(*release_count.borrow(), 1);
    }

    #[test]
    #[traced_test]
    fn span_is_named_from_options() {
        let options = ScopeOptions::new().with_name("metrics-file");

        let result = using_sync_with(&options, 5, open, |_| Ok(()), |conn| Ok(conn.id));

        assert_eq!(result, Ok(5));
        assert!(logs_contain("metrics-file"));
        assert!(logs_contain("Resource released"));
    }

    #[test]
    #[traced_test]
    fn plain_runner_uses_the_default_scope_name() {
        let result = using_sync(6, open, |_| Ok(()), |conn| Ok(conn.id));

        assert_eq!(result, Ok(6));
        assert!(logs_contain("name=scope"));
    }
}
