//! The async scoped-resource runner.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::{pin, Pin};
use std::sync::Arc;
#[cfg(feature = "async")]
use std::time::Duration;

use futures::future::{self, Either, FutureExt};
use tracing::Instrument;

use crate::scope::error::ScopeError;
use crate::scope::guard::ReleaseGuard;
use crate::scope::options::ScopeOptions;
use crate::scope::outcome::{log_outcome, log_release, settle, Outcome, ReleaseFailure};
use crate::scope::provider::Provider;
use crate::work::Work;

/// Lends resources from a [`Provider`] to units of work.
///
/// Every run has three stages:
/// 1. **Acquire**: `provider.acquire(config)`; a failure ends the run with
///    [`ScopeError::Acquire`] and nothing is released
/// 2. **Use**: the unit of work runs against `&mut resource`
/// 3. **Release**: `provider.dispose(resource)`, exactly once, after the
///    work's outcome is known and before it is returned
///
/// Release also runs when the work panics (the panic resumes afterwards),
/// when a cancel signal fires, and, with the `async` feature, when the
/// run's future is dropped mid-work or mid-release.
///
/// # Runtime
///
/// `run` works on any executor as long as no release timeout is set.
/// Finishing a release after the run's future has been dropped needs a
/// tokio runtime: the guard spawns the dispose on the runtime found by
/// `tokio::runtime::Handle::try_current`.
/// Under another executor (or without the `async` feature) an abandoned
/// resource is dropped without release and an error is logged.
///
/// A `Loaner` is cheap to clone; clones share the provider.
///
/// # Example
///
/// ```rust
/// use loaner::prelude::*;
///
/// # tokio_test::block_on(async {
/// let loaner = Loaner::new(provider(
///     |dsn: &'static str| async move { Ok::<_, String>(vec![dsn.to_string()]) },
///     |_log: Vec<String>| async { Ok(()) },
/// ));
///
/// let rows = loaner
///     .run("db://metrics", from_fn(|log: &mut Vec<String>| {
///         log.push("SELECT 1".to_string());
///         Ok::<_, String>(log.len())
///     }))
///     .await;
///
/// assert_eq!(rows, Ok(2));
/// # });
/// ```
pub struct Loaner<P> {
    provider: Arc<P>,
    options: ScopeOptions,
}

impl<P> Clone for Loaner<P> {
    fn clone(&self) -> Self {
        Loaner {
            provider: Arc::clone(&self.provider),
            options: self.options.clone(),
        }
    }
}

impl<P> std::fmt::Debug for Loaner<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loaner")
            .field("provider", &"<provider>")
            .field("options", &self.options)
            .finish()
    }
}

impl<P> Loaner<P>
where
    P: Provider + 'static,
{
    /// Create a runner with default options.
    pub fn new(provider: P) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Create a runner around a provider that is already shared.
    pub fn from_arc(provider: Arc<P>) -> Self {
        Loaner {
            provider,
            options: ScopeOptions::default(),
        }
    }

    /// Replace the runner's options.
    pub fn with_options(mut self, options: ScopeOptions) -> Self {
        self.options = options;
        self
    }

    /// The provider resources come from.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The runner's options.
    pub fn options(&self) -> &ScopeOptions {
        &self.options
    }

    /// Acquire a resource, lend it to `work`, release it, return the outcome.
    ///
    /// See the [type-level docs](Loaner) for the stage-by-stage contract and
    /// [`ScopeError`] for how failures combine.
    pub async fn run<W>(
        &self,
        config: P::Config,
        work: W,
    ) -> Result<W::Output, ScopeError<P::Error>>
    where
        W: Work<Resource = P::Resource, Error = P::Error>,
    {
        self.run_until(config, work, future::pending::<()>()).await
    }

    /// Like [`run`](Loaner::run), but stops the work when `cancel` completes.
    ///
    /// `cancel` is raced against acquisition and then against the work.
    /// If it completes during acquisition, the acquire future is dropped and
    /// the run returns [`ScopeError::Cancelled`] with nothing to release. If
    /// it completes during the work, the work's future is dropped, the
    /// resource is released, and only then does the run return
    /// [`ScopeError::Cancelled`]. A failing release still takes precedence.
    /// A signal that has already fired wins over work that is ready.
    ///
    /// ```rust
    /// use loaner::prelude::*;
    /// use futures::channel::oneshot;
    ///
    /// # tokio_test::block_on(async {
    /// let loaner = Loaner::new(provider(
    ///     |_: ()| async { Ok::<_, String>(()) },
    ///     |_: ()| async { Ok(()) },
    /// ));
    ///
    /// let (stop, stopped) = oneshot::channel::<()>();
    /// stop.send(()).unwrap();
    ///
    /// let never = from_async(|_: &mut ()| futures::future::pending::<Result<(), String>>());
    /// let result = loaner.run_until((), never, async { let _ = stopped.await; }).await;
    ///
    /// assert!(result.unwrap_err().is_cancelled());
    /// # });
    /// ```
    pub async fn run_until<W, C>(
        &self,
        config: P::Config,
        work: W,
        cancel: C,
    ) -> Result<W::Output, ScopeError<P::Error>>
    where
        W: Work<Resource = P::Resource, Error = P::Error>,
        C: Future<Output = ()> + Send,
    {
        let span = tracing::debug_span!("scope", name = %self.options.name());
        self.scoped(config, work, cancel).instrument(span).await
    }

    /// Like [`run`](Loaner::run), but gives up after `limit`.
    ///
    /// The limit covers acquisition and the work, not the release. Bound
    /// the release with [`ScopeOptions::with_release_timeout`].
    ///
    /// Needs a tokio runtime with the time driver enabled.
    #[cfg(feature = "async")]
    pub async fn run_with_timeout<W>(
        &self,
        config: P::Config,
        work: W,
        limit: Duration,
    ) -> Result<W::Output, ScopeError<P::Error>>
    where
        W: Work<Resource = P::Resource, Error = P::Error>,
    {
        self.run_until(config, work, tokio::time::sleep(limit)).await
    }

    async fn scoped<W, C>(
        &self,
        config: P::Config,
        work: W,
        cancel: C,
    ) -> Result<W::Output, ScopeError<P::Error>>
    where
        W: Work<Resource = P::Resource, Error = P::Error>,
        C: Future<Output = ()> + Send,
    {
        let mut cancel = pin!(cancel);

        let acquired = {
            let acquire = pin!(self.provider.acquire(config));
            match future::select(cancel.as_mut(), acquire).await {
                Either::Left(((), _)) => None,
                Either::Right((acquired, _)) => Some(acquired),
            }
        };
        let resource = match acquired {
            None => {
                tracing::debug!("Scope cancelled during acquisition; nothing to release");
                return Err(ScopeError::Cancelled);
            }
            Some(Err(err)) => {
                tracing::debug!("Resource acquisition failed: {:?}", err);
                return Err(ScopeError::Acquire(err));
            }
            Some(Ok(resource)) => resource,
        };
        tracing::debug!("Resource acquired");

        let mut guard = ReleaseGuard::new(Arc::clone(&self.provider), resource);
        let outcome = lend(guard.resource_mut(), work, cancel).await;
        log_outcome(&outcome);

        let released = self.release(&mut guard).await;
        log_release(&released);

        settle(outcome, released)
    }

    async fn release(&self, guard: &mut ReleaseGuard<P>) -> Result<(), ReleaseFailure<P::Error>> {
        #[cfg(feature = "async")]
        if let Some(limit) = self.options.release_timeout() {
            let bounded = tokio::time::timeout(limit, guard.release()).await;
            return match bounded {
                Ok(result) => result.map_err(ReleaseFailure::Failed),
                Err(_) => {
                    guard.abandon();
                    Err(ReleaseFailure::TimedOut(limit))
                }
            };
        }

        guard.release().await.map_err(ReleaseFailure::Failed)
    }
}

/// Run `work` against the borrowed resource until it settles, panics or is
/// cancelled. The work's future is dropped before this returns.
///
/// `cancel` is polled first, so a signal that has already fired wins over
/// work that is ready on the same poll.
async fn lend<W, C>(
    resource: &mut W::Resource,
    work: W,
    cancel: Pin<&mut C>,
) -> Outcome<W::Output, W::Error>
where
    W: Work,
    C: Future<Output = ()>,
{
    let work = pin!(AssertUnwindSafe(async move { work.run(resource).await }).catch_unwind());

    match future::select(cancel, work).await {
        Either::Left(((), _)) => Outcome::Cancelled,
        Either::Right((Ok(result), _)) => Outcome::Finished(result),
        Either::Right((Err(payload), _)) => Outcome::Panicked(payload),
    }
}

/// Shorthand for `Loaner::new(provider).run(config, work)`.
///
/// ```rust
/// use loaner::prelude::*;
///
/// # tokio_test::block_on(async {
/// let result = using(
///     provider(
///         |_: ()| async { Err::<String, _>("conn refused".to_string()) },
///         |_: String| async { Ok(()) },
///     ),
///     (),
///     pure("unreachable"),
/// )
/// .await;
///
/// assert_eq!(result, Err(ScopeError::Acquire("conn refused".to_string())));
/// # });
/// ```
pub async fn using<P, W>(
    provider: P,
    config: P::Config,
    work: W,
) -> Result<W::Output, ScopeError<P::Error>>
where
    P: Provider + 'static,
    W: Work<Resource = P::Resource, Error = P::Error>,
{
    Loaner::new(provider).run(config, work).await
}
