//! Extension trait providing combinator methods for all units of work.
//!
//! `WorkExt` is automatically implemented for every type that implements
//! [`Work`]. It provides `map`, `map_err`, `and_then`, `boxed` and
//! `instrument`.

use crate::work::boxed::BoxedWork;
use crate::work::combinators::{AndThen, Map, MapErr};
use crate::work::trait_def::Work;
use crate::work::tracing::Instrument;

/// Extension trait providing combinator methods for all units of work.
///
/// # Example
///
/// ```rust
/// use loaner::work::prelude::*;
///
/// # tokio_test::block_on(async {
/// let work = from_fn(|log: &mut Vec<String>| {
///     log.push("SELECT 1".to_string());
///     Ok::<_, String>(log.len())
/// })
/// .map(|n| n * 10)
/// .map_err(|e| format!("query failed: {}", e));
///
/// let mut log = Vec::new();
/// assert_eq!(work.execute(&mut log).await, Ok(10));
/// # });
/// ```
pub trait WorkExt: Work {
    /// Transform the success value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnOnce(Self::Output) -> U + Send,
        U: Send,
    {
        Map { inner: self, f }
    }

    /// Transform the error value.
    ///
    /// The runner reports acquisition, work and release failures through a
    /// single error type, so work built against its own error type is
    /// usually lifted with `map_err(AppError::from)` before it is run.
    fn map_err<E2, F>(self, f: F) -> MapErr<Self, F>
    where
        F: FnOnce(Self::Error) -> E2 + Send,
        E2: Send,
    {
        MapErr { inner: self, f }
    }

    /// Chain a dependent unit of work on the same resource.
    ///
    /// If this work succeeds, `f` builds the next one, which then runs
    /// against the same borrowed resource. If this work fails, the error
    /// is propagated and `f` is never called.
    fn and_then<W2, F>(self, f: F) -> AndThen<Self, F>
    where
        W2: Work<Error = Self::Error, Resource = Self::Resource>,
        F: FnOnce(Self::Output) -> W2 + Send,
    {
        AndThen { inner: self, f }
    }

    /// Convert to a boxed unit of work for type erasure.
    fn boxed(self) -> BoxedWork<Self::Output, Self::Error, Self::Resource>
    where
        Self: 'static,
    {
        BoxedWork::new(self)
    }

    /// Wrap this work in a tracing span.
    ///
    /// The span is entered on every poll of the work and exited when it
    /// completes.
    ///
    /// ```rust,ignore
    /// let work = fetch_metrics(&fields)
    ///     .instrument(tracing::debug_span!("fetch_metrics", count = fields.len()));
    /// ```
    fn instrument(self, span: tracing::Span) -> Instrument<Self> {
        Instrument { inner: self, span }
    }

    /// Run this work directly against a resource the caller already holds.
    ///
    /// No acquisition and no release happen here. This is the building
    /// block the runner uses, and is handy in tests.
    #[allow(async_fn_in_trait)]
    async fn execute(self, resource: &mut Self::Resource) -> Result<Self::Output, Self::Error> {
        self.run(resource).await
    }
}

impl<W: Work> WorkExt for W {}
