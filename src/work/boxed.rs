//! BoxedWork - type-erased unit of work.
//!
//! Use `BoxedWork` when you need to:
//! - Store different units of work in a collection
//! - Return different work from match arms
//! - Pass work through a non-generic boundary

use std::future::Future;
use std::pin::Pin;

use crate::work::trait_def::Work;

/// A boxed future that is Send and lives for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe view of a [`Work`], consumed through a `Box`.
trait ErasedWork<T, E, R>: Send {
    fn run_boxed<'r>(self: Box<Self>, resource: &'r mut R) -> BoxFuture<'r, Result<T, E>>;
}

impl<W> ErasedWork<W::Output, W::Error, W::Resource> for W
where
    W: Work + 'static,
{
    fn run_boxed<'r>(
        self: Box<Self>,
        resource: &'r mut W::Resource,
    ) -> BoxFuture<'r, Result<W::Output, W::Error>> {
        Box::pin((*self).run(resource))
    }
}

/// A type-erased unit of work.
///
/// # Example
///
/// ```rust,ignore
/// use loaner::work::prelude::*;
///
/// fn pick(fast: bool) -> BoxedWork<usize, String, Vec<u8>> {
///     if fast {
///         pure(0).boxed()
///     } else {
///         from_fn(|buf: &mut Vec<u8>| Ok::<_, String>(buf.len())).boxed()
///     }
/// }
/// ```
pub struct BoxedWork<T, E, R> {
    inner: Box<dyn ErasedWork<T, E, R>>,
}

impl<T, E, R> std::fmt::Debug for BoxedWork<T, E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedWork")
            .field("inner", &"<work>")
            .finish()
    }
}

impl<T, E, R> BoxedWork<T, E, R>
where
    T: Send + 'static,
    E: Send + 'static,
    R: Send + 'static,
{
    /// Box any unit of work.
    pub fn new<W>(work: W) -> Self
    where
        W: Work<Output = T, Error = E, Resource = R> + 'static,
    {
        BoxedWork {
            inner: Box::new(work),
        }
    }
}

impl<T, E, R> Work for BoxedWork<T, E, R>
where
    T: Send,
    E: Send,
    R: Send,
{
    type Output = T;
    type Error = E;
    type Resource = R;

    fn run(self, resource: &mut R) -> impl Future<Output = Result<T, E>> + Send {
        self.inner.run_boxed(resource)
    }
}
