//! FromAsync and FromBoxed - units of work from async closures.

use std::future::Future;
use std::marker::PhantomData;

use crate::work::boxed::BoxFuture;
use crate::work::trait_def::Work;

/// Work from a closure returning an owned future.
///
/// The closure gets the resource first and must take out whatever the
/// future needs (a cloned handle, a query string, ...). The future itself
/// cannot borrow the resource; use [`FromBoxed`] for that.
///
/// # Example
///
/// ```rust,ignore
/// use loaner::work::prelude::*;
///
/// let work = from_async(|client: &mut Client| {
///     let handle = client.handle();
///     async move { handle.fetch("users").await }
/// });
/// ```
pub struct FromAsync<F, R> {
    pub(crate) f: F,
    pub(crate) _phantom: PhantomData<fn(&mut R)>,
}

impl<F, R> std::fmt::Debug for FromAsync<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromAsync")
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, R> FromAsync<F, R> {
    /// Create a new FromAsync work.
    pub fn new(f: F) -> Self {
        FromAsync {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut, T, E, R> Work for FromAsync<F, R>
where
    F: FnOnce(&mut R) -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
    R: Send,
{
    type Output = T;
    type Error = E;
    type Resource = R;

    fn run(self, resource: &mut R) -> impl Future<Output = Result<T, E>> + Send {
        (self.f)(resource)
    }
}

/// Work from a closure returning a boxed future that borrows the resource.
///
/// # Example
///
/// ```rust,ignore
/// use loaner::work::prelude::*;
///
/// let work = from_boxed(|conn: &mut Connection| {
///     Box::pin(async move { conn.query("SELECT 1").await })
/// });
/// ```
pub struct FromBoxed<F, R> {
    pub(crate) f: F,
    pub(crate) _phantom: PhantomData<fn(&mut R)>,
}

impl<F, R> std::fmt::Debug for FromBoxed<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromBoxed")
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, R> FromBoxed<F, R> {
    /// Create a new FromBoxed work.
    pub fn new(f: F) -> Self {
        FromBoxed {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, E, R> Work for FromBoxed<F, R>
where
    F: for<'r> FnOnce(&'r mut R) -> BoxFuture<'r, Result<T, E>> + Send,
    T: Send,
    E: Send,
    R: Send,
{
    type Output = T;
    type Error = E;
    type Resource = R;

    fn run(self, resource: &mut R) -> impl Future<Output = Result<T, E>> + Send {
        (self.f)(resource)
    }
}
