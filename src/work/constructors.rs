//! Free-standing constructors for units of work.
//!
//! These mirror the combinator types in [`crate::work::combinators`] and are
//! what most code calls.
//!
//! # Example
//!
//! ```rust
//! use loaner::work::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let sync = from_fn(|n: &mut i32| Ok::<_, String>(*n + 1));
//! let async_work = from_async(|n: &mut i32| {
//!     let seen = *n;
//!     async move { Ok::<_, String>(seen * 2) }
//! });
//!
//! let mut n = 20;
//! assert_eq!(sync.execute(&mut n).await, Ok(21));
//! assert_eq!(async_work.execute(&mut n).await, Ok(40));
//! # });
//! ```

use std::future::Future;

use crate::work::boxed::BoxFuture;
use crate::work::combinators::{FromAsync, FromBoxed, FromFn, Ready};

/// Work that succeeds with `value` without touching the resource.
pub fn pure<T, E, R>(value: T) -> Ready<T, E, R>
where
    T: Send,
    E: Send,
    R: Send,
{
    Ready::new(Ok(value))
}

/// Work that fails with `error` without touching the resource.
pub fn fail<T, E, R>(error: E) -> Ready<T, E, R>
where
    T: Send,
    E: Send,
    R: Send,
{
    Ready::new(Err(error))
}

/// Work that yields an already computed result.
pub fn from_result<T, E, R>(result: Result<T, E>) -> Ready<T, E, R>
where
    T: Send,
    E: Send,
    R: Send,
{
    Ready::new(result)
}

/// Work from a synchronous closure over the resource.
pub fn from_fn<F, T, E, R>(f: F) -> FromFn<F, R>
where
    F: FnOnce(&mut R) -> Result<T, E> + Send,
    T: Send,
    E: Send,
    R: Send,
{
    FromFn::new(f)
}

/// Work from a closure that returns an owned future.
pub fn from_async<F, Fut, T, E, R>(f: F) -> FromAsync<F, R>
where
    F: FnOnce(&mut R) -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
    R: Send,
{
    FromAsync::new(f)
}

/// Work from a closure that returns a boxed future borrowing the resource.
///
/// ```rust
/// use loaner::work::prelude::*;
///
/// # tokio_test::block_on(async {
/// let work = from_boxed(|lines: &mut Vec<String>| {
///     Box::pin(async move {
///         lines.push("SELECT metricA FROM metrics;".to_string());
///         Ok::<_, String>(lines.len())
///     })
/// });
///
/// let mut lines = Vec::new();
/// assert_eq!(work.execute(&mut lines).await, Ok(1));
/// # });
/// ```
pub fn from_boxed<F, T, E, R>(f: F) -> FromBoxed<F, R>
where
    F: for<'r> FnOnce(&'r mut R) -> BoxFuture<'r, Result<T, E>> + Send,
    T: Send,
    E: Send,
    R: Send,
{
    FromBoxed::new(f)
}
