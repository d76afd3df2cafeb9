//! Ready - work whose result is known before the resource is lent.

use std::marker::PhantomData;

use crate::work::trait_def::Work;

/// A unit of work that settles on its first poll with a result fixed at
/// construction.
///
/// The resource is borrowed for the run like any other work, then handed
/// back untouched. [`pure`](crate::work::pure), [`fail`](crate::work::fail)
/// and [`from_result`](crate::work::from_result) all build one.
///
/// Handy at the end of an `and_then` chain, for short-circuiting a
/// cached answer, and as a stand-in in runner tests.
///
/// ```rust,ignore
/// use loaner::work::prelude::*;
///
/// let cached = from_result::<_, String, Connection>(cache.get("metricA").ok_or(miss));
/// let value = loaner.run(config, cached).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Ready<T, E, R> {
    result: Result<T, E>,
    _resource: PhantomData<fn(&mut R)>,
}

impl<T, E, R> Ready<T, E, R> {
    /// Work that will yield `result`.
    pub fn new(result: Result<T, E>) -> Self {
        Ready {
            result,
            _resource: PhantomData,
        }
    }

    /// The result this work yields when run.
    pub fn result(&self) -> &Result<T, E> {
        &self.result
    }
}

impl<T, E, R> Work for Ready<T, E, R>
where
    T: Send,
    E: Send,
    R: Send,
{
    type Output = T;
    type Error = E;
    type Resource = R;

    async fn run(self, _resource: &mut R) -> Result<T, E> {
        self.result
    }
}
