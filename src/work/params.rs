//! Parameterized units of work.
//!
//! A parameterized unit of work is plain partial application: fix the
//! parameters now, lend the resource later.
//!
//! ```rust
//! use loaner::work::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let count_rows = parameterize(|table: &'static str| {
//!     from_fn(move |queries: &mut Vec<String>| {
//!         queries.push(format!("SELECT COUNT(*) FROM {};", table));
//!         Ok::<_, String>(queries.len())
//!     })
//! });
//!
//! let mut queries = Vec::new();
//! count_rows("users").execute(&mut queries).await.unwrap();
//! count_rows("orders").execute(&mut queries).await.unwrap();
//! assert_eq!(queries[1], "SELECT COUNT(*) FROM orders;");
//! # });
//! ```

use std::marker::PhantomData;

use crate::work::trait_def::Work;

/// A unit of work closed over fixed parameters.
///
/// Created by [`with_params`] or by the factory [`parameterize`] returns.
pub struct WithParams<P, F, W> {
    params: P,
    f: F,
    _marker: PhantomData<fn() -> W>,
}

impl<P: std::fmt::Debug, F, W> std::fmt::Debug for WithParams<P, F, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithParams")
            .field("params", &self.params)
            .field("f", &"<function>")
            .finish()
    }
}

impl<P, F, W> WithParams<P, F, W> {
    /// The parameters this work was closed over.
    pub fn params(&self) -> &P {
        &self.params
    }
}

impl<P, F, W> Work for WithParams<P, F, W>
where
    P: Send,
    F: FnOnce(P) -> W + Send,
    W: Work,
{
    type Output = W::Output;
    type Error = W::Error;
    type Resource = W::Resource;

    async fn run(self, resource: &mut Self::Resource) -> Result<Self::Output, Self::Error> {
        (self.f)(self.params).run(resource).await
    }
}

/// Close a unit of work over `params`.
///
/// `f` is only called when the work runs, with the resource already
/// acquired.
pub fn with_params<P, F, W>(params: P, f: F) -> WithParams<P, F, W>
where
    P: Send,
    F: FnOnce(P) -> W + Send,
    W: Work,
{
    WithParams {
        params,
        f,
        _marker: PhantomData,
    }
}

/// Turn a work builder into a reusable factory of parameterized work.
///
/// Each call of the returned function fixes one set of parameters.
pub fn parameterize<P, F, W>(f: F) -> impl Fn(P) -> WithParams<P, F, W>
where
    P: Send,
    F: FnOnce(P) -> W + Clone + Send,
    W: Work,
{
    move |params| with_params(params, f.clone())
}
