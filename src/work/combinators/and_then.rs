//! AndThen - chains dependent units of work on the same resource.

use crate::work::trait_def::Work;

/// Chains dependent work.
///
/// Both steps borrow the same resource, one after the other. The chained
/// work must have the same error type; use `map_err` first when it does not.
///
/// # Example
///
/// ```rust,ignore
/// use loaner::work::prelude::*;
///
/// let work = from_fn(|conn: &mut Connection| conn.begin())
///     .and_then(|tx_id| from_fn(move |conn: &mut Connection| conn.commit(tx_id)));
/// ```
pub struct AndThen<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for AndThen<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndThen")
            .field("inner", &"<work>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, W2> Work for AndThen<Inner, F>
where
    Inner: Work,
    W2: Work<Error = Inner::Error, Resource = Inner::Resource>,
    F: FnOnce(Inner::Output) -> W2 + Send,
{
    type Output = W2::Output;
    type Error = Inner::Error;
    type Resource = Inner::Resource;

    async fn run(self, resource: &mut Self::Resource) -> Result<Self::Output, Self::Error> {
        let value = self.inner.run(resource).await?;
        (self.f)(value).run(resource).await
    }
}
