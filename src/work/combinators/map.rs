//! Map and MapErr - transform the outcome of a unit of work.

use crate::work::trait_def::Work;

/// Transforms the success value.
pub struct Map<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for Map<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("inner", &"<work>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, U> Work for Map<Inner, F>
where
    Inner: Work,
    F: FnOnce(Inner::Output) -> U + Send,
    U: Send,
{
    type Output = U;
    type Error = Inner::Error;
    type Resource = Inner::Resource;

    async fn run(self, resource: &mut Self::Resource) -> Result<U, Self::Error> {
        let value = self.inner.run(resource).await?;
        Ok((self.f)(value))
    }
}

/// Transforms the error value.
///
/// Mostly used to bring a unit of work's error type in line with the
/// provider's, since the runner reports both through one error type.
pub struct MapErr<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for MapErr<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapErr")
            .field("inner", &"<work>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, E2> Work for MapErr<Inner, F>
where
    Inner: Work,
    F: FnOnce(Inner::Error) -> E2 + Send,
    E2: Send,
{
    type Output = Inner::Output;
    type Error = E2;
    type Resource = Inner::Resource;

    async fn run(self, resource: &mut Self::Resource) -> Result<Self::Output, E2> {
        self.inner.run(resource).await.map_err(self.f)
    }
}
