//! Tracing support for units of work.

use crate::work::trait_def::Work;

/// A unit of work wrapped in a tracing span.
///
/// Created by [`WorkExt::instrument`](crate::work::WorkExt::instrument).
#[derive(Debug)]
pub struct Instrument<W> {
    pub(crate) inner: W,
    pub(crate) span: tracing::Span,
}

impl<W> Work for Instrument<W>
where
    W: Work,
{
    type Output = W::Output;
    type Error = W::Error;
    type Resource = W::Resource;

    async fn run(self, resource: &mut Self::Resource) -> Result<Self::Output, Self::Error> {
        use tracing::Instrument as _;
        self.inner.run(resource).instrument(self.span).await
    }
}
