//! Drop guard that finishes a release if the run is abandoned.

use std::mem;
use std::sync::Arc;

use crate::scope::provider::Provider;
use crate::work::BoxFuture;

enum Held<R, E> {
    Lent(R),
    Releasing(BoxFuture<'static, Result<(), E>>),
    Done,
}

/// Owns the resource from acquisition until dispose has finished.
///
/// While the work runs the resource sits in the guard and is lent out
/// through [`resource_mut`](ReleaseGuard::resource_mut). Release moves it
/// into an owned dispose future that the guard keeps polling. If the
/// runner's future is dropped in either phase, the guard hands what is left
/// (the resource, or the half-finished dispose) to the current tokio
/// runtime.
pub(crate) struct ReleaseGuard<P>
where
    P: Provider + 'static,
{
    provider: Arc<P>,
    held: Held<P::Resource, P::Error>,
}

impl<P> ReleaseGuard<P>
where
    P: Provider + 'static,
{
    pub(crate) fn new(provider: Arc<P>, resource: P::Resource) -> Self {
        ReleaseGuard {
            provider,
            held: Held::Lent(resource),
        }
    }

    pub(crate) fn resource_mut(&mut self) -> &mut P::Resource {
        match &mut self.held {
            Held::Lent(resource) => resource,
            _ => unreachable!("resource is lent until release begins"),
        }
    }

    fn begin_release(&mut self) {
        if let Held::Lent(resource) = mem::replace(&mut self.held, Held::Done) {
            let provider = Arc::clone(&self.provider);
            self.held = Held::Releasing(Box::pin(async move { provider.dispose(resource).await }));
        }
    }

    /// Dispose of the resource.
    ///
    /// If this future is dropped before dispose finishes, the guard keeps
    /// the dispose future and completes it on drop.
    pub(crate) async fn release(&mut self) -> Result<(), P::Error> {
        self.begin_release();
        let result = match &mut self.held {
            Held::Releasing(dispose) => dispose.await,
            _ => Ok(()),
        };
        self.held = Held::Done;
        result
    }

    /// Drop an in-flight dispose without finishing it.
    #[cfg(feature = "async")]
    pub(crate) fn abandon(&mut self) {
        self.held = Held::Done;
    }
}

impl<P> Drop for ReleaseGuard<P>
where
    P: Provider + 'static,
{
    fn drop(&mut self) {
        let dispose = match mem::replace(&mut self.held, Held::Done) {
            Held::Done => return,
            Held::Releasing(dispose) => {
                tracing::debug!("Scope dropped mid-release; finishing release in background");
                dispose
            }
            Held::Lent(resource) => {
                tracing::debug!("Scope dropped mid-work; releasing resource in background");
                let provider = Arc::clone(&self.provider);
                Box::pin(async move { provider.dispose(resource).await })
            }
        };

        #[cfg(feature = "async")]
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                match dispose.await {
                    Ok(()) => tracing::debug!("Background resource release completed"),
                    Err(err) => tracing::warn!("Background resource release failed: {:?}", err),
                }
            });
            return;
        }

        tracing::error!(
            "Scope dropped with no tokio runtime to release on; resource dropped without release"
        );
        drop(dispose);
    }
}
