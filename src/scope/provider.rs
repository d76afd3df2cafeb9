//! Acquire/dispose capabilities.
//!
//! A [`Provider`] is the environment's half of a scope: it knows how to turn
//! a configuration into a live resource and how to give that resource back.
//! The runner never looks inside either.

use std::future::Future;
use std::marker::PhantomData;

/// A source of resources that must be released after use.
///
/// Implementations are shared between concurrent runs (the runner holds
/// them in an `Arc`), so both methods take `&self`.
///
/// # Example
///
/// ```rust,ignore
/// struct Postgres;
///
/// impl Provider for Postgres {
///     type Config = DbConfig;
///     type Resource = Connection;
///     type Error = DbError;
///
///     async fn acquire(&self, config: DbConfig) -> Result<Connection, DbError> {
///         Connection::open(&config).await
///     }
///
///     async fn dispose(&self, conn: Connection) -> Result<(), DbError> {
///         conn.close().await
///     }
/// }
/// ```
pub trait Provider: Send + Sync {
    /// Configuration passed unmodified to [`acquire`](Provider::acquire).
    type Config: Send;

    /// The resource handed to units of work.
    type Resource: Send;

    /// Error reported by both acquisition and disposal.
    type Error: Send + std::fmt::Debug;

    /// Obtain a resource.
    fn acquire(
        &self,
        config: Self::Config,
    ) -> impl Future<Output = Result<Self::Resource, Self::Error>> + Send;

    /// Release a resource obtained from [`acquire`](Provider::acquire).
    ///
    /// Called exactly once per acquired resource.
    fn dispose(&self, resource: Self::Resource)
        -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// A [`Provider`] built from two closures.
///
/// Created by [`provider`].
pub struct FnProvider<A, D, C> {
    acquire: A,
    dispose: D,
    _config: PhantomData<fn(C)>,
}

impl<A, D, C> std::fmt::Debug for FnProvider<A, D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProvider")
            .field("acquire", &"<function>")
            .field("dispose", &"<function>")
            .finish()
    }
}

impl<A, D, C, AF, DF, R, E> Provider for FnProvider<A, D, C>
where
    A: Fn(C) -> AF + Send + Sync,
    AF: Future<Output = Result<R, E>> + Send,
    D: Fn(R) -> DF + Send + Sync,
    DF: Future<Output = Result<(), E>> + Send,
    C: Send,
    R: Send,
    E: Send + std::fmt::Debug,
{
    type Config = C;
    type Resource = R;
    type Error = E;

    fn acquire(&self, config: C) -> impl Future<Output = Result<R, E>> + Send {
        (self.acquire)(config)
    }

    fn dispose(&self, resource: R) -> impl Future<Output = Result<(), E>> + Send {
        (self.dispose)(resource)
    }
}

/// Build a [`Provider`] from an acquire closure and a dispose closure.
///
/// # Example
///
/// ```rust
/// use loaner::{provider, Provider};
///
/// # tokio_test::block_on(async {
/// let files = provider(
///     |name: &'static str| async move { Ok::<_, String>(format!("handle:{}", name)) },
///     |_handle: String| async { Ok(()) },
/// );
///
/// let handle = files.acquire("report.csv").await.unwrap();
/// assert_eq!(handle, "handle:report.csv");
/// assert_eq!(files.dispose(handle).await, Ok(()));
/// # });
/// ```
pub fn provider<A, D, C, AF, DF, R, E>(acquire: A, dispose: D) -> FnProvider<A, D, C>
where
    A: Fn(C) -> AF + Send + Sync,
    AF: Future<Output = Result<R, E>> + Send,
    D: Fn(R) -> DF + Send + Sync,
    DF: Future<Output = Result<(), E>> + Send,
    C: Send,
    R: Send,
    E: Send + std::fmt::Debug,
{
    FnProvider {
        acquire,
        dispose,
        _config: PhantomData,
    }
}
