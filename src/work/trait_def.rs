//! Work trait definition - the unit of work lent a resource.
//!
//! A unit of work is a computation that:
//! - Borrows a resource of type `Resource` for its whole run
//! - Produces a value of type `Output` on success
//! - May fail with an error of type `Error`
//!
//! # Design
//!
//! The trait follows the same pattern as `Future` and `Iterator`:
//! combinators return concrete types, and `.boxed()` is there for when
//! type erasure is needed.
//!
//! The resource is lent as `&mut`. The future returned by [`Work::run`]
//! may hold that borrow across awaits, which is what lets asynchronous
//! work query a connection without cloning it:
//!
//! ```rust,ignore
//! struct FetchRows;
//!
//! impl Work for FetchRows {
//!     type Output = Vec<Row>;
//!     type Error = DbError;
//!     type Resource = Connection;
//!
//!     async fn run(self, conn: &mut Connection) -> Result<Vec<Row>, DbError> {
//!         conn.query("SELECT * FROM rows").await
//!     }
//! }
//! ```

use std::future::Future;

/// A unit of work that runs against a borrowed resource.
///
/// Synchronous and asynchronous work share this one trait. Synchronous
/// closures are adapted with [`from_fn`](crate::work::from_fn), asynchronous
/// ones with [`from_async`](crate::work::from_async) or
/// [`from_boxed`](crate::work::from_boxed).
///
/// # Type Parameters
///
/// * `Output` - The success type produced by this work (must be `Send`)
/// * `Error` - The error type that may be produced (must be `Send`)
/// * `Resource` - The resource lent to the work (must be `Send`)
pub trait Work: Sized + Send {
    /// The success type produced by this work.
    type Output: Send;

    /// The error type that may be produced.
    type Error: Send;

    /// The resource this work operates on.
    type Resource: Send;

    /// Run this work against the lent resource.
    ///
    /// The returned future resolves to `Ok(output)` on success or
    /// `Err(error)` on failure. The resource is only borrowed; releasing it
    /// is the caller's job.
    fn run(
        self,
        resource: &mut Self::Resource,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}
