//! # Loaner
//!
//! Scoped resource execution: acquire a resource, lend it to a unit of
//! work, and release it exactly once, whatever the work does.
//!
//! ## The pattern
//!
//! Resource handling code tends to wrap every piece of logic in the same
//! acquire / `try` / `finally` / dispose scaffolding. A loaner owns that
//! scaffolding once; callers hand it only the logic in between.
//!
//! - [`Provider`] supplies the two capabilities: `acquire(config)` and
//!   `dispose(resource)`
//! - [`Work`] is the logic, borrowing the resource as `&mut`
//! - [`Loaner`] runs acquire → work → release and reports one outcome
//!
//! ## Quick Example
//!
//! ```rust
//! use loaner::prelude::*;
//!
//! #[derive(Debug)]
//! struct Connection {
//!     host: String,
//!     executed: Vec<String>,
//! }
//!
//! # tokio_test::block_on(async {
//! let db = Loaner::new(provider(
//!     |host: String| async move {
//!         Ok::<_, String>(Connection { host, executed: Vec::new() })
//!     },
//!     |conn: Connection| async move {
//!         assert_eq!(conn.executed.len(), 1);
//!         Ok(())
//!     },
//! ));
//!
//! let fetch = parameterize(|fields: Vec<&'static str>| {
//!     from_fn(move |conn: &mut Connection| {
//!         let sql = format!("SELECT {} FROM metrics;", fields.join(", "));
//!         conn.executed.push(sql.clone());
//!         Ok::<_, String>(format!("{} <- {}", conn.host, sql))
//!     })
//! });
//!
//! let result = db
//!     .run("some-host".to_string(), fetch(vec!["metricA", "metricB"]))
//!     .await;
//!
//! assert_eq!(
//!     result,
//!     Ok("some-host <- SELECT metricA, metricB FROM metrics;".to_string())
//! );
//! # });
//! ```
//!
//! ## Failures
//!
//! A run ends in exactly one outcome. See [`ScopeError`] for how
//! acquisition, work and release failures combine; a failing release is
//! never swallowed.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod scope;
pub mod work;

// Re-exports
pub use scope::{
    provider, using, using_sync, using_sync_with, FnProvider, Loaner, Provider, ScopeError,
    ScopeOptions,
};
pub use work::{Work, WorkExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::scope::{
        provider, using, using_sync, using_sync_with, FnProvider, Loaner, Provider, ScopeError,
        ScopeOptions,
    };
    pub use crate::work::prelude::*;
}
