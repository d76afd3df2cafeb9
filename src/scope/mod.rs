//! Scoped resource execution.
//!
//! This module provides:
//!
//! - [`Loaner`] - acquire / lend / release with guaranteed cleanup
//! - [`using`] - one-shot shorthand for `Loaner::new(provider).run(..)`
//! - [`using_sync`] and [`using_sync_with`] - the blocking variant over plain closures
//! - [`Provider`] and [`provider`] - the acquire/dispose capabilities
//! - [`ScopeError`] - which stage decided a failed run
//! - [`ScopeOptions`] - span naming and release bounds
//!
//! # Outcome table
//!
//! | work | release | result |
//! |------|---------|--------|
//! | `Ok(v)` | `Ok` | `Ok(v)` |
//! | `Err(w)` | `Ok` | `Err(Work(w))` |
//! | `Ok(_)` | `Err(r)` | `Err(Release { error: r, work_error: None })` |
//! | `Err(w)` | `Err(r)` | `Err(Release { error: r, work_error: Some(w) })` |
//! | panic | any | release, then the panic resumes |
//! | cancelled | `Ok` | `Err(Cancelled)` |
//!
//! Acquisition failure short-circuits to `Err(Acquire(e))` before any of
//! the above.

pub mod error;
mod guard;
mod loaner;
pub mod options;
mod outcome;
pub mod provider;
mod sync;

pub use error::ScopeError;
pub use loaner::{using, Loaner};
pub use options::{ScopeOptions, DEFAULT_SCOPE_NAME};
pub use provider::{provider, FnProvider, Provider};
pub use sync::{using_sync, using_sync_with};
