//! Prelude for building units of work.
//!
//! ```rust
//! use loaner::work::prelude::*;
//! ```

pub use crate::work::ext::WorkExt;
pub use crate::work::trait_def::Work;

pub use crate::work::boxed::{BoxFuture, BoxedWork};

pub use crate::work::constructors::{fail, from_async, from_boxed, from_fn, from_result, pure};

pub use crate::work::params::{parameterize, with_params, WithParams};
