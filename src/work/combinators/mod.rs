//! Concrete combinator types for units of work.
//!
//! Most users won't name these types directly. The constructors in
//! [`crate::work`] and the methods on [`WorkExt`](crate::work::WorkExt)
//! return them behind `impl Work<...>`.

mod and_then;
mod from_async;
mod from_fn;
mod map;
mod ready;

pub use and_then::AndThen;
pub use from_async::{FromAsync, FromBoxed};
pub use from_fn::FromFn;
pub use map::{Map, MapErr};
pub use ready::Ready;
