//! Units of work: the logic a scope lends its resource to.
//!
//! A unit of work is anything implementing [`Work`]: a computation over
//! `&mut Resource` that yields `Result<Output, Error>`, synchronously or
//! asynchronously. Both flavours go through the same trait, so the runner
//! in [`crate::scope`] has exactly one code path.
//!
//! | Source | Constructor |
//! |--------|-------------|
//! | value | [`pure`], [`fail`], [`from_result`] |
//! | sync closure | [`from_fn`] |
//! | async closure, owned future | [`from_async`] |
//! | async closure, borrowing future | [`from_boxed`] |
//! | fixed parameters | [`with_params`], [`parameterize`] |
//! | hand-written type | `impl Work for MyQuery` |

pub mod boxed;
pub mod combinators;
pub mod constructors;
pub mod ext;
pub mod params;
pub mod prelude;
pub mod tracing;
mod trait_def;

pub use trait_def::Work;

pub use ext::WorkExt;

pub use boxed::{BoxFuture, BoxedWork};

pub use combinators::{AndThen, FromAsync, FromBoxed, FromFn, Map, MapErr, Ready};

pub use constructors::{fail, from_async, from_boxed, from_fn, from_result, pure};

pub use params::{parameterize, with_params, WithParams};

pub use self::tracing::Instrument;

#[cfg(test)]
mod tests;
