//! FromFn - unit of work from a synchronous closure.

use std::marker::PhantomData;

use crate::work::trait_def::Work;

/// Work from a synchronous function of the resource.
///
/// The closure runs to completion inside a single poll, so release happens
/// as soon as it returns.
///
/// # Example
///
/// ```rust,ignore
/// use loaner::work::prelude::*;
///
/// let work = from_fn(|buf: &mut Vec<u8>| {
///     buf.push(1);
///     Ok::<_, String>(buf.len())
/// });
/// assert_eq!(work.execute(&mut Vec::new()).await, Ok(1));
/// ```
pub struct FromFn<F, R> {
    pub(crate) f: F,
    pub(crate) _phantom: PhantomData<fn(&mut R)>,
}

impl<F, R> std::fmt::Debug for FromFn<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").field("f", &"<function>").finish()
    }
}

impl<F, R> FromFn<F, R> {
    /// Create a new FromFn work.
    pub fn new(f: F) -> Self {
        FromFn {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, E, R> Work for FromFn<F, R>
where
    F: FnOnce(&mut R) -> Result<T, E> + Send,
    T: Send,
    E: Send,
    R: Send,
{
    type Output = T;
    type Error = E;
    type Resource = R;

    async fn run(self, resource: &mut R) -> Result<T, E> {
        (self.f)(resource)
    }
}
