use std::fmt::{self, Debug};
use std::ops::Deref;
use std::sync::Arc;

/// Caller-supplied state for one run, shared read-only with every tool
/// call made during that run.
///
/// A new context is created for each run; it is never shared between runs.
pub struct RunContext<C> {
    inner: Arc<C>,
}

impl<C> RunContext<C> {
    /// Wraps the given value.
    #[inline]
    pub fn new(context: C) -> Self {
        Self {
            inner: Arc::new(context),
        }
    }

    /// Returns the wrapped value.
    #[inline]
    pub fn context(&self) -> &C {
        &self.inner
    }
}

impl<C> Clone for RunContext<C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for RunContext<C> {
    type Target = C;

    #[inline]
    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: Debug> Debug for RunContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RunContext").field(&self.inner).finish()
    }
}
