//! Runner configuration.

#[cfg(feature = "async")]
use std::time::Duration;

/// Options for a [`Loaner`](crate::Loaner).
///
/// Options are pure data. They describe how a scope is reported and
/// bounded but carry nothing about the resource itself; resource
/// configuration is whatever the provider's `Config` type is.
///
/// # Examples
///
/// ```rust
/// use loaner::ScopeOptions;
///
/// let options = ScopeOptions::new().with_name("metrics-db");
/// assert_eq!(options.name(), "metrics-db");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScopeOptions {
    name: String,
    #[cfg(feature = "async")]
    release_timeout: Option<Duration>,
}

/// Span name used when none is configured.
pub const DEFAULT_SCOPE_NAME: &str = "scope";

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_SCOPE_NAME.to_string(),
            #[cfg(feature = "async")]
            release_timeout: None,
        }
    }
}

impl ScopeOptions {
    /// Default options: named `"scope"`, no release timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name recorded on the run's tracing span.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Bound how long dispose may take.
    ///
    /// A dispose that overruns is abandoned and the run fails with
    /// [`ScopeError::ReleaseTimeout`](crate::ScopeError::ReleaseTimeout).
    ///
    /// ```rust
    /// use loaner::ScopeOptions;
    /// use std::time::Duration;
    ///
    /// let options = ScopeOptions::new().with_release_timeout(Duration::from_secs(5));
    /// assert_eq!(options.release_timeout(), Some(Duration::from_secs(5)));
    /// ```
    #[cfg(feature = "async")]
    pub fn with_release_timeout(mut self, limit: Duration) -> Self {
        self.release_timeout = Some(limit);
        self
    }

    /// The name recorded on the run's tracing span.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dispose time limit, if any.
    #[cfg(feature = "async")]
    pub fn release_timeout(&self) -> Option<Duration> {
        self.release_timeout
    }
}
