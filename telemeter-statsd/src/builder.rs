use quanta::Clock;
use thiserror::Error;

use telemeter::{IntoTags, Tag};

use crate::{StatsdClient, StatsdDriver};

/// Errors that could occur while building a statsd driver.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configured metric prefix is not usable.
    #[error("invalid metric prefix: {reason}")]
    InvalidPrefix {
        /// Details about why the prefix was rejected.
        reason: String,
    },
}

/// Builder for a [`StatsdDriver`].
#[derive(Default)]
pub struct StatsdDriverBuilder {
    prefix: Option<String>,
    constant_tags: Vec<Tag>,
}

impl StatsdDriverBuilder {
    /// Set a namespace prefix prepended to every metric name.
    ///
    /// A metric emitted as `worker.jobs` with the prefix `svc` is forwarded
    /// as `svc.worker.jobs`. The separating dot is added by the driver, so
    /// the prefix itself must be non-empty and must not start or end with a
    /// dot.
    ///
    /// # Errors
    ///
    /// If the given prefix is empty or carries a leading/trailing dot, an
    /// error is returned indicating the reason.
    pub fn with_prefix<P>(mut self, prefix: P) -> Result<Self, BuildError>
    where
        P: Into<String>,
    {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(BuildError::InvalidPrefix { reason: "prefix is empty".to_string() });
        }
        if prefix.starts_with('.') || prefix.ends_with('.') {
            return Err(BuildError::InvalidPrefix {
                reason: format!("prefix '{prefix}' must not start or end with a dot"),
            });
        }
        self.prefix = Some(prefix);
        Ok(self)
    }

    /// Set tags attached to every emission, before any per-call tags.
    #[must_use]
    pub fn with_constant_tags<T>(mut self, tags: T) -> Self
    where
        T: IntoTags,
    {
        self.constant_tags = tags.into_tags();
        self
    }

    /// Builds the [`StatsdDriver`] around `client`.
    pub fn build<C>(self, client: C) -> StatsdDriver<C>
    where
        C: StatsdClient,
    {
        self.build_with_clock(client, Clock::new())
    }

    pub(crate) fn build_with_clock<C>(self, client: C, clock: Clock) -> StatsdDriver<C>
    where
        C: StatsdClient,
    {
        StatsdDriver::from_parts(client, clock, self.prefix, self.constant_tags)
    }
}
