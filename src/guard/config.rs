use std::time::Duration;

use crate::error::Error;

/// Well-known broadcast channel name shared by all tabs of the origin.
const DEFAULT_CHANNEL_NAME: &str = "salesAppSessionChannel";

/// Session guard configuration.
///
/// Defaults match the production schedule; override with `with_*` methods,
/// or use [`from_env()`](GuardConfig::from_env) for convention-based setup.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub(super) channel_name: String,
    pub(super) poll_initial_delay: Duration,
    pub(super) poll_interval: Duration,
    pub(super) kick_redirect_delay: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.into(),
            poll_initial_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(30),
            kick_redirect_delay: Duration::from_secs(5),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `SALESOPS_SESSION_CHANNEL`: broadcast channel name
    /// - `SALESOPS_POLL_INITIAL_SECS`: delay before the first validity check
    /// - `SALESOPS_POLL_INTERVAL_SECS`: recurring validity check interval
    /// - `SALESOPS_KICK_REDIRECT_SECS`: notice countdown before redirect
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new();
        if let Ok(name) = std::env::var("SALESOPS_SESSION_CHANNEL") {
            config.channel_name = name;
        }
        if let Some(delay) = env_secs("SALESOPS_POLL_INITIAL_SECS")? {
            config.poll_initial_delay = delay;
        }
        if let Some(interval) = env_secs("SALESOPS_POLL_INTERVAL_SECS")? {
            config.poll_interval = interval;
        }
        if let Some(delay) = env_secs("SALESOPS_KICK_REDIRECT_SECS")? {
            config.kick_redirect_delay = delay;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    #[must_use]
    pub fn with_poll_initial_delay(mut self, delay: Duration) -> Self {
        self.poll_initial_delay = delay;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_kick_redirect_delay(mut self, delay: Duration) -> Self {
        self.kick_redirect_delay = delay;
        self
    }
}

fn env_secs(name: &str) -> Result<Option<Duration>, Error> {
    match std::env::var(name) {
        Ok(raw) => parse_secs(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration, Error> {
    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| Error::Config(format!("{name}: {e}")))
}
