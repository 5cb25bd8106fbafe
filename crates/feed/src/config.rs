use std::{env, time::Duration};

pub const DEFAULT_RECONNECT_SECS: u64 = 5;
pub const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// `host:port` of the device feed.
    pub address: String,
    pub reconnect_delay: Duration,
}

impl FeedConfig {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self {
            address: address.into(),
            reconnect_delay: Duration::from_secs(DEFAULT_RECONNECT_SECS),
        }
    }

    /// `None` if no feed is configured.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let address = var("FEED_ADDRESS")?;
        let mut config = Self::new(address);
        if let Some(value) = var("FEED_RECONNECT_SECS") {
            match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.reconnect_delay = Duration::from_secs(secs),
                _ => log::warn!(
                    "ignoring FEED_RECONNECT_SECS={:?}, using {} seconds",
                    value,
                    config.reconnect_delay.as_secs()
                ),
            }
        }
        Some(config)
    }

    /// Linear backoff, capped.
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        self.reconnect_delay
            .saturating_mul(failed_attempts.max(1))
            .min(MAX_RECONNECT_DELAY)
    }
}
