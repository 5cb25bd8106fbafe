use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8282";
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub bind_address: String,
    /// Served under `/static`, with its `index.html` at `/`.
    pub static_dir: PathBuf,
    /// Longest a single write to a viewer socket may take.
    pub write_timeout: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_address: var("WEB_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            static_dir: var("WEB_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            write_timeout: parsed::<u64>(&var, "WEB_WRITE_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.write_timeout),
        }
    }
}

fn parsed<T: FromStr>(var: impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let value = var(name)?;
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("ignoring {}={:?}", name, value);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from(pairs: &[(&str, &str)]) -> WebConfig {
        let vars: HashMap<_, _> = pairs.iter().copied().collect();
        WebConfig::from_vars(|name| vars.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(from(&[]), WebConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = from(&[
            ("WEB_BIND_ADDRESS", "127.0.0.1:9000"),
            ("WEB_STATIC_DIR", "/srv/www"),
            ("WEB_WRITE_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.write_timeout, Duration::from_secs(3));
    }

    #[test]
    fn unusable_write_timeout_keeps_the_default() {
        for value in ["0", "-1", "slow", ""] {
            let config = from(&[("WEB_WRITE_TIMEOUT_SECS", value)]);
            assert_eq!(
                config.write_timeout,
                Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
                "{:?}",
                value
            );
        }
    }
}
