use std::env;

use model::device::Device;
use utility::id::Id;

pub const DEFAULT_DEVICE_IMEI: &str = "678901234567890";
pub const DEFAULT_VIEWER_QUEUE: usize = 64;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Device a session is stored under when no fix named one.
    pub device: Id<Device>,
    /// Messages a viewer may fall behind before it is dropped.
    pub viewer_queue_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            device: Id::new(DEFAULT_DEVICE_IMEI.to_owned()),
            viewer_queue_capacity: DEFAULT_VIEWER_QUEUE,
        }
    }
}

impl TrackerConfig {
    /// Reads `TRACKER_DEVICE_IMEI` and `TRACKER_VIEWER_QUEUE`, falling back
    /// to the defaults for unset or unusable values.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let device = var("TRACKER_DEVICE_IMEI")
            .map(|imei| imei.trim().to_owned())
            .filter(|imei| !imei.is_empty())
            .map(Id::new)
            .unwrap_or(defaults.device);
        let viewer_queue_capacity = match var("TRACKER_VIEWER_QUEUE") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    log::warn!(
                        "ignoring TRACKER_VIEWER_QUEUE={:?}, using {}",
                        value,
                        defaults.viewer_queue_capacity
                    );
                    defaults.viewer_queue_capacity
                }
            },
            None => defaults.viewer_queue_capacity,
        };
        Self {
            device,
            viewer_queue_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from(pairs: &[(&str, &str)]) -> TrackerConfig {
        let vars: HashMap<_, _> = pairs.iter().copied().collect();
        TrackerConfig::from_vars(|name| vars.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn defaults_without_variables() {
        let config = from(&[]);
        assert_eq!(config.device.raw(), DEFAULT_DEVICE_IMEI);
        assert_eq!(config.viewer_queue_capacity, DEFAULT_VIEWER_QUEUE);
    }

    #[test]
    fn reads_device_and_queue() {
        let config = from(&[
            ("TRACKER_DEVICE_IMEI", " 865205030330012 "),
            ("TRACKER_VIEWER_QUEUE", "8"),
        ]);
        assert_eq!(config.device.raw(), "865205030330012");
        assert_eq!(config.viewer_queue_capacity, 8);
    }

    #[test]
    fn unusable_values_fall_back_to_the_defaults() {
        for queue in ["0", "-3", "many", ""] {
            let config = from(&[("TRACKER_DEVICE_IMEI", "   "), ("TRACKER_VIEWER_QUEUE", queue)]);
            assert_eq!(config.device.raw(), DEFAULT_DEVICE_IMEI);
            assert_eq!(config.viewer_queue_capacity, DEFAULT_VIEWER_QUEUE, "{:?}", queue);
        }
    }
}
