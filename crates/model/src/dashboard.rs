use std::collections::HashMap;

use schemars::JsonSchema;
use serde::Serialize;
use utility::id::Id;

use crate::device::Device;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DeviceDistance {
    pub imei: Id<Device>,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DeviceTotal {
    pub imei: Id<Device>,
    pub total_distance: f64,
}

/// Persisted distance of a single device, overall and for the last day.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct DeviceReport {
    pub total_distance_for_imei: DeviceTotal,
    pub total_distance_past_day: f64,
}

/// Persisted distances of all devices.
///
/// The most travelled device is `None` while nothing was travelled in the
/// respective window.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Dashboard {
    pub total_distances: HashMap<String, f64>,
    pub most_traveled_device: Option<DeviceDistance>,
    pub most_traveled_device_past_day: Option<DeviceDistance>,
}
