use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{device::Device, fix::Fix};

/// One persisted position of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarkingRecord {
    pub header: String,
    pub imei: Id<Device>,
    pub packet_type: String,
    pub time: String,
    pub lat: f64,
    pub direction_lat: String,
    pub lng: f64,
    pub direction_lng: String,
    pub date: String,
    pub checksum: String,
}

impl HasId for MarkingRecord {
    type IdType = i64;
}

impl MarkingRecord {
    /// Materializes a fix, filling what the device did not send from
    /// `device` and the time the fix was received.
    pub fn from_fix(fix: &Fix, device: &Id<Device>) -> Self {
        let metadata = &fix.metadata;
        let coordinate = &fix.coordinate;
        Self {
            header: metadata.header.clone().unwrap_or_default(),
            imei: metadata.device().unwrap_or_else(|| device.clone()),
            packet_type: metadata
                .packet_type
                .clone()
                .unwrap_or_else(|| "update".to_owned()),
            time: metadata
                .time
                .clone()
                .unwrap_or_else(|| fix.received_at.format("%H:%M:%S").to_string()),
            lat: coordinate.lat,
            direction_lat: metadata
                .direction_lat
                .clone()
                .unwrap_or_else(|| coordinate.latitude_hemisphere().to_owned()),
            lng: coordinate.lng,
            direction_lng: metadata
                .direction_lng
                .clone()
                .unwrap_or_else(|| coordinate.longitude_hemisphere().to_owned()),
            date: metadata
                .date
                .clone()
                .unwrap_or_else(|| fix.received_at.format("%Y-%m-%d").to_string()),
            checksum: metadata.checksum.clone().unwrap_or_default(),
        }
    }
}

/// The distance a device travelled during one tracking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TotalDistance {
    pub imei: Id<Device>,
    pub total_distance: f64,
}

impl HasId for TotalDistance {
    type IdType = i64;
}
