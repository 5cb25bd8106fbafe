use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{coordinate::Coordinate, device::Device};

/// Descriptive packet fields a device may send along with its position.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixMetadata {
    pub header: Option<String>,
    pub imei: Option<String>,
    pub packet_type: Option<String>,
    pub time: Option<String>,
    pub direction_lat: Option<String>,
    pub direction_lng: Option<String>,
    pub date: Option<String>,
    pub checksum: Option<String>,
}

impl FixMetadata {
    pub fn device(&self) -> Option<Id<Device>> {
        self.imei.clone().map(Id::new)
    }
}

/// A coordinate as it was accepted into the current tracking session.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub received_at: DateTime<Local>,
    pub metadata: FixMetadata,
}

impl Fix {
    pub fn new(coordinate: Coordinate, metadata: FixMetadata) -> Self {
        Self {
            coordinate,
            received_at: Local::now(),
            metadata,
        }
    }

    pub fn at(coordinate: Coordinate) -> Self {
        Self::new(coordinate, FixMetadata::default())
    }
}
