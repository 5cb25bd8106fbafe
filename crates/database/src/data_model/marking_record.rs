use chrono::{DateTime, Local};
use model::{record::MarkingRecord, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

#[derive(Debug, Clone, FromRow)]
pub struct MarkingRecordRow {
    pub id: i64,
    pub header: String,
    pub imei: String,
    pub packet_type: String,
    pub time: String,
    pub lat: f64,
    pub direction_lat: String,
    pub lng: f64,
    pub direction_lng: String,
    pub date: String,
    pub checksum: String,
    pub created_at: DateTime<Local>,
}

impl MarkingRecordRow {
    pub fn to_model(self) -> WithId<MarkingRecord> {
        WithId::new(
            Id::new(self.id),
            MarkingRecord {
                header: self.header,
                imei: Id::new(self.imei),
                packet_type: self.packet_type,
                time: self.time,
                lat: self.lat,
                direction_lat: self.direction_lat,
                lng: self.lng,
                direction_lng: self.direction_lng,
                date: self.date,
                checksum: self.checksum,
            },
        )
    }
}
