use chrono::{DateTime, Local};
use model::{record::TotalDistance, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

#[derive(Debug, Clone, FromRow)]
pub struct TotalDistanceRow {
    pub id: i64,
    pub imei: String,
    pub total_distance: f64,
    pub created_at: DateTime<Local>,
}

impl TotalDistanceRow {
    pub fn to_model(self) -> WithId<TotalDistance> {
        WithId::new(
            Id::new(self.id),
            TotalDistance {
                imei: Id::new(self.imei),
                total_distance: self.total_distance,
            },
        )
    }
}

/// One row of a per-device aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceSumRow {
    pub imei: String,
    pub total_distance: f64,
}
