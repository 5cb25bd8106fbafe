use std::{error, result};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use model::{
    device::Device,
    record::{MarkingRecord, TotalDistance},
    WithId,
};
use utility::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Durable sink for finished tracking sessions and source for the
/// aggregated distances derived from them.
#[async_trait]
pub trait TrackingRepo {
    /// Appends one historical position record.
    async fn put_marking_record(
        &mut self,
        record: MarkingRecord,
    ) -> Result<WithId<MarkingRecord>>;

    /// Appends the distance travelled during one session.
    async fn put_total_distance(
        &mut self,
        record: TotalDistance,
    ) -> Result<WithId<TotalDistance>>;

    /// Sums all session distances of `device`, optionally only those stored
    /// after `since`. Returns `None` if no record matches.
    async fn sum_total_distance(
        &mut self,
        device: &Id<Device>,
        since: Option<DateTime<Local>>,
    ) -> Result<Option<f64>>;

    /// Sums the session distances per device, optionally only those stored
    /// after `since`.
    async fn total_distances_by_device(
        &mut self,
        since: Option<DateTime<Local>>,
    ) -> Result<Vec<(Id<Device>, f64)>>;
}

pub trait Database: Clone + Send + Sync + 'static {
    type Autocommit: TrackingRepo + Send;

    /// A handle where every operation is committed on its own.
    fn auto(&self) -> Self::Autocommit;
}
