//! Persisting and clearing the current tracking session.
//!
//! The session is drained before anything is written to storage. Once the
//! drain happened, the in-memory session is gone for good: a storage
//! failure is reported to the caller but the drained fixes are not put
//! back. Viewers are told to clear in either case, so that what they show
//! matches the (empty) session.

use model::{device::Device, message::ViewerMessage};
use serde::Serialize;
use utility::id::Id;

use crate::{
    broadcast::broadcast,
    database::{Database, DatabaseError, TrackingRepo},
    state::Snapshot,
    Tracker,
};

#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    #[error("saving marking record {} of {} failed: {}", .persisted + 1, .pending, .source)]
    PersistRecord {
        persisted: usize,
        pending: usize,
        #[source]
        source: DatabaseError,
    },
    #[error("saving total distance failed: {source}")]
    PersistTotal {
        #[source]
        source: DatabaseError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetSummary {
    pub records_saved: usize,
    pub total_distance: f64,
    pub viewers_notified: usize,
}

pub(crate) async fn run<D: Database>(tracker: &Tracker<D>) -> Result<ResetSummary, ResetError> {
    let snapshot = tracker.state.snapshot_and_clear();
    let pending = snapshot.fixes.len();
    let total_distance = snapshot.total_distance;

    let persisted = persist(&tracker.database, &tracker.config.device, &snapshot).await;

    let report = broadcast(&tracker.registry, &ViewerMessage::clear());

    match persisted {
        Ok(records_saved) => {
            log::info!(
                "saved {} marking records and a total of {:.3} km, notified {} viewers",
                records_saved,
                total_distance,
                report.delivered
            );
            Ok(ResetSummary {
                records_saved,
                total_distance,
                viewers_notified: report.delivered,
            })
        }
        Err(why) => {
            log::error!(
                "reset lost a session of {} fixes and {:.3} km: {}",
                pending,
                total_distance,
                why
            );
            Err(why)
        }
    }
}

async fn persist<D: Database>(
    database: &D,
    fallback: &Id<Device>,
    snapshot: &Snapshot,
) -> Result<usize, ResetError> {
    let mut repo = database.auto();
    let records = snapshot.marking_records(fallback);
    let pending = records.len();

    for (persisted, record) in records.into_iter().enumerate() {
        repo.put_marking_record(record)
            .await
            .map_err(|source| ResetError::PersistRecord {
                persisted,
                pending,
                source,
            })?;
    }

    repo.put_total_distance(snapshot.total_distance_record(fallback))
        .await
        .map_err(|source| ResetError::PersistTotal { source })?;

    Ok(pending)
}
