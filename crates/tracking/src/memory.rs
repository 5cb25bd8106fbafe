//! In-process storage, used where no PostgreSQL instance is at hand.
//!
//! Failures can be injected to exercise the error paths of a reset.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use model::{
    device::Device,
    record::{MarkingRecord, TotalDistance},
    WithId,
};
use utility::id::Id;

use crate::database::{Database, DatabaseError, Result, TrackingRepo};

#[derive(Debug, thiserror::Error)]
#[error("injected storage failure")]
pub struct InjectedFailure;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    marking_records: Vec<(DateTime<Local>, MarkingRecord)>,
    total_distances: Vec<(DateTime<Local>, TotalDistance)>,
    marking_record_budget: Option<usize>,
    reject_total_distances: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accept `count` more marking records, then reject every following one.
    pub fn fail_marking_records_after(&self, count: usize) {
        self.tables().marking_record_budget = Some(count);
    }

    pub fn fail_total_distances(&self, fail: bool) {
        self.tables().reject_total_distances = fail;
    }

    pub fn marking_records(&self) -> Vec<MarkingRecord> {
        self.tables()
            .marking_records
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    pub fn total_distances(&self) -> Vec<TotalDistance> {
        self.tables()
            .total_distances
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Stores a total distance with an explicit creation time.
    pub fn insert_total_distance_at(
        &self,
        record: TotalDistance,
        created_at: DateTime<Local>,
    ) {
        let mut tables = self.tables();
        tables.next_id();
        tables.total_distances.push((created_at, record));
    }
}

impl Database for MemoryDatabase {
    type Autocommit = MemoryAutocommit;

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            tables: self.tables.clone(),
        }
    }
}

pub struct MemoryAutocommit {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryAutocommit {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn matching(
        &self,
        since: Option<DateTime<Local>>,
    ) -> Vec<TotalDistance> {
        self.tables()
            .total_distances
            .iter()
            .filter(|(created_at, _)| since.map_or(true, |since| *created_at > since))
            .map(|(_, record)| record.clone())
            .collect()
    }
}

#[async_trait]
impl TrackingRepo for MemoryAutocommit {
    async fn put_marking_record(
        &mut self,
        record: MarkingRecord,
    ) -> Result<WithId<MarkingRecord>> {
        let mut tables = self.tables();
        match tables.marking_record_budget {
            Some(0) => return Err(DatabaseError::other(InjectedFailure)),
            Some(ref mut budget) => *budget -= 1,
            None => {}
        }
        let id = tables.next_id();
        tables.marking_records.push((Local::now(), record.clone()));
        Ok(WithId::new(Id::new(id), record))
    }

    async fn put_total_distance(
        &mut self,
        record: TotalDistance,
    ) -> Result<WithId<TotalDistance>> {
        let mut tables = self.tables();
        if tables.reject_total_distances {
            return Err(DatabaseError::other(InjectedFailure));
        }
        let id = tables.next_id();
        tables.total_distances.push((Local::now(), record.clone()));
        Ok(WithId::new(Id::new(id), record))
    }

    async fn sum_total_distance(
        &mut self,
        device: &Id<Device>,
        since: Option<DateTime<Local>>,
    ) -> Result<Option<f64>> {
        let distances = self
            .matching(since)
            .into_iter()
            .filter(|record| &record.imei == device)
            .map(|record| record.total_distance)
            .collect::<Vec<_>>();
        if distances.is_empty() {
            Ok(None)
        } else {
            Ok(Some(distances.into_iter().sum()))
        }
    }

    async fn total_distances_by_device(
        &mut self,
        since: Option<DateTime<Local>>,
    ) -> Result<Vec<(Id<Device>, f64)>> {
        let mut by_device: IndexMap<Id<Device>, f64> = IndexMap::new();
        for record in self.matching(since) {
            *by_device.entry(record.imei).or_default() += record.total_distance;
        }
        Ok(by_device.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn total(imei: &str, total_distance: f64) -> TotalDistance {
        TotalDistance {
            imei: Id::new(imei.to_owned()),
            total_distance,
        }
    }

    #[tokio::test]
    async fn sums_by_device_and_window() {
        let database = MemoryDatabase::new();
        let now = Local::now();
        database.insert_total_distance_at(total("a", 10.0), now - Duration::days(3));
        database.insert_total_distance_at(total("a", 2.5), now - Duration::hours(1));
        database.insert_total_distance_at(total("b", 4.0), now - Duration::hours(2));

        let mut repo = database.auto();
        let a = Id::new("a".to_owned());
        assert_eq!(repo.sum_total_distance(&a, None).await.unwrap(), Some(12.5));
        assert_eq!(
            repo.sum_total_distance(&a, Some(now - Duration::days(1)))
                .await
                .unwrap(),
            Some(2.5)
        );
        assert_eq!(
            repo.sum_total_distance(&Id::new("c".to_owned()), None)
                .await
                .unwrap(),
            None
        );

        let by_device = repo.total_distances_by_device(None).await.unwrap();
        assert_eq!(
            by_device,
            vec![(Id::new("a".to_owned()), 12.5), (Id::new("b".to_owned()), 4.0)]
        );
    }

    #[tokio::test]
    async fn injected_failures() {
        let database = MemoryDatabase::new();
        database.fail_marking_records_after(1);
        let mut repo = database.auto();
        let record = MarkingRecord {
            header: String::new(),
            imei: Id::new("a".to_owned()),
            packet_type: "update".to_owned(),
            time: "00:00:00".to_owned(),
            lat: 0.0,
            direction_lat: "N".to_owned(),
            lng: 0.0,
            direction_lng: "E".to_owned(),
            date: "2024-08-04".to_owned(),
            checksum: String::new(),
        };
        assert!(repo.put_marking_record(record.clone()).await.is_ok());
        assert!(repo.put_marking_record(record).await.is_err());
        assert_eq!(database.marking_records().len(), 1);

        database.fail_total_distances(true);
        assert!(repo.put_total_distance(total("a", 1.0)).await.is_err());
        assert!(database.total_distances().is_empty());
    }
}
