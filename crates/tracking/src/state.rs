use std::sync::{Mutex, MutexGuard, PoisonError};

use model::{
    device::Device,
    fix::Fix,
    record::{MarkingRecord, TotalDistance},
};
use utility::id::Id;

/// Result of accepting a fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accepted {
    /// Distance from the previous fix in kilometers, `0.0` for the first fix
    /// of a session.
    pub delta: f64,
    /// Distance travelled since the session started.
    pub total: f64,
}

/// A drained tracking session, ready to be handed to storage.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub fixes: Vec<Fix>,
    pub total_distance: f64,
}

impl Snapshot {
    /// The device the session belongs to: the last device that identified
    /// itself, otherwise `fallback`.
    pub fn device(&self, fallback: &Id<Device>) -> Id<Device> {
        self.fixes
            .iter()
            .rev()
            .find_map(|fix| fix.metadata.device())
            .unwrap_or_else(|| fallback.clone())
    }

    pub fn marking_records(&self, fallback: &Id<Device>) -> Vec<MarkingRecord> {
        self.fixes
            .iter()
            .map(|fix| MarkingRecord::from_fix(fix, fallback))
            .collect()
    }

    pub fn total_distance_record(&self, fallback: &Id<Device>) -> TotalDistance {
        TotalDistance {
            imei: self.device(fallback),
            total_distance: self.total_distance,
        }
    }
}

/// The fixes accepted since the last reset and the distance they span.
///
/// `total` always equals the sum of the distances between consecutive
/// entries of `fixes`.
#[derive(Debug, Default)]
pub struct TrackingState {
    fixes: Vec<Fix>,
    total: f64,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept_fix(&mut self, fix: Fix) -> Accepted {
        let delta = self
            .fixes
            .last()
            .map(|previous| previous.coordinate.distance_to(&fix.coordinate))
            .unwrap_or(0.0);
        self.total += delta;
        self.fixes.push(fix);
        Accepted {
            delta,
            total: self.total,
        }
    }

    pub fn snapshot_and_clear(&mut self) -> Snapshot {
        let snapshot = Snapshot {
            fixes: std::mem::take(&mut self.fixes),
            total_distance: self.total,
        };
        self.total = 0.0;
        snapshot
    }

    pub fn last(&self) -> Option<&Fix> {
        self.fixes.last()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }
}

/// [`TrackingState`] behind its own lock. The lock is never held across an
/// await point or any I/O.
#[derive(Debug, Default)]
pub struct SharedTrackingState(Mutex<TrackingState>);

impl SharedTrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackingState> {
        // every mutation leaves the state consistent, so a poisoned lock is
        // still safe to use
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn accept_fix(&self, fix: Fix) -> Accepted {
        self.lock().accept_fix(fix)
    }

    pub fn snapshot_and_clear(&self) -> Snapshot {
        self.lock().snapshot_and_clear()
    }

    pub fn total(&self) -> f64 {
        self.lock().total()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
