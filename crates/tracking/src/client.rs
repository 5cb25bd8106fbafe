use std::sync::Arc;

use chrono::{Duration, Local};
use model::{
    dashboard::{Dashboard, DeviceDistance, DeviceReport, DeviceTotal},
    device::Device,
    fix::Fix,
    message::ViewerMessage,
};
use utility::id::Id;

use crate::{
    broadcast::broadcast,
    database::{Database, TrackingRepo},
    registry::ViewerRegistry,
    reset::{self, ResetError, ResetSummary},
    state::{Accepted, SharedTrackingState},
    viewer::{Viewer, ViewerId, ViewerInbox},
    RequestError, RequestResult, TrackerConfig,
};

/// The relay service: one tracking session, the viewers following it and
/// the storage finished sessions go to.
///
/// Cloning is cheap; all clones share the same session and viewers.
#[derive(Clone)]
pub struct Tracker<D>
where
    D: Database,
{
    pub(crate) database: D,
    pub(crate) config: Arc<TrackerConfig>,
    pub(crate) state: Arc<SharedTrackingState>,
    pub(crate) registry: Arc<ViewerRegistry>,
}

impl<D> Tracker<D>
where
    D: Database,
{
    pub fn new(database: D, config: TrackerConfig) -> Self {
        Self {
            database,
            config: Arc::new(config),
            state: Arc::new(SharedTrackingState::new()),
            registry: Arc::new(ViewerRegistry::new()),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn registry(&self) -> &ViewerRegistry {
        &self.registry
    }

    /// Registers a new viewer and returns the inbox its messages arrive in.
    pub fn connect_viewer(&self) -> ViewerInbox {
        let (viewer, inbox) = Viewer::channel(self.config.viewer_queue_capacity);
        self.registry.register(viewer);
        log::info!(
            "viewer {} connected, {} viewers",
            inbox.id(),
            self.registry.len()
        );
        inbox
    }

    pub fn disconnect_viewer(&self, id: ViewerId) {
        if self.registry.unregister(id) {
            log::info!(
                "viewer {} disconnected, {} viewers",
                id,
                self.registry.len()
            );
        }
    }

    /// Adds `fix` to the session and broadcasts it to all viewers.
    pub fn accept(&self, fix: Fix) -> Accepted {
        let coordinate = fix.coordinate;
        let accepted = self.state.accept_fix(fix);
        log::info!(
            "new location ({}, {}), delta {:.3} km, total {:.3} km",
            coordinate.lat,
            coordinate.lng,
            accepted.delta,
            accepted.total
        );
        broadcast(&self.registry, &ViewerMessage::Fix(coordinate));
        accepted
    }

    pub fn running_total(&self) -> f64 {
        self.state.total()
    }

    pub fn session_len(&self) -> usize {
        self.state.len()
    }

    /// Stores the current session, clears it and tells viewers to clear.
    pub async fn reset(&self) -> Result<ResetSummary, ResetError> {
        reset::run(self).await
    }
}

impl<D> Tracker<D>
where
    D: Database,
{
    /// Persisted distance of `device`, overall and during the last day.
    pub async fn device_report(&self, device: &Id<Device>) -> RequestResult<DeviceReport> {
        let mut repo = self.database.auto();
        let total_distance = repo
            .sum_total_distance(device, None)
            .await?
            .ok_or(RequestError::NotFound)?;
        let total_distance_past_day = repo
            .sum_total_distance(device, Some(Local::now() - Duration::hours(24)))
            .await?
            .unwrap_or(0.0);
        Ok(DeviceReport {
            total_distance_for_imei: DeviceTotal {
                imei: device.clone(),
                total_distance,
            },
            total_distance_past_day,
        })
    }

    /// Persisted distances of all devices and the most travelled ones.
    pub async fn dashboard(&self) -> RequestResult<Dashboard> {
        let mut repo = self.database.auto();
        let overall = repo.total_distances_by_device(None).await?;
        let past_day = repo
            .total_distances_by_device(Some(Local::now() - Duration::hours(24)))
            .await?;

        Ok(Dashboard {
            most_traveled_device: most_traveled(&overall),
            most_traveled_device_past_day: most_traveled(&past_day),
            total_distances: overall
                .into_iter()
                .map(|(imei, distance)| (imei.into_raw(), distance))
                .collect(),
        })
    }
}

fn most_traveled(distances: &[(Id<Device>, f64)]) -> Option<DeviceDistance> {
    distances
        .iter()
        .filter(|(_, distance)| *distance > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(imei, distance)| DeviceDistance {
            imei: imei.clone(),
            distance: *distance,
        })
}
