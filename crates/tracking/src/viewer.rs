use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use tokio::sync::mpsc::{self, error::TrySendError};

static NEXT_VIEWER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A serialized message, shared by every viewer it is delivered to.
pub type Outbound = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("outbound queue is full")]
    Overflow,
    #[error("viewer has gone away")]
    Closed,
}

/// The sending side of a connected viewer, as kept in the registry.
#[derive(Debug, Clone)]
pub struct Viewer {
    id: ViewerId,
    outbound: mpsc::Sender<Outbound>,
}

/// The receiving side of a connected viewer, drained by whatever task
/// writes to the viewer's connection.
#[derive(Debug)]
pub struct ViewerInbox {
    id: ViewerId,
    inbound: mpsc::Receiver<Outbound>,
}

impl Viewer {
    /// Creates a viewer with an outbound queue of `capacity` messages.
    pub fn channel(capacity: usize) -> (Viewer, ViewerInbox) {
        let id = ViewerId(NEXT_VIEWER_ID.fetch_add(1, Ordering::Relaxed));
        let (outbound, inbound) = mpsc::channel(capacity.max(1));
        (Viewer { id, outbound }, ViewerInbox { id, inbound })
    }

    pub fn id(&self) -> ViewerId {
        self.id
    }

    /// Queues `message` without waiting.
    pub fn try_deliver(&self, message: &Outbound) -> Result<(), DeliveryError> {
        self.outbound
            .try_send(message.clone())
            .map_err(|why| match why {
                TrySendError::Full(_) => DeliveryError::Overflow,
                TrySendError::Closed(_) => DeliveryError::Closed,
            })
    }
}

impl ViewerInbox {
    pub fn id(&self) -> ViewerId {
        self.id
    }

    /// Waits for the next message. `None` once the viewer was unregistered
    /// and everything queued before was received.
    pub async fn recv(&mut self) -> Option<Outbound> {
        self.inbound.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.inbound.try_recv().ok()
    }

    /// Everything currently queued.
    pub fn drain(&mut self) -> Vec<Outbound> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
