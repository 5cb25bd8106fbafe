use model::message::ViewerMessage;

use crate::{
    registry::ViewerRegistry,
    viewer::{Outbound, ViewerId},
};

/// What happened during one fan-out. Never an error for the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: Vec<ViewerId>,
}

/// Sends `message` to every registered viewer.
pub fn broadcast(registry: &ViewerRegistry, message: &ViewerMessage) -> BroadcastReport {
    match serde_json::to_string(message) {
        Ok(json) => deliver(registry, &Outbound::from(json)),
        Err(why) => {
            log::error!("can not serialize {:?}: {}", message, why);
            BroadcastReport::default()
        }
    }
}

/// Queues an already serialized message for every registered viewer.
///
/// A viewer whose queue is full or closed is unregistered; delivery to the
/// others continues.
pub fn deliver(registry: &ViewerRegistry, payload: &Outbound) -> BroadcastReport {
    let mut attempted = 0;
    let failures = registry.for_each(|viewer| {
        attempted += 1;
        viewer.try_deliver(payload)
    });

    let mut dropped = Vec::with_capacity(failures.len());
    for (id, why) in failures {
        if registry.unregister(id) {
            log::warn!("dropped viewer {}: {}", id, why);
        }
        dropped.push(id);
    }

    BroadcastReport {
        delivered: attempted - dropped.len(),
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use model::coordinate::Coordinate;

    use super::*;
    use crate::viewer::Viewer;

    fn received(inbox: &mut crate::viewer::ViewerInbox) -> Vec<ViewerMessage> {
        inbox
            .drain()
            .iter()
            .map(|payload| serde_json::from_str(payload).unwrap())
            .collect()
    }

    #[test]
    fn one_dead_viewer_does_not_disturb_the_others() {
        let registry = ViewerRegistry::new();
        let (first, mut first_inbox) = Viewer::channel(8);
        let (second, second_inbox) = Viewer::channel(8);
        let (third, mut third_inbox) = Viewer::channel(8);
        let second_id = second.id();
        registry.register(first);
        registry.register(second);
        registry.register(third);

        // every write to the second viewer fails
        drop(second_inbox);

        let message = ViewerMessage::from(Coordinate::new(54.32, 10.13));
        let report = broadcast(&registry, &message);

        assert_eq!(report.delivered, 2);
        assert_eq!(report.dropped, vec![second_id]);
        assert!(!registry.contains(second_id));
        assert_eq!(registry.len(), 2);

        assert_eq!(received(&mut first_inbox), vec![message.clone()]);
        assert_eq!(received(&mut third_inbox), vec![message]);
    }

    #[test]
    fn overflowing_viewer_is_dropped() {
        let registry = ViewerRegistry::new();
        let (slow, mut slow_inbox) = Viewer::channel(2);
        let (fast, mut fast_inbox) = Viewer::channel(16);
        let slow_id = slow.id();
        registry.register(slow);
        registry.register(fast);

        for i in 0..3 {
            let report = broadcast(&registry, &Coordinate::new(0.0, i as f64).into());
            if i < 2 {
                assert!(report.dropped.is_empty());
            } else {
                assert_eq!(report.dropped, vec![slow_id]);
            }
            // keep the fast viewer drained
            assert_eq!(received(&mut fast_inbox).len(), 1);
        }

        assert!(!registry.contains(slow_id));
        // whatever was queued before the overflow is still readable
        assert_eq!(received(&mut slow_inbox).len(), 2);
    }

    #[test]
    fn broadcast_without_viewers() {
        let registry = ViewerRegistry::new();
        let report = broadcast(&registry, &ViewerMessage::clear());
        assert_eq!(report, BroadcastReport::default());
    }

    #[test]
    fn payload_is_serialized_once_and_shared() {
        let registry = ViewerRegistry::new();
        let (first, mut first_inbox) = Viewer::channel(4);
        let (second, mut second_inbox) = Viewer::channel(4);
        registry.register(first);
        registry.register(second);

        broadcast(&registry, &ViewerMessage::clear());

        let a = first_inbox.try_recv().unwrap();
        let b = second_inbox.try_recv().unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, r#"{"type":"clear"}"#);
    }
}
