use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use crate::viewer::{Viewer, ViewerId};

/// The set of connected viewers.
///
/// The lock only guards the set itself. Visiting viewers happens on a copy,
/// so nothing here ever waits on a viewer.
#[derive(Debug, Default)]
pub struct ViewerRegistry {
    viewers: Mutex<IndexMap<ViewerId, Viewer>>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn viewers(&self) -> MutexGuard<'_, IndexMap<ViewerId, Viewer>> {
        self.viewers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, viewer: Viewer) {
        self.viewers().insert(viewer.id(), viewer);
    }

    /// Removes a viewer. Returns whether it was still registered; removing
    /// an absent viewer is not an error.
    pub fn unregister(&self, id: ViewerId) -> bool {
        self.viewers().shift_remove(&id).is_some()
    }

    pub fn contains(&self, id: ViewerId) -> bool {
        self.viewers().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.viewers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers().is_empty()
    }

    /// The viewers registered right now.
    pub fn snapshot(&self) -> Vec<Viewer> {
        self.viewers().values().cloned().collect()
    }

    /// Calls `visit` for every viewer registered at the time of the call and
    /// collects the failures. Viewers registered while visiting are not
    /// visited.
    pub fn for_each<F, E>(&self, mut visit: F) -> Vec<(ViewerId, E)>
    where
        F: FnMut(&Viewer) -> Result<(), E>,
    {
        self.snapshot()
            .iter()
            .filter_map(|viewer| visit(viewer).err().map(|why| (viewer.id(), why)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    #[test]
    fn register_and_unregister() {
        let registry = ViewerRegistry::new();
        let (viewer, _inbox) = Viewer::channel(4);
        let id = viewer.id();

        registry.register(viewer);
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(id));
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn unregister_twice_is_harmless() {
        let registry = ViewerRegistry::new();
        let (first, _first_inbox) = Viewer::channel(4);
        let (second, _second_inbox) = Viewer::channel(4);
        let first_id = first.id();
        let second_id = second.id();
        registry.register(first);
        registry.register(second);

        assert!(registry.unregister(first_id));
        assert!(!registry.unregister(first_id));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(second_id));
    }

    #[test]
    fn late_registration_is_seen_by_the_next_visit() {
        let registry = ViewerRegistry::new();
        let (viewer, _inbox) = Viewer::channel(4);
        registry.register(viewer);

        let mut late = Some(Viewer::channel(4));
        let mut visited = 0;
        let failures = registry.for_each(|_| {
            visited += 1;
            if let Some((viewer, _)) = late.take() {
                registry.register(viewer);
            }
            Ok::<(), Infallible>(())
        });
        assert!(failures.is_empty());
        assert_eq!(visited, 1);

        let mut visited = 0;
        registry.for_each(|_| {
            visited += 1;
            Ok::<(), Infallible>(())
        });
        assert_eq!(visited, 2);
    }

    #[test]
    fn visit_collects_failures() {
        let registry = ViewerRegistry::new();
        let viewers = (0..3).map(|_| Viewer::channel(4)).collect::<Vec<_>>();
        let failing = viewers[1].0.id();
        for (viewer, _) in &viewers {
            registry.register(viewer.clone());
        }

        let failures = registry.for_each(|viewer| {
            if viewer.id() == failing {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(failures, vec![(failing, "boom")]);
    }
}
