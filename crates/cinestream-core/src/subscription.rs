use cinestream_models::ItemKey;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// What a state-changing operation did to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    Added(ItemKey),
    Removed(ItemKey),
    Cleared { removed: usize },
}

impl fmt::Display for ListChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListChange::Added(key) => write!(f, "added {}", key),
            ListChange::Removed(key) => write!(f, "removed {}", key),
            ListChange::Cleared { removed } => write!(f, "cleared {} item(s)", removed),
        }
    }
}

type Callback = Box<dyn FnMut(&ListChange) + Send>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
    /// Callbacks taken out by a notification that is still running
    in_flight: usize,
    /// Ids released while their callback was in flight
    released: HashSet<u64>,
}

/// Callback registry shared between a store and the handles it gives out
#[derive(Clone, Default)]
pub(crate) struct Subscribers {
    inner: Arc<Mutex<Registry>>,
}

impl Subscribers {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&ListChange) + Send + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.push((id, Box::new(callback)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
            active: true,
        }
    }

    /// Call every registered callback once, in registration order.
    ///
    /// Callbacks run without the registry locked, so they may subscribe or
    /// release handles. A callback released mid-notification is skipped;
    /// one added mid-notification first hears the next change.
    pub(crate) fn notify(&self, change: &ListChange) {
        let mut callbacks = {
            let mut registry = self.lock();
            let taken = std::mem::take(&mut registry.callbacks);
            registry.in_flight += taken.len();
            taken
        };

        for (id, callback) in callbacks.iter_mut() {
            if self.lock().released.contains(id) {
                continue;
            }
            callback(change);
        }

        let mut registry = self.lock();
        registry.in_flight -= callbacks.len();
        let released = std::mem::take(&mut registry.released);
        callbacks.retain(|(id, _)| !released.contains(id));
        let added = std::mem::take(&mut registry.callbacks);
        callbacks.extend(added);
        registry.callbacks = callbacks;
    }

    pub(crate) fn len(&self) -> usize {
        let registry = self.lock();
        registry.callbacks.len() + registry.in_flight - registry.released.len()
    }
}

/// Handle returned by `SavedListStore::subscribe`.
///
/// Dropping the handle unsubscribes. Use [`Subscription::detach`] to keep the
/// callback for as long as the store lives.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    active: bool,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    pub fn detach(mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active && self.registry.strong_count() > 0
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            let before = registry.callbacks.len();
            registry.callbacks.retain(|(id, _)| *id != self.id);
            if registry.callbacks.len() == before && registry.in_flight > 0 {
                registry.released.insert(self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
