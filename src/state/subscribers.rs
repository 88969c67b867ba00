//! Change listeners for [`LocaleState`](super::LocaleState).

use std::fmt;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use super::LocaleState;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Listener invoked with the state after every transition.
pub type Listener = Arc<dyn Fn(&LocaleState) + Send + Sync>;

/// Registered listeners, notified in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    /// Next id to hand out.
    next_id: AtomicU64,
    /// Listeners in subscription order.
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
}

impl Subscribers {
    /// Acquire the listener list, recovering from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `listener` and return its id.
    pub(crate) fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, listener));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Call every listener with `state`.
    ///
    /// The list is copied first, so listeners may subscribe or unsubscribe
    /// from inside the callback.
    pub(crate) fn notify(&self, state: &LocaleState) {
        let listeners: Vec<Listener> =
            self.lock().iter().map(|(_, listener)| Arc::clone(listener)).collect();
        for listener in listeners {
            listener(state);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("count", &self.len()).finish_non_exhaustive()
    }
}
