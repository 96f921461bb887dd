//! Change notification channel.
//!
//! A payload-free observer registry. Producers own a [`Notifier`] and call
//! [`Notifier::publish`]; observers register a callback and hold the
//! returned [`Subscription`] for as long as they want to be called. Observers re-read whatever
//! state they care about when notified.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(u64, Handler)>>,
}

impl Registry {
    fn handlers(&self) -> MutexGuard<'_, Vec<(u64, Handler)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Observer registry with notify-all.
#[derive(Clone, Default)]
pub struct Notifier {
    registry: Arc<Registry>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`. It runs on every later [`publish`](Self::publish)
    /// until the returned subscription is dropped.
    pub fn subscribe(&self, handler: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.handlers().push((id, Arc::new(handler)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Call every registered handler in registration order.
    ///
    /// Handlers run outside the registry lock, so a handler may subscribe
    /// or unsubscribe; such changes take effect from the next publish.
    pub fn publish(&self) {
        let snapshot: Vec<Handler> = self
            .registry
            .handlers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        tracing::debug!(subscribers = snapshot.len(), "Publishing change");
        for handler in snapshot {
            handler();
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.handlers().len()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle to a registered observer.
///
/// Dropping the handle removes the observer. Use [`detach`](Self::detach)
/// for an observer that should live as long as the notifier.
#[derive(Debug)]
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Remove the observer. A no-op if the notifier is already gone.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the observer registered for the notifier's whole lifetime.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let mut handlers = registry.handlers();
            handlers
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|index| handlers.remove(index))
        };
        // The handler may own subscriptions of its own; drop it unlocked.
        drop(removed);
    }
}
