use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::state::CatalogState;

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&CatalogState) + Send + Sync>;

/// Handle for a subscription, returned by `CatalogStore::subscribe()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

/// Latest published catalog state plus its observers.
///
/// - `set(state)` replaces the snapshot and notifies every subscriber.
/// - `get()` returns the current snapshot (Arc clone, cheap).
/// - `subscribe(handler)` / `unsubscribe(id)` manage observers.
///
/// Handlers run synchronously on the thread that calls `set`, after the
/// write lock is released, so a handler may call `get`.
pub struct CatalogStore {
    current: RwLock<Arc<CatalogState>>,
    handlers: RwLock<Vec<HandlerEntry>>,
    next_id: AtomicU64,
}

impl CatalogStore {
    pub fn new(initial: CatalogState) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn set(&self, state: CatalogState) {
        let snapshot = Arc::new(state);
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::clone(&snapshot);
        }
        // Clone the list so a handler can subscribe without deadlocking.
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner).clone();
        for entry in handlers {
            (entry.handler)(&snapshot);
        }
    }

    pub fn get(&self) -> Arc<CatalogState> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&CatalogState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.push(HandlerEntry {
            id,
            handler: Arc::new(handler),
        });
        id
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|entry| entry.id != id);
        handlers.len() < before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(CatalogState::initial())
    }
}
