//! Synchronous listener registry with ordered delivery.
//!
//! Each store owns one `Subscribers<T>` per observable collection. A mutation
//! [`publish`](Subscribers::publish)es its snapshot while it still holds the
//! store lock, then calls [`flush`](Subscribers::flush) after releasing it.
//! Snapshots reach listeners in the order they were published, in
//! registration order, before the mutating call returns.
//!
//! Only one thread delivers at a time. A `flush` that finds another thread
//! delivering waits until that thread has drained the queue, which includes
//! the snapshot it published itself. A `flush` issued from inside a listener
//! returns at once; the outer delivery picks the snapshot up next.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// Callback invoked with the latest snapshot.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

// Process-wide so an id never names listeners in two registries.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `subscribe`, used to unregister the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A snapshot waiting for delivery, with the listeners registered when it
/// was published.
struct Pending<T> {
    targets: Vec<(SubscriptionId, Listener<T>)>,
    snapshot: T,
}

struct Delivery<T> {
    queue: VecDeque<Pending<T>>,
    /// Thread currently running listeners
    drainer: Option<ThreadId>,
}

/// Ordered registry of listeners for snapshots of type `T`.
pub struct Subscribers<T> {
    /// Ids grow monotonically, so map order is registration order.
    listeners: Mutex<BTreeMap<SubscriptionId, Listener<T>>>,
    delivery: Mutex<Delivery<T>>,
    idle: Condvar,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(BTreeMap::new()),
            delivery: Mutex::new(Delivery {
                queue: VecDeque::new(),
                drainer: None,
            }),
            idle: Condvar::new(),
        }
    }

    fn lock_listeners(&self) -> MutexGuard<'_, BTreeMap<SubscriptionId, Listener<T>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_delivery(&self) -> MutexGuard<'_, Delivery<T>> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a listener and returns its id.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.lock_listeners().insert(id, Arc::new(listener));
        id
    }

    /// Registers a listener and queues `current` for it alone, so a new
    /// subscriber starts from the latest snapshot.
    ///
    /// Call this while holding the lock that guards `current`, then
    /// [`flush`](Self::flush) once it is released.
    pub fn subscribe_and_replay<F>(&self, listener: F, current: T) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let listener: Listener<T> = Arc::new(listener);
        let id = SubscriptionId::next();
        self.lock_listeners().insert(id, listener.clone());
        self.lock_delivery().queue.push_back(Pending {
            targets: vec![(id, listener)],
            snapshot: current,
        });
        id
    }

    /// Unregisters a listener. Returns false if the id was not registered here.
    ///
    /// Snapshots still queued for the listener are dropped.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_listeners().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock_listeners().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `snapshot` for every listener registered right now.
    ///
    /// Call this under the lock that serializes the owner's mutations, so the
    /// queue order is the commit order.
    pub fn publish(&self, snapshot: T) {
        let targets: Vec<_> = self
            .lock_listeners()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();
        if targets.is_empty() {
            return;
        }
        self.lock_delivery()
            .queue
            .push_back(Pending { targets, snapshot });
    }

    /// Delivers every queued snapshot in order.
    ///
    /// No registry lock is held while listeners run, so a listener may
    /// subscribe, unsubscribe or call back into the owning store.
    pub fn flush(&self) {
        let me = thread::current().id();
        let mut delivery = self.lock_delivery();
        loop {
            match delivery.drainer {
                Some(owner) if owner == me => return,
                Some(_) => {
                    delivery = self
                        .idle
                        .wait(delivery)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                None => break,
            }
        }

        delivery.drainer = Some(me);
        let _draining = DrainGuard { subscribers: self };
        while let Some(pending) = delivery.queue.pop_front() {
            drop(delivery);
            self.deliver(pending);
            delivery = self.lock_delivery();
        }
        drop(delivery);
    }

    /// Publishes and delivers `snapshot` in one step.
    pub fn notify(&self, snapshot: T) {
        self.publish(snapshot);
        self.flush();
    }

    fn deliver(&self, pending: Pending<T>) {
        let Pending { targets, snapshot } = pending;
        for (id, listener) in targets {
            if self.lock_listeners().contains_key(&id) {
                listener(&snapshot);
            }
        }
    }
}

/// Releases the drainer slot even when a listener panics.
struct DrainGuard<'a, T> {
    subscribers: &'a Subscribers<T>,
}

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        self.subscribers.lock_delivery().drainer = None;
        self.subscribers.idle.notify_all();
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.len())
            .field("pending", &self.lock_delivery().queue.len())
            .finish()
    }
}
