//! Observer registries with opaque subscription handles.
//!
//! Every state node owns two registries of this shape: one for raw [`Event`]
//! emissions and one for active-path changes. Registries are ordered
//! (callbacks run in subscription order) and synchronous (emission completes
//! before `emit` returns).
//!
//! Handles returned by [`ObserverRegistry::subscribe`] are the only objects
//! that cross ownership boundaries; they stay safely usable for the
//! subscriber's lifetime and unsubscribing twice is a no-op.
//!
//! [`Event`]: crate::core::Event

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle identity is process-global, so a handle minted by one registry can
/// never remove an unrelated entry from another.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying one subscription in one registry.
///
/// Returned by [`ObserverRegistry::subscribe`] and consumed by
/// [`ObserverRegistry::unsubscribe`]. Handles are `Copy` and comparable, but
/// their numeric identity is not exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        SubscriptionId(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An ordered list of callbacks with synchronous fan-out.
///
/// Cloning a registry yields a second handle to the *same* subscriber list;
/// this is how a parent node lends its registries to the forwarding closures
/// wired into its active child.
///
/// Emission snapshots the subscriber list before invoking anything, so a
/// callback may subscribe or unsubscribe while an emission is in flight.
/// Callback panics are not suppressed; they propagate to the caller of
/// [`emit`](ObserverRegistry::emit).
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Event, ObserverRegistry};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let registry: ObserverRegistry<Event> = ObserverRegistry::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&seen);
/// let handle = registry.subscribe(move |_event| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// registry.emit(&Event::new("tick"));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
///
/// assert!(registry.unsubscribe(handle));
/// registry.emit(&Event::new("tick"));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct ObserverRegistry<T: ?Sized> {
    inner: Arc<Mutex<Vec<(SubscriptionId, Callback<T>)>>>,
}

impl<T: ?Sized> ObserverRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        ObserverRegistry {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a callback; returns the handle required to remove it.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.entries().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription by handle.
    ///
    /// Returns `false` (and changes nothing) when the handle is unknown or
    /// was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every subscriber with `payload`, in subscription order.
    pub fn emit(&self, payload: &T) {
        // Snapshot so subscribers can mutate the list mid-emission without
        // deadlocking on the registry lock.
        let callbacks: Vec<Callback<T>> = self
            .entries()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(payload);
        }
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the registry has no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    // Callbacks never run under this lock, so poisoning can only come from a
    // panic inside the registry itself; recover rather than wedge the node.
    fn entries(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Callback<T>)>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ?Sized> Clone for ObserverRegistry<T> {
    fn clone(&self) -> Self {
        ObserverRegistry {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ObserverRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}
