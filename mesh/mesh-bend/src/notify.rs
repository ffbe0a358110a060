//! Change notification for curves.
//!
//! A [`ChangeNotifier`] keeps a list of listeners; [`ChangeNotifier::subscribe`]
//! returns a [`Subscription`] guard that removes its listener when dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

impl Listeners {
    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry, _)| *entry != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry, _)| *entry == id)
    }
}

/// Broadcasts "something changed" to registered listeners.
///
/// # Example
///
/// ```
/// use mesh_bend::ChangeNotifier;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let notifier = ChangeNotifier::new();
/// let hits = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&hits);
/// let subscription = notifier.subscribe(move || counter.set(counter.get() + 1));
///
/// notifier.notify();
/// drop(subscription);
/// notifier.notify();
///
/// assert_eq!(hits.get(), 1);
/// ```
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Rc<Listeners>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ChangeNotifier {
    /// Create a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id + 1);
        let listener: Listener = Rc::new(listener);
        self.listeners.entries.borrow_mut().push((id, listener));

        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Call every registered listener.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; the set
    /// notified is the one registered when this call started.
    pub fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        trace!(listeners = snapshot.len(), "notifying curve listeners");
        for listener in snapshot {
            listener();
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.entries.borrow().len()
    }
}

/// Registration guard returned by [`ChangeNotifier::subscribe`].
///
/// Dropping it removes the listener. It may outlive the notifier.
#[derive(Debug)]
pub struct Subscription {
    listeners: Weak<Listeners>,
    id: u64,
}

impl Subscription {
    /// Check if the listener is still registered with a live notifier.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| listeners.contains(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}
