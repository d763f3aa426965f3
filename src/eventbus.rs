//! Non-owning listener registry.
//!
//! Devices and the manager notify observers through a [`ListenerSet`]. The set
//! stores [`Weak`] handles, so registering a listener never keeps it alive:
//! the caller owns it and should deregister it when done. A listener that is
//! dropped without deregistering is skipped on the next notification and
//! pruned on the next registration.
//!
//! # Ordering and re-entrancy
//! - Notifications follow registration order; duplicates are delivered once
//!   per registration.
//! - [`ListenerSet::snapshot`] copies the live handles before delivery, so
//!   adding or removing listeners while a notification is in flight never
//!   invalidates the iteration.
//! - A listener that is already borrowed (re-entrant delivery to itself) is
//!   skipped rather than panicking.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Ordered collection of weak listener handles.
///
/// Registration goes through `&self`, so a listener can add or remove
/// listeners (itself included) from inside a notification.
pub struct ListenerSet<T: ?Sized> {
    entries: RefCell<Vec<Weak<RefCell<T>>>>,
}

impl<T: ?Sized> Default for ListenerSet<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> Clone for ListenerSet<T> {
    fn clone(&self) -> Self {
        Self {
            entries: RefCell::new(self.entries.borrow().clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("registered", &self.entries.borrow().len())
            .field("live", &self.len())
            .finish()
    }
}

impl<T: ?Sized> ListenerSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registering the same listener twice is allowed.
    pub fn add(&self, listener: Weak<RefCell<T>>) {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|w| w.strong_count() > 0);
        entries.push(listener);
    }

    /// Remove the first registration of `listener`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&self, listener: &Weak<RefCell<T>>) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|w| Weak::ptr_eq(w, listener)) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Weak<RefCell<T>>) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|w| Weak::ptr_eq(w, listener))
    }

    /// Number of registrations whose listener is still alive.
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live listeners, in registration order.
    pub fn snapshot(&self) -> Vec<Rc<RefCell<T>>> {
        self.entries
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Deliver to every live listener, in registration order.
    ///
    /// The recipients are fixed when delivery starts: a listener removed by an
    /// earlier recipient still gets this notification, but no later ones, and
    /// a listener added during delivery first hears the next one.
    pub fn notify(&self, mut f: impl FnMut(&mut T)) {
        for listener in self.snapshot() {
            match listener.try_borrow_mut() {
                Ok(mut l) => f(&mut *l),
                Err(_) => trace!("skipping listener already in a callback"),
            }
        }
    }
}
