//! Host-wide container resize notifications.
//!
//! A [`ResizeHub`] stands in for the window-level resize event. Each mounted
//! pad holds a [`Subscription`]; dropping it unregisters the listener, so a
//! pad torn down early never leaves one behind.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Rc<Cell<Option<u32>>>)>,
}

/// Broadcasts the latest container width to every live subscription.
#[derive(Clone, Default)]
pub struct ResizeHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ResizeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let pending = Rc::new(Cell::new(None));
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::clone(&pending)));
        Subscription {
            id,
            pending,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Record a new width for every listener. Only the latest width is kept
    /// until the listener drains it.
    pub fn notify(&self, width: u32) {
        for (_, pending) in &self.inner.borrow().listeners {
            pending.set(Some(width));
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// A live listener registration.
pub struct Subscription {
    id: u64,
    pending: Rc<Cell<Option<u32>>>,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    /// Take the width notified since the last call, if any.
    pub fn take(&self) -> Option<u32> {
        self.pending.take()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
