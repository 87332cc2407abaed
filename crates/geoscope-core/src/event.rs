//! Synchronous publish/subscribe events.
//!
//! An [`Event`] owns a list of listeners. [`Event::subscribe`] returns a
//! [`Subscription`] that removes its listener when unsubscribed or dropped,
//! so a subscriber only stays registered for as long as it holds the handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct ListenerList<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

impl<T> ListenerList<T> {
    fn find(&self, id: u64) -> Option<Listener<T>> {
        self.listeners
            .iter()
            .find(|(listener_id, _)| *listener_id == id)
            .map(|(_, listener)| Rc::clone(listener))
    }
}

/// A single-threaded event carrying payloads of type `T`.
pub struct Event<T> {
    list: Rc<RefCell<ListenerList<T>>>,
}

impl<T: 'static> Event<T> {
    /// Creates an event with no listeners.
    pub fn new() -> Self {
        Self {
            list: Rc::new(RefCell::new(ListenerList {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers `listener` and returns the handle that keeps it registered.
    #[must_use = "dropping the subscription removes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut list = self.list.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.listeners.push((id, Rc::new(listener)));
            id
        };

        let list: Weak<RefCell<ListenerList<T>>> = Rc::downgrade(&self.list);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(list) = list.upgrade() {
                    list.borrow_mut()
                        .listeners
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    /// Invokes every listener registered when the call starts, in
    /// registration order.
    ///
    /// Listeners may subscribe or unsubscribe while the event is being
    /// raised; a listener removed mid-raise is not invoked afterwards.
    pub fn raise(&self, payload: &T) {
        let ids: Vec<u64> = self.list.borrow().listeners.iter().map(|(id, _)| *id).collect();
        for id in ids {
            let listener = self.list.borrow().find(id);
            if let Some(listener) = listener {
                listener(payload);
            }
        }
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.list.borrow().listeners.len()
    }
}

impl<T: 'static> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.list.borrow().listeners.len())
            .finish()
    }
}

/// Handle to a registered listener.
///
/// The listener is removed by [`Subscription::unsubscribe`] or when the
/// handle is dropped. Outliving the event is harmless.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Removes the listener.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
