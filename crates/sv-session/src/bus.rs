//! Typed publish/subscribe.
//!
//! Replaces the window-level custom events the web client used to rely on
//! for intra-module wiring; the browser layer still mirrors emissions onto
//! the DOM for independently-loaded components.
//!
//! Single-threaded by design (`Rc`/`RefCell`), matching the browser runtime.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Registry<T: 'static> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

/// A broadcast channel for one event type.
pub struct EventBus<T: 'static> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> EventBus<T> {
    pub fn new() -> Self {
        EventBus {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register a handler. Dropping the returned [`Subscription`]
    /// unsubscribes; call [`Subscription::forget`] for page-lifetime
    /// listeners.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription<T> {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.push((id, Rc::new(handler)));
            id
        };
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
            forgotten: false,
        }
    }

    /// Invoke every registered handler. The handler list is snapshotted
    /// first, so handlers may subscribe or unsubscribe re-entrantly; a
    /// handler removed mid-emit still sees the current event.
    pub fn emit(&self, value: &T) {
        let handlers: Vec<Handler<T>> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(value);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        EventBus::new()
    }
}

impl<T: 'static> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        EventBus {
            registry: self.registry.clone(),
        }
    }
}

/// Disposer for a registered handler.
pub struct Subscription<T: 'static> {
    id: u64,
    registry: Weak<RefCell<Registry<T>>>,
    forgotten: bool,
}

impl<T: 'static> Subscription<T> {
    /// Explicitly unsubscribe (same as dropping).
    pub fn cancel(self) {}

    /// Keep the handler registered for the lifetime of the bus.
    pub fn forget(mut self) {
        self.forgotten = true;
    }
}

impl<T: 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        if self.forgotten {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .handlers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Rc::new(Cell::new(0u32));

        let seen2 = seen.clone();
        let sub = bus.subscribe(move |v| seen2.set(seen2.get() + *v));
        bus.emit(&1);
        assert_eq!(seen.get(), 1);

        drop(sub);
        bus.emit(&1);
        assert_eq!(seen.get(), 1);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn forgotten_subscription_outlives_its_guard() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Rc::new(Cell::new(0u32));

        let seen2 = seen.clone();
        bus.subscribe(move |v| seen2.set(seen2.get() + *v)).forget();
        bus.emit(&2);
        bus.emit(&3);
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn reentrant_subscribe_during_emit_does_not_panic() {
        let bus: EventBus<()> = EventBus::new();
        let bus2 = bus.clone();
        bus.subscribe(move |_| {
            bus2.subscribe(|_| {}).forget();
        })
        .forget();

        bus.emit(&());
        bus.emit(&());
        assert_eq!(bus.handler_count(), 3);
    }
}
