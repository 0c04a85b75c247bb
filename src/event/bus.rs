use std::cell::{Cell, RefCell};

use crate::event::{EventHandler, SceneEvent};

/// Handle returned by [`EventBus::subscribe`], needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// A simple event bus for broadcasting scene events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Box<dyn EventHandler>)>>,
    next_id: Cell<usize>,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        // Subscriptions belong to the original scene, never to copies of it
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Detach a handler, handing it back to the caller
    pub fn unsubscribe(&self, id: SubscriptionId) -> Option<Box<dyn EventHandler>> {
        let mut handlers = self.handlers.borrow_mut();
        let index = handlers.iter().position(|(sub, _)| *sub == id)?;
        Some(handlers.remove(index).1)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: SceneEvent) {
        for (_, handler) in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}
