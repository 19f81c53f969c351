//! Event dispatch system
//!
//! Subscription points for scene nodes. Handlers run synchronously inside the
//! dispatch cycle that produced the event; within one input event, pointer-move
//! effects are always dispatched before down/up effects.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    /// Pointer released over the same node it went down on
    pub const CLICK: EventType = 4;
    pub const FOCUS: EventType = 10;
    pub const BLUR: EventType = 11;
    pub const KEY_DOWN: EventType = 20;
    /// A widget's value changed (e.g. slider drag)
    pub const VALUE_CHANGE: EventType = 40;
}

/// Key input routed to the focused node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event<K> {
    pub event_type: EventType,
    pub target: K,
    pub data: EventData,
    pub timestamp: f64,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        /// Surface-space pointer position
        x: f32,
        y: f32,
        /// Pointer position in the target node's local space
        local_x: f32,
        local_y: f32,
    },
    Key {
        key: Key,
    },
    ValueChange {
        previous: f32,
        value: f32,
    },
    None,
}

impl<K> Event<K> {
    pub fn new(event_type: EventType, target: K, data: EventData, timestamp: f64) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp,
            propagation_stopped: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event handler function type
pub type EventHandler<K> = Box<dyn Fn(&Event<K>)>;

/// Dispatches events to registered handlers
///
/// Generic over the target key so the scene crate can use its arena keys
/// without this crate knowing about them.
pub struct EventDispatcher<K> {
    handlers: FxHashMap<(K, EventType), Vec<EventHandler<K>>>,
}

impl<K: Copy + Eq + Hash> EventDispatcher<K> {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for a target and event type
    pub fn register<F>(&mut self, target: K, event_type: EventType, handler: F)
    where
        F: Fn(&Event<K>) + 'static,
    {
        self.handlers
            .entry((target, event_type))
            .or_default()
            .push(Box::new(handler));
    }

    /// Remove all handlers for a target (e.g. when its node is destroyed)
    pub fn unregister_target(&mut self, target: K) {
        self.handlers.retain(|(t, _), _| *t != target);
    }

    /// Dispatch an event to all registered handlers
    pub fn dispatch(&self, event: &mut Event<K>) {
        if let Some(handlers) = self.handlers.get(&(event.target, event.event_type)) {
            tracing::trace!(
                event_type = event.event_type,
                handlers = handlers.len(),
                "dispatch"
            );
            for handler in handlers {
                if event.propagation_stopped {
                    break;
                }
                handler(event);
            }
        }
    }
}

impl<K: Copy + Eq + Hash> Default for EventDispatcher<K> {
    fn default() -> Self {
        Self::new()
    }
}
