//! Portlet events and the listener registry.
//!
//! The hub fires `portlet.onStateChange` whenever a portlet's authoritative
//! state changes, and relays portlet-defined client events between
//! portlets. Listeners for the same (portlet, event type) are invoked in
//! registration order.

/// Event payloads and event type validation.
pub mod event;

/// Ordered (portlet, event type) -> listener multimap.
pub mod listener_registry;

pub use event::{
    ChangeReason, ClientEvent, EventType, PortletEvent, StateChangeEvent, ON_STATE_CHANGE,
    RESERVED_PREFIX,
};
pub use listener_registry::{ListenerCallback, ListenerHandle, ListenerRegistry};
