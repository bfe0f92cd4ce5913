//! Ordered listener registry keyed by (portlet, event type).
//!
//! Entries live in one vector in global registration order, so filtering by
//! key yields each key's listeners in the order they were added.

use std::fmt;
use std::sync::Arc;

use super::event::{EventType, PortletEvent};

/// A listener callback.
pub type ListenerCallback = Arc<dyn Fn(&PortletEvent) + Send + Sync>;

/// Opaque token returned by `add_event_listener`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    id: u64,
    portlet_id: String,
    event_type: String,
}

impl ListenerHandle {
    /// The portlet the listener was added on.
    pub fn portlet_id(&self) -> &str {
        &self.portlet_id
    }

    /// The event type the listener was added for.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerHandle({}:{}:{})", self.id, self.portlet_id, self.event_type)
    }
}

struct ListenerEntry {
    handle: ListenerHandle,
    event_type: EventType,
    callback: ListenerCallback,
}

/// The hub's listener multimap.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("next_id", &self.next_id)
            .field(
                "handles",
                &self.entries.iter().map(|e| &e.handle).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener and return its handle.
    pub fn add(
        &mut self,
        portlet_id: &str,
        event_type: EventType,
        callback: ListenerCallback,
    ) -> ListenerHandle {
        self.next_id += 1;
        let handle = ListenerHandle {
            id: self.next_id,
            portlet_id: portlet_id.to_string(),
            event_type: event_type.as_str().to_string(),
        };
        self.entries.push(ListenerEntry {
            handle: handle.clone(),
            event_type,
            callback,
        });
        handle
    }

    /// Detach exactly the registration behind `handle`. Returns `false` if
    /// it was not registered.
    pub fn remove(&mut self, handle: &ListenerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == *handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Callbacks for one portlet and event type, in registration order.
    pub fn listeners_for(&self, portlet_id: &str, event_type: &EventType) -> Vec<ListenerCallback> {
        self.entries
            .iter()
            .filter(|e| e.handle.portlet_id == portlet_id && e.event_type == *event_type)
            .map(|e| e.callback.clone())
            .collect()
    }

    /// `(portlet id, callback)` for every listener of `event_type` across all
    /// portlets, in registration order.
    pub fn listeners_of_type(&self, event_type: &EventType) -> Vec<(String, ListenerCallback)> {
        self.entries
            .iter()
            .filter(|e| e.event_type == *event_type)
            .map(|e| (e.handle.portlet_id.clone(), e.callback.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Invoke a listener, containing any panic so one faulty listener cannot
/// stop the rest of a dispatch.
pub(crate) fn invoke(callback: &ListenerCallback, event: &PortletEvent) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(event)));
    if let Err(e) = result {
        log::error!(
            "[PortletHub] Listener panic while handling {}: {:?}",
            event.event_type(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event::ClientEvent;
    use parking_lot::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> ListenerCallback {
        let log = log.clone();
        let tag = tag.to_string();
        Arc::new(move |_event: &PortletEvent| log.lock().push(tag.clone()))
    }

    fn client_event() -> PortletEvent {
        PortletEvent::Client(ClientEvent::new("ping", "src", serde_json::Value::Null))
    }

    #[test]
    fn test_registration_order_per_key() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.add("a", EventType::StateChange, recorder(&log, "a1"));
        registry.add("b", EventType::StateChange, recorder(&log, "b1"));
        registry.add("a", EventType::StateChange, recorder(&log, "a2"));
        registry.add("a", EventType::Client("ping".into()), recorder(&log, "a-ping"));

        let event = client_event();
        for cb in registry.listeners_for("a", &EventType::StateChange) {
            invoke(&cb, &event);
        }
        assert_eq!(*log.lock(), vec!["a1", "a2"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_remove_detaches_exactly_one() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        let h1 = registry.add("a", EventType::StateChange, recorder(&log, "1"));
        let h2 = registry.add("a", EventType::StateChange, recorder(&log, "2"));
        assert_ne!(h1, h2);

        assert!(registry.remove(&h1));
        assert!(!registry.remove(&h1));
        assert_eq!(registry.len(), 1);

        let event = client_event();
        for cb in registry.listeners_for("a", &EventType::StateChange) {
            invoke(&cb, &event);
        }
        assert_eq!(*log.lock(), vec!["2"]);
        assert!(registry.remove(&h2));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listeners_of_type_spans_portlets() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.add("a", EventType::Client("ping".into()), recorder(&log, "a"));
        registry.add("b", EventType::StateChange, recorder(&log, "b"));
        registry.add("c", EventType::Client("ping".into()), recorder(&log, "c"));

        let found = registry.listeners_of_type(&EventType::Client("ping".into()));
        let ids: Vec<_> = found.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_panicking_listener_is_contained() {
        let cb: ListenerCallback = Arc::new(|_event: &PortletEvent| panic!("boom"));
        invoke(&cb, &client_event());
    }

    #[test]
    fn test_handle_accessors() {
        let mut registry = ListenerRegistry::new();
        let handle = registry.add("a", EventType::StateChange, Arc::new(|_: &PortletEvent| {}));
        assert_eq!(handle.portlet_id(), "a");
        assert_eq!(handle.event_type(), "portlet.onStateChange");
        assert!(format!("{:?}", handle).starts_with("ListenerHandle(1:a:"));
    }
}
