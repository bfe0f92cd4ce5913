//! Event types delivered to portlet listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HubError, HubResult};
use crate::state::RenderState;

/// Event type fired when a portlet's authoritative render state changes.
pub const ON_STATE_CHANGE: &str = "portlet.onStateChange";

/// Prefix reserved for hub-defined event types.
pub const RESERVED_PREFIX: &str = "portlet.";

/// A validated event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// `portlet.onStateChange`
    StateChange,
    /// Any non-reserved, portlet-defined event type.
    Client(String),
}

impl EventType {
    /// Validate an event type name.
    ///
    /// Empty names and reserved names other than `portlet.onStateChange`
    /// are rejected.
    pub fn parse(name: &str) -> HubResult<Self> {
        if name == ON_STATE_CHANGE {
            Ok(EventType::StateChange)
        } else if name.is_empty() || name.starts_with(RESERVED_PREFIX) {
            Err(HubError::InvalidEventType {
                event_type: name.to_string(),
            })
        } else {
            Ok(EventType::Client(name.to_string()))
        }
    }

    /// The event type as registered.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::StateChange => ON_STATE_CHANGE,
            EventType::Client(name) => name,
        }
    }
}

/// Why a state-change event was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// Delivered once to a newly added listener.
    Initial,
    /// The portlet submitted a new render state.
    Submitted,
    /// Another portlet changed a public parameter this portlet shares.
    PublicParameter,
    /// The portlet executed an action.
    Action,
}

/// Payload of a `portlet.onStateChange` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangeEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    /// The portlet whose state changed.
    pub portlet_id: String,
    pub reason: ChangeReason,
    /// Copy of the new authoritative state.
    pub state: RenderState,
    /// Names of parameters whose values changed (set, replaced or removed).
    pub changed_parameters: Vec<String>,
    pub portlet_mode_changed: bool,
    pub window_state_changed: bool,
}

impl StateChangeEvent {
    pub fn new(
        portlet_id: impl Into<String>,
        reason: ChangeReason,
        state: RenderState,
        changed_parameters: Vec<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            portlet_id: portlet_id.into(),
            reason,
            state,
            changed_parameters,
            portlet_mode_changed: false,
            window_state_changed: false,
        }
    }

    /// Record whether the portlet mode and window state changed.
    pub fn with_mode_changes(mut self, portlet_mode: bool, window_state: bool) -> Self {
        self.portlet_mode_changed = portlet_mode;
        self.window_state_changed = window_state;
        self
    }

    /// Whether `name` is among the changed parameters.
    pub fn changed(&self, name: &str) -> bool {
        self.changed_parameters.iter().any(|n| n == name)
    }
}

/// Payload of a portlet-defined event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    /// The portlet that dispatched the event.
    pub source_portlet_id: String,
    pub payload: serde_json::Value,
}

impl ClientEvent {
    pub fn new(
        event_type: impl Into<String>,
        source_portlet_id: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.into(),
            source_portlet_id: source_portlet_id.into(),
            payload,
        }
    }
}

/// Anything a listener can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortletEvent {
    StateChange(StateChangeEvent),
    Client(ClientEvent),
}

impl PortletEvent {
    /// The event type this event was delivered for.
    pub fn event_type(&self) -> &str {
        match self {
            PortletEvent::StateChange(_) => ON_STATE_CHANGE,
            PortletEvent::Client(event) => &event.event_type,
        }
    }

    pub fn as_state_change(&self) -> Option<&StateChangeEvent> {
        match self {
            PortletEvent::StateChange(event) => Some(event),
            PortletEvent::Client(_) => None,
        }
    }

    pub fn as_client(&self) -> Option<&ClientEvent> {
        match self {
            PortletEvent::Client(event) => Some(event),
            PortletEvent::StateChange(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state_change() {
        assert_eq!(
            EventType::parse("portlet.onStateChange").unwrap(),
            EventType::StateChange
        );
    }

    #[test]
    fn test_parse_client_event() {
        let event_type = EventType::parse("cart.updated").unwrap();
        assert_eq!(event_type, EventType::Client("cart.updated".into()));
        assert_eq!(event_type.as_str(), "cart.updated");
    }

    #[test]
    fn test_parse_rejects_reserved_and_empty() {
        assert!(matches!(
            EventType::parse("portlet.onError"),
            Err(HubError::InvalidEventType { .. })
        ));
        assert!(EventType::parse("").is_err());
    }

    #[test]
    fn test_state_change_event() {
        let event = StateChangeEvent::new(
            "portletA",
            ChangeReason::Submitted,
            RenderState::default(),
            vec!["parm1".into()],
        )
        .with_mode_changes(true, false);
        assert!(event.changed("parm1"));
        assert!(!event.changed("parm2"));
        assert!(event.portlet_mode_changed);
        assert!(!event.window_state_changed);

        let wrapped = PortletEvent::StateChange(event);
        assert_eq!(wrapped.event_type(), ON_STATE_CHANGE);
        assert!(wrapped.as_client().is_none());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = ClientEvent::new("x", "p", serde_json::Value::Null);
        let b = ClientEvent::new("x", "p", serde_json::Value::Null);
        assert_ne!(a.event_id, b.event_id);
        assert_eq!(PortletEvent::Client(a).event_type(), "x");
    }
}
