//! The portlet hub.
//!
//! A [`PortletHub`] owns the page's authoritative state store and listener
//! registry. Portlets [`register`](PortletHub::register) to obtain a
//! [`PortletInit`] handle, build [`RenderState`]s with its factories, and
//! submit them. After a successful round trip the store is updated and
//! `portlet.onStateChange` listeners are notified: the submitter's first,
//! then those of every portlet sharing a changed public parameter, in page
//! order.
//!
//! Submissions are serialized with a FIFO lock, so concurrent submissions
//! are applied in one total order. Once a round trip has started it runs on
//! its own task together with the commit: dropping the caller's future
//! detaches it but never aborts it. No store or registry lock is held while
//! a listener runs, so listeners may call back into the hub.

/// State delta computation.
pub mod delta;

/// Per-portlet handle.
pub mod portlet_init;

mod store;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;

use crate::bootstrap::PageBootstrap;
use crate::config::HubConfig;
use crate::error::{HubError, HubResult, TransportError};
use crate::events::listener_registry::invoke;
use crate::events::{
    ChangeReason, ClientEvent, EventType, ListenerCallback, ListenerHandle, ListenerRegistry,
    PortletEvent, StateChangeEvent,
};
use crate::parameters::Parameters;
use crate::state::RenderState;
use crate::transport::{ActionSubmission, StateSubmission, StateUpdate, Transport};

pub use delta::{ParameterChange, StateDelta};
pub use portlet_init::PortletInit;
use store::StateStore;

// ---------------------------------------------------------------------------
// Outcome and internals
// ---------------------------------------------------------------------------

/// Result of a successful submission or action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// The submitter's authoritative state after the round trip.
    pub state: RenderState,
    /// Portlets whose state changed, in notification order. Empty when the
    /// submission changed nothing and no round trip was made.
    pub notified_portlets: Vec<String>,
}

struct HubInner {
    config: HubConfig,
    store: Mutex<StateStore>,
    listeners: Mutex<ListenerRegistry>,
    transport: Arc<dyn Transport>,
    submit_lock: Arc<tokio::sync::Mutex<()>>,
    in_flight: AtomicUsize,
}

/// Counts a submission as in flight for as long as it lives.
struct InFlight(Arc<HubInner>);

impl InFlight {
    fn enter(inner: &Arc<HubInner>) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self(inner.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A request ready to be sent.
enum RoundTrip {
    State(StateSubmission),
    Action(ActionSubmission),
}

impl RoundTrip {
    fn reason(&self) -> ChangeReason {
        match self {
            RoundTrip::State(_) => ChangeReason::Submitted,
            RoundTrip::Action(_) => ChangeReason::Action,
        }
    }
}

// ---------------------------------------------------------------------------
// PortletHub
// ---------------------------------------------------------------------------

/// The page-level hub. Cloning shares the same hub.
#[derive(Clone)]
pub struct PortletHub {
    inner: Arc<HubInner>,
}

impl fmt::Debug for PortletHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortletHub")
            .field("portlets", &self.portlet_ids())
            .field("listeners", &self.inner.listeners.lock().len())
            .field("in_flight", &self.inner.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

impl PortletHub {
    /// Create a hub for `page` with the default configuration.
    pub fn new(page: PageBootstrap, transport: Arc<dyn Transport>) -> HubResult<Self> {
        Self::with_config(page, transport, HubConfig::default())
    }

    /// Create a hub for `page`. Fails if the page bootstrap does not
    /// validate.
    pub fn with_config(
        page: PageBootstrap,
        transport: Arc<dyn Transport>,
        config: HubConfig,
    ) -> HubResult<Self> {
        page.validate()?;
        log::info!(
            "[PortletHub] Initialized with {} portlet(s)",
            page.portlets.len()
        );
        Ok(Self {
            inner: Arc::new(HubInner {
                config,
                store: Mutex::new(StateStore::from_bootstrap(&page)),
                listeners: Mutex::new(ListenerRegistry::new()),
                transport,
                submit_lock: Arc::new(tokio::sync::Mutex::new(())),
                in_flight: AtomicUsize::new(0),
            }),
        })
    }

    /// The configuration this hub was built with.
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Portlet ids in page order.
    pub fn portlet_ids(&self) -> Vec<String> {
        self.inner.store.lock().ids()
    }

    /// Register a portlet and obtain its handle.
    ///
    /// Registering the same portlet again yields an equivalent handle; the
    /// portlet's state and listeners are kept.
    pub async fn register(&self, portlet_id: &str) -> HubResult<PortletInit> {
        {
            let mut store = self.inner.store.lock();
            let record = store.get_mut(portlet_id).ok_or_else(|| {
                log::warn!("[PortletHub] Registration refused for unknown portlet '{portlet_id}'");
                HubError::UnknownComponent {
                    portlet_id: portlet_id.to_string(),
                }
            })?;
            if record.registered {
                log::debug!("[PortletHub] Portlet '{portlet_id}' registered again");
            } else {
                record.registered = true;
                log::info!("[PortletHub] Registered portlet '{portlet_id}'");
            }
        }
        Ok(PortletInit::new(self.clone(), portlet_id))
    }

    /// Whether any submission or action is queued or in flight.
    pub fn is_in_progress(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn render_state(&self, portlet_id: &str) -> Option<RenderState> {
        self.inner
            .store
            .lock()
            .get(portlet_id)
            .map(|r| r.state.clone())
    }

    // -----------------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------------

    pub(crate) async fn submit_state(
        &self,
        portlet_id: &str,
        state: &RenderState,
    ) -> HubResult<SubmitOutcome> {
        let in_flight = InFlight::enter(&self.inner);
        let serial = self.inner.submit_lock.clone().lock_owned().await;

        let (delta, current) = {
            let store = self.inner.store.lock();
            let record = store.get(portlet_id).ok_or_else(|| HubError::UnknownComponent {
                portlet_id: portlet_id.to_string(),
            })?;
            let delta = StateDelta::between(&record.state, state, |name| record.is_public(name));
            (delta, record.state.clone())
        };

        if delta.is_empty() {
            log::debug!("[PortletHub] State of '{portlet_id}' unchanged, nothing to submit");
            return Ok(SubmitOutcome {
                state: current,
                notified_portlets: Vec::new(),
            });
        }

        log::debug!(
            "[PortletHub] Submitting state for '{}': {} private, {} public change(s)",
            portlet_id,
            delta.private_parameters.len(),
            delta.public_parameters.len()
        );
        let submission = StateSubmission {
            portlet_id: portlet_id.to_string(),
            delta,
            state: state.clone(),
        };
        self.run_round_trip(portlet_id, RoundTrip::State(submission), serial, in_flight)
            .await
    }

    pub(crate) async fn submit_action(
        &self,
        portlet_id: &str,
        action_parameters: &Parameters,
    ) -> HubResult<SubmitOutcome> {
        let in_flight = InFlight::enter(&self.inner);
        let serial = self.inner.submit_lock.clone().lock_owned().await;

        let submission = {
            let store = self.inner.store.lock();
            let record = store.get(portlet_id).ok_or_else(|| HubError::UnknownComponent {
                portlet_id: portlet_id.to_string(),
            })?;
            ActionSubmission {
                portlet_id: portlet_id.to_string(),
                action_parameters: action_parameters.clone(),
                state: record.state.clone(),
                public_parameters: record.descriptor.public_parameters.clone(),
            }
        };

        log::debug!(
            "[PortletHub] Executing action for '{}' with {} parameter(s)",
            portlet_id,
            action_parameters.len()
        );
        self.run_round_trip(portlet_id, RoundTrip::Action(submission), serial, in_flight)
            .await
    }

    /// Send `request` and commit the response on a detached task.
    ///
    /// The task owns the serialization guard, so the next submission waits
    /// for the commit even if this caller has gone away.
    async fn run_round_trip(
        &self,
        portlet_id: &str,
        request: RoundTrip,
        serial: OwnedMutexGuard<()>,
        in_flight: InFlight,
    ) -> HubResult<SubmitOutcome> {
        let hub = self.clone();
        let portlet_id = portlet_id.to_string();
        let task = tokio::spawn(async move {
            let _serial = serial;
            let _in_flight = in_flight;
            let reason = request.reason();
            let response = match request {
                RoundTrip::State(submission) => {
                    hub.inner.transport.submit_state(submission).await
                }
                RoundTrip::Action(submission) => {
                    hub.inner.transport.execute_action(submission).await
                }
            };
            let update = response.map_err(|source| communication_failure(&portlet_id, source))?;
            Ok::<_, HubError>(hub.commit(&portlet_id, update, reason))
        });

        task.await.map_err(|e| {
            log::error!("[PortletHub] Submission task failed: {e}");
            HubError::Task(e.to_string())
        })?
    }

    /// Apply a successful response and notify listeners.
    fn commit(&self, portlet_id: &str, update: StateUpdate, reason: ChangeReason) -> SubmitOutcome {
        let events = self
            .inner
            .store
            .lock()
            .apply_update(portlet_id, update, reason);

        let state = events
            .first()
            .filter(|e| e.portlet_id == portlet_id)
            .map(|e| e.state.clone())
            .unwrap_or_default();
        let notified_portlets = events.iter().map(|e| e.portlet_id.clone()).collect();

        self.dispatch_state_changes(events);
        SubmitOutcome {
            state,
            notified_portlets,
        }
    }

    // -----------------------------------------------------------------------
    // Listeners and dispatch
    // -----------------------------------------------------------------------

    fn dispatch_state_changes(&self, events: Vec<StateChangeEvent>) {
        for event in events {
            let callbacks = self
                .inner
                .listeners
                .lock()
                .listeners_for(&event.portlet_id, &EventType::StateChange);
            log::debug!(
                "[PortletHub] onStateChange for '{}' ({:?}), {} listener(s), changed: {:?}",
                event.portlet_id,
                event.reason,
                callbacks.len(),
                event.changed_parameters
            );
            let event = PortletEvent::StateChange(event);
            for callback in &callbacks {
                invoke(callback, &event);
            }
        }
    }

    pub(crate) fn add_listener(
        &self,
        portlet_id: &str,
        event_type: &str,
        callback: ListenerCallback,
    ) -> HubResult<ListenerHandle> {
        let event_type = EventType::parse(event_type)?;
        let handle =
            self.inner
                .listeners
                .lock()
                .add(portlet_id, event_type.clone(), callback.clone());
        log::debug!("[PortletHub] Added listener {handle:?}");

        if event_type == EventType::StateChange && self.inner.config.emit_initial_state {
            if let Some(state) = self.render_state(portlet_id) {
                let names = state.parameters().keys().map(str::to_string).collect();
                let event = PortletEvent::StateChange(StateChangeEvent::new(
                    portlet_id,
                    ChangeReason::Initial,
                    state,
                    names,
                ));
                invoke(&callback, &event);
            }
        }

        Ok(handle)
    }

    pub(crate) fn remove_listener(&self, handle: ListenerHandle) -> HubResult<()> {
        if self.inner.listeners.lock().remove(&handle) {
            log::debug!("[PortletHub] Removed listener {handle:?}");
            Ok(())
        } else {
            log::warn!("[PortletHub] Attempt to remove unknown listener {handle:?}");
            Err(HubError::UnknownListener { handle })
        }
    }

    pub(crate) fn dispatch_client_event(
        &self,
        source_portlet_id: &str,
        event_type: &str,
        payload: serde_json::Value,
    ) -> HubResult<usize> {
        let parsed = EventType::parse(event_type)?;
        if parsed == EventType::StateChange {
            return Err(HubError::InvalidEventType {
                event_type: event_type.to_string(),
            });
        }

        let targets = self.inner.listeners.lock().listeners_of_type(&parsed);
        let event = PortletEvent::Client(ClientEvent::new(event_type, source_portlet_id, payload));
        for (_, callback) in &targets {
            invoke(callback, &event);
        }
        log::debug!(
            "[PortletHub] Client event '{}' from '{}' delivered to {} listener(s)",
            event_type,
            source_portlet_id,
            targets.len()
        );
        Ok(targets.len())
    }
}

fn communication_failure(portlet_id: &str, source: TransportError) -> HubError {
    log::warn!("[PortletHub] Round trip for '{portlet_id}' failed: {source}");
    HubError::CommunicationFailure {
        portlet_id: portlet_id.to_string(),
        source,
    }
}
