//! The per-portlet handle returned by [`PortletHub::register`].

use std::fmt;
use std::sync::Arc;

use super::{PortletHub, SubmitOutcome};
use crate::constants::{Constants, CONSTANTS};
use crate::error::{HubError, HubResult};
use crate::events::{ListenerHandle, PortletEvent};
use crate::parameters::Parameters;
use crate::state::RenderState;

/// A registered portlet's view of the hub.
///
/// Cloning is cheap; every clone talks to the same hub.
#[derive(Clone)]
pub struct PortletInit {
    hub: PortletHub,
    portlet_id: String,
}

impl fmt::Debug for PortletInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortletInit")
            .field("portlet_id", &self.portlet_id)
            .finish()
    }
}

impl PortletInit {
    pub(crate) fn new(hub: PortletHub, portlet_id: impl Into<String>) -> Self {
        Self {
            hub,
            portlet_id: portlet_id.into(),
        }
    }

    /// The id this handle was registered under.
    pub fn portlet_id(&self) -> &str {
        &self.portlet_id
    }

    /// The constants registry.
    pub fn constants(&self) -> &'static Constants {
        &CONSTANTS
    }

    /// A new parameter container, empty or a deep copy of `seed`.
    pub fn new_parameters(&self, seed: Option<&Parameters>) -> Parameters {
        seed.cloned().unwrap_or_default()
    }

    /// A new render state, a deep copy of `seed` or, without a seed, the
    /// configured default mode and window state with no parameters.
    pub fn new_state(&self, seed: Option<&RenderState>) -> RenderState {
        match seed {
            Some(seed) => seed.clone(),
            None => {
                let config = self.hub.config();
                RenderState::new(
                    config.default_portlet_mode.as_str(),
                    config.default_window_state.as_str(),
                    Parameters::new(),
                )
            }
        }
    }

    /// Copy of this portlet's authoritative render state.
    pub fn render_state(&self) -> RenderState {
        self.hub.render_state(&self.portlet_id).unwrap_or_default()
    }

    /// Register `callback` for `event_type` on this portlet.
    ///
    /// `event_type` is either `"portlet.onStateChange"` or a portlet-defined
    /// type not starting with `"portlet."`.
    pub fn add_event_listener<F>(&self, event_type: &str, callback: F) -> HubResult<ListenerHandle>
    where
        F: Fn(&PortletEvent) + Send + Sync + 'static,
    {
        self.hub
            .add_listener(&self.portlet_id, event_type, Arc::new(callback))
    }

    /// Detach a listener. `None` is a no-op; a handle that is not currently
    /// registered on this portlet is rejected with
    /// [`HubError::UnknownListener`].
    pub fn remove_event_listener(&self, handle: impl Into<Option<ListenerHandle>>) -> HubResult<()> {
        let Some(handle) = handle.into() else {
            return Ok(());
        };
        if handle.portlet_id() != self.portlet_id {
            return Err(HubError::UnknownListener { handle });
        }
        self.hub.remove_listener(handle)
    }

    /// Submit a new render state for this portlet.
    ///
    /// Resolves once the round trip has completed and every affected
    /// listener has been notified. Fails with
    /// [`HubError::CommunicationFailure`] if the transport fails, in which
    /// case nothing was applied and no listener was invoked.
    pub async fn set_render_state(&self, state: &RenderState) -> HubResult<SubmitOutcome> {
        self.hub.submit_state(&self.portlet_id, state).await
    }

    /// Execute an action with the given action parameters.
    pub async fn action(&self, action_parameters: &Parameters) -> HubResult<SubmitOutcome> {
        self.hub.submit_action(&self.portlet_id, action_parameters).await
    }

    /// Whether any submission is in flight on the hub.
    pub fn is_in_progress(&self) -> bool {
        self.hub.is_in_progress()
    }

    /// Deliver a portlet-defined event to every listener of that type on the
    /// page. Returns the number of listeners invoked.
    pub fn dispatch_client_event(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> HubResult<usize> {
        self.hub
            .dispatch_client_event(&self.portlet_id, event_type, payload)
    }
}
