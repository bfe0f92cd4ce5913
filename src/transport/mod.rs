//! Transport seam between the hub and the server-side portlet container.
//!
//! The hub never encodes anything itself. It hands a [`StateSubmission`] or
//! [`ActionSubmission`] to a [`Transport`] and applies the returned
//! [`StateUpdate`]. All request/response types are serde-serializable so a
//! concrete transport can put them on whatever wire it uses.

/// In-process transport that accepts every submission.
pub mod simulated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::hub::delta::{ParameterChange, StateDelta};
use crate::parameters::Parameters;
use crate::state::RenderState;

pub use simulated::SimulatedTransport;

/// A render state submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSubmission {
    pub portlet_id: String,
    /// Difference from the last authoritative state.
    pub delta: StateDelta,
    /// The full submitted state.
    pub state: RenderState,
}

/// An action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSubmission {
    pub portlet_id: String,
    pub action_parameters: Parameters,
    /// The portlet's current authoritative state.
    pub state: RenderState,
    /// Names the portlet declares public.
    pub public_parameters: Vec<String>,
}

/// A successful server response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// New authoritative state of the submitting portlet, possibly amended
    /// by the server.
    pub state: RenderState,
    /// Public parameter values to apply to every other portlet that
    /// declares the same name public.
    #[serde(default)]
    pub public_parameters: Vec<ParameterChange>,
}

/// The round trip to the server.
///
/// Any `Err` is handled the same way by the hub: nothing is applied, no
/// listener fires, and the caller's operation fails.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a render state submission and return the server's answer.
    async fn submit_state(&self, submission: StateSubmission)
        -> Result<StateUpdate, TransportError>;

    /// Execute an action and return the resulting render state.
    async fn execute_action(
        &self,
        submission: ActionSubmission,
    ) -> Result<StateUpdate, TransportError>;
}
