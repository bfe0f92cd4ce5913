//! In-process transport that stands in for the portlet container.
//!
//! Every submission is accepted verbatim. A runtime switch makes every call
//! fail with a communication error instead.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ActionSubmission, StateSubmission, StateUpdate, Transport};
use crate::error::TransportError;
use crate::hub::delta::ParameterChange;

/// Message carried by simulated failures.
pub const SIMULATED_COMM_ERROR: &str = "Simulated communication error";

/// Echoing transport with switchable failure and optional latency.
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    simulate_comm_error: AtomicBool,
    latency: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (`true`) or succeed (`false`).
    pub fn set_simulate_comm_error(&self, enabled: bool) {
        self.simulate_comm_error.store(enabled, Ordering::SeqCst);
    }

    /// Whether calls currently fail.
    pub fn simulates_comm_error(&self) -> bool {
        self.simulate_comm_error.load(Ordering::SeqCst)
    }

    /// Delay every call by `latency` before answering.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Number of round trips attempted so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn round_trip(&self) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.simulates_comm_error() {
            log::debug!("[SimulatedTransport] Failing round trip on request");
            return Err(TransportError::CommunicationError(SIMULATED_COMM_ERROR.into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn submit_state(
        &self,
        submission: StateSubmission,
    ) -> Result<StateUpdate, TransportError> {
        self.round_trip().await?;
        Ok(StateUpdate {
            state: submission.state,
            public_parameters: submission.delta.public_parameters,
        })
    }

    /// Action parameters are copied into the render parameters.
    async fn execute_action(
        &self,
        submission: ActionSubmission,
    ) -> Result<StateUpdate, TransportError> {
        self.round_trip().await?;

        let mut state = submission.state;
        let mut public_parameters = Vec::new();
        for (name, values) in submission.action_parameters.iter() {
            if state.parameters().get_values(name) == Some(values) {
                continue;
            }
            state.parameters_mut().set_value(name, values);
            if submission.public_parameters.iter().any(|p| p == name) {
                public_parameters.push(ParameterChange::set(name, values.to_vec()));
            }
        }
        Ok(StateUpdate {
            state,
            public_parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::delta::StateDelta;
    use crate::parameters::Parameters;
    use crate::state::RenderState;

    fn submission() -> StateSubmission {
        let mut state = RenderState::new("VIEW", "NORMAL", Parameters::new());
        state.parameters_mut().set_value("pub", "x");
        StateSubmission {
            portlet_id: "p".into(),
            delta: StateDelta {
                public_parameters: vec![ParameterChange::set("pub", vec![Some("x".into())])],
                ..Default::default()
            },
            state,
        }
    }

    #[tokio::test]
    async fn test_echoes_submitted_state() {
        let transport = SimulatedTransport::new();
        let update = transport.submit_state(submission()).await.unwrap();
        assert_eq!(update.state.parameters().get_value("pub"), Some(Some("x")));
        assert_eq!(update.public_parameters.len(), 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_simulated_comm_error() {
        let transport = SimulatedTransport::new();
        transport.set_simulate_comm_error(true);
        let err = transport.submit_state(submission()).await.unwrap_err();
        assert_eq!(err, TransportError::CommunicationError(SIMULATED_COMM_ERROR.into()));
        assert_eq!(transport.calls(), 1);

        transport.set_simulate_comm_error(false);
        assert!(transport.submit_state(submission()).await.is_ok());
    }

    #[tokio::test]
    async fn test_action_copies_parameters() {
        let transport = SimulatedTransport::new();
        let update = transport
            .execute_action(ActionSubmission {
                portlet_id: "p".into(),
                action_parameters: Parameters::from_entries([("priv", "1"), ("pub", "2")]),
                state: RenderState::default(),
                public_parameters: vec!["pub".into()],
            })
            .await
            .unwrap();
        assert_eq!(update.state.parameters().get_value("priv"), Some(Some("1")));
        assert_eq!(
            update.public_parameters,
            vec![ParameterChange::set("pub", vec![Some("2".into())])]
        );
    }

    #[tokio::test]
    async fn test_latency_keeps_call_pending() {
        let transport = SimulatedTransport::new();
        transport.set_latency(Some(Duration::from_millis(20)));
        let started = tokio::time::Instant::now();
        transport.submit_state(submission()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
