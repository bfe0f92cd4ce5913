//! Error types for the portlet hub.
//!
//! Only the asynchronous boundary (registration, state submission, actions)
//! and the listener/config surfaces produce errors. The parameter and state
//! containers are total and never fail.

use thiserror::Error;

use crate::events::ListenerHandle;

/// Errors reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The round trip could not be completed.
    #[error("Communication error: {0}")]
    CommunicationError(String),

    /// The server refused the submission.
    #[error("Submission rejected: {0}")]
    Rejected(String),
}

/// Errors surfaced to callers of the hub.
#[derive(Debug, Error)]
pub enum HubError {
    /// The page bootstrap never declared this portlet.
    #[error("Unknown portlet: {portlet_id}")]
    UnknownComponent { portlet_id: String },

    /// The transport failed; nothing was applied and no listener fired.
    #[error("Communication failure for portlet {portlet_id}: {source}")]
    CommunicationFailure {
        portlet_id: String,
        #[source]
        source: TransportError,
    },

    /// A non-null listener handle that is not (or no longer) registered.
    #[error("Unknown listener handle: {handle:?}")]
    UnknownListener { handle: ListenerHandle },

    /// The event type is empty or a reserved `portlet.` type the hub does
    /// not support for this operation.
    #[error("Invalid event type: '{event_type}'")]
    InvalidEventType { event_type: String },

    /// The task running a round trip panicked or was cancelled by runtime
    /// shutdown.
    #[error("Submission task failed: {0}")]
    Task(String),

    /// The page bootstrap is malformed.
    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HubError {
    /// Whether this error came from a failed round trip.
    pub fn is_communication_failure(&self) -> bool {
        matches!(self, HubError::CommunicationFailure { .. })
    }
}

/// Result alias used throughout the crate.
pub type HubResult<T> = Result<T, HubError>;
