//! # Portlet Hub
//!
//! Client-side runtime that tracks the render state (portlet mode, window
//! state, render parameters) of every portlet on a page, mediates state
//! changes between them, and notifies listeners when a portlet's state
//! changes, whether the change came from the portlet itself or from another
//! portlet sharing the same public parameters.
//!
//! ```ignore
//! let hub = PortletHub::new(page, Arc::new(SimulatedTransport::new()))?;
//! let init = hub.register("portletA").await?;
//! let handle = init.add_event_listener("portlet.onStateChange", |event| { /* ... */ })?;
//!
//! let mut state = init.new_state(Some(&init.render_state()));
//! state.p_mut().set_value("parm1", ["fred"]);
//! init.set_render_state(&state).await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod hub;
pub mod parameters;
pub mod state;
pub mod transport;

pub use bootstrap::{PageBootstrap, PortletDescriptor};
pub use config::HubConfig;
pub use constants::{Constants, CONSTANTS};
pub use error::{HubError, HubResult, TransportError};
pub use events::{
    ChangeReason, ClientEvent, ListenerHandle, PortletEvent, StateChangeEvent, ON_STATE_CHANGE,
};
pub use hub::{PortletHub, PortletInit, SubmitOutcome};
pub use parameters::{ParameterValue, Parameters, Values};
pub use state::RenderState;
pub use transport::{SimulatedTransport, Transport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
