//! Render state: portlet mode, window state, and render parameters.

use serde::{Deserialize, Serialize};

use crate::parameters::Parameters;

/// A portlet's render state.
///
/// Values handed out by [`PortletInit::new_state`](crate::hub::PortletInit::new_state)
/// are detached copies: mutating them never touches the hub's authoritative
/// record until the state is submitted with
/// [`PortletInit::set_render_state`](crate::hub::PortletInit::set_render_state).
///
/// The mode and window state setters store any string verbatim. Checking them
/// against [`CONSTANTS`](crate::constants::CONSTANTS) is left to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    #[serde(default)]
    pub portlet_mode: String,
    #[serde(default)]
    pub window_state: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl RenderState {
    /// Build a state from its three parts.
    pub fn new(
        portlet_mode: impl Into<String>,
        window_state: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        Self {
            portlet_mode: portlet_mode.into(),
            window_state: window_state.into(),
            parameters,
        }
    }

    /// Current portlet mode.
    pub fn portlet_mode(&self) -> &str {
        &self.portlet_mode
    }

    /// Replace the portlet mode. Any string is accepted.
    pub fn set_portlet_mode(&mut self, mode: impl Into<String>) {
        self.portlet_mode = mode.into();
    }

    /// Current window state.
    pub fn window_state(&self) -> &str {
        &self.window_state
    }

    /// Replace the window state. Any string is accepted.
    pub fn set_window_state(&mut self, state: impl Into<String>) {
        self.window_state = state.into();
    }

    /// The render parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Mutable access to the render parameters.
    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Shorthand for [`parameters`](Self::parameters). Both accessors borrow
    /// the same container.
    pub fn p(&self) -> &Parameters {
        &self.parameters
    }

    /// Shorthand for [`parameters_mut`](Self::parameters_mut).
    pub fn p_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_has_no_parameters() {
        let s = RenderState::default();
        assert!(s.parameters().is_empty());
        assert_eq!(s.portlet_mode(), "");
        assert_eq!(s.window_state(), "");
    }

    #[test]
    fn test_p_and_parameters_are_the_same_container() {
        let mut s = RenderState::default();
        s.p_mut().set_value("parm1", ["fred"]);
        s.parameters_mut().set_value("parm2", ["barney"]);
        assert!(std::ptr::eq(s.p(), s.parameters()));
        assert_eq!(s.parameters().get_value("parm1"), Some(Some("fred")));
        assert_eq!(s.p().get_value("parm2"), Some(Some("barney")));
        assert_eq!(s.p().len(), 2);
    }

    #[test]
    fn test_mode_and_window_state_accessors() {
        let mut s = RenderState::default();
        s.set_portlet_mode("EDIT");
        s.set_window_state("MAXIMIZED");
        assert_eq!(s.portlet_mode(), "EDIT");
        assert_eq!(s.portlet_mode, "EDIT");
        assert_eq!(s.window_state(), "MAXIMIZED");
        assert_eq!(s.window_state, "MAXIMIZED");
    }

    #[test]
    fn test_any_mode_is_accepted_verbatim() {
        let mut s = RenderState::default();
        s.set_portlet_mode("custom-mode");
        assert_eq!(s.portlet_mode(), "custom-mode");
    }

    #[test]
    fn test_deserialize_from_plain_object() {
        let s: RenderState = serde_json::from_value(serde_json::json!({
            "parameters": {"parm1": ["fred"], "parm2": ["barney"]},
            "portletMode": "EDIT",
            "windowState": "MINIMIZED"
        }))
        .unwrap();
        assert_eq!(s.parameters().len(), 2);
        assert_eq!(s.portlet_mode(), "EDIT");
        assert_eq!(s.window_state(), "MINIMIZED");
    }
}
