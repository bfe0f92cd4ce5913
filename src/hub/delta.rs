//! Difference between a portlet's authoritative state and a submitted one.

use serde::{Deserialize, Serialize};

use crate::parameters::{Parameters, Values};
use crate::state::RenderState;

/// A single parameter change. `values: None` means the parameter was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub name: String,
    pub values: Option<Values>,
}

impl ParameterChange {
    /// A change binding `name` to `values`.
    pub fn set(name: impl Into<String>, values: Values) -> Self {
        Self {
            name: name.into(),
            values: Some(values),
        }
    }

    /// A change deleting `name`.
    pub fn removed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: None,
        }
    }

    /// Apply this change to `params`. Returns whether anything changed.
    pub fn apply_to(&self, params: &mut Parameters) -> bool {
        match &self.values {
            Some(values) => {
                if params.get_values(&self.name) == Some(values.as_slice()) {
                    return false;
                }
                params.set_value(self.name.as_str(), values.clone());
                true
            }
            None => params.remove(&self.name).is_some(),
        }
    }
}

/// Changes a submission makes, with parameters split by namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portlet_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_state: Option<String>,
    #[serde(default)]
    pub private_parameters: Vec<ParameterChange>,
    #[serde(default)]
    pub public_parameters: Vec<ParameterChange>,
}

impl StateDelta {
    /// Compute the delta from `previous` to `submitted`. Names for which
    /// `is_public` returns true go to the public partition, everything else
    /// to the private one.
    pub fn between(
        previous: &RenderState,
        submitted: &RenderState,
        is_public: impl Fn(&str) -> bool,
    ) -> Self {
        let mut delta = StateDelta::default();

        if previous.portlet_mode() != submitted.portlet_mode() {
            delta.portlet_mode = Some(submitted.portlet_mode().to_string());
        }
        if previous.window_state() != submitted.window_state() {
            delta.window_state = Some(submitted.window_state().to_string());
        }

        let before = previous.parameters();
        let after = submitted.parameters();
        for name in after.changed_names(before) {
            let change = match after.get_values(&name) {
                Some(values) => ParameterChange::set(name.as_str(), values.to_vec()),
                None => ParameterChange::removed(name.as_str()),
            };
            if is_public(&name) {
                delta.public_parameters.push(change);
            } else {
                delta.private_parameters.push(change);
            }
        }

        delta
    }

    /// Whether the submission would change nothing.
    pub fn is_empty(&self) -> bool {
        self.portlet_mode.is_none()
            && self.window_state.is_none()
            && self.private_parameters.is_empty()
            && self.public_parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(params: &[(&str, &str)]) -> RenderState {
        RenderState::new(
            "VIEW",
            "NORMAL",
            Parameters::from_entries(params.iter().copied()),
        )
    }

    #[test]
    fn test_identical_states_have_empty_delta() {
        let s = state(&[("parm1", "a")]);
        let delta = StateDelta::between(&s, &s.clone(), |_| false);
        assert!(delta.is_empty());
    }

    #[test]
    fn test_partitions_by_namespace() {
        let before = state(&[("parm1", "a"), ("pubparm1", "x")]);
        let after = state(&[("parm1", "b"), ("pubparm1", "y")]);
        let delta = StateDelta::between(&before, &after, |n| n == "pubparm1");

        assert_eq!(
            delta.private_parameters,
            vec![ParameterChange::set("parm1", vec![Some("b".into())])]
        );
        assert_eq!(
            delta.public_parameters,
            vec![ParameterChange::set("pubparm1", vec![Some("y".into())])]
        );
    }

    #[test]
    fn test_removed_parameter() {
        let before = state(&[("parm1", "a"), ("pubparm1", "x")]);
        let after = state(&[("parm1", "a")]);
        let delta = StateDelta::between(&before, &after, |n| n.starts_with("pub"));
        assert!(delta.private_parameters.is_empty());
        assert_eq!(delta.public_parameters, vec![ParameterChange::removed("pubparm1")]);
    }

    #[test]
    fn test_mode_and_window_state() {
        let before = state(&[]);
        let mut after = before.clone();
        after.set_portlet_mode("EDIT");
        after.set_window_state("MAXIMIZED");
        let delta = StateDelta::between(&before, &after, |_| false);
        assert_eq!(delta.portlet_mode.as_deref(), Some("EDIT"));
        assert_eq!(delta.window_state.as_deref(), Some("MAXIMIZED"));
        assert!(!delta.is_empty());
    }

    #[test]
    fn test_apply_change() {
        let mut params = Parameters::from_entries([("a", "1")]);
        assert!(ParameterChange::set("a", vec![Some("2".into())]).apply_to(&mut params));
        assert!(!ParameterChange::set("a", vec![Some("2".into())]).apply_to(&mut params));
        assert!(ParameterChange::removed("a").apply_to(&mut params));
        assert!(!ParameterChange::removed("a").apply_to(&mut params));
        assert!(params.is_empty());
    }
}
