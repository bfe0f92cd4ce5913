//! Hub configuration.
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HubResult;

/// Tunables for a [`PortletHub`](crate::hub::PortletHub).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Portlet mode given to `new_state()` when no seed is supplied.
    #[serde(default)]
    pub default_portlet_mode: String,

    /// Window state given to `new_state()` when no seed is supplied.
    #[serde(default)]
    pub default_window_state: String,

    /// Deliver the current state to a newly added `portlet.onStateChange`
    /// listener.
    #[serde(default = "default_emit_initial_state")]
    pub emit_initial_state: bool,
}

fn default_emit_initial_state() -> bool {
    true
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            default_portlet_mode: String::new(),
            default_window_state: String::new(),
            emit_initial_state: default_emit_initial_state(),
        }
    }
}

impl HubConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml_str(yaml: &str) -> HubResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> HubResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("[PortletHub] Loading hub config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Builder-style setter for the unseeded `new_state()` defaults.
    pub fn with_default_state(
        mut self,
        portlet_mode: impl Into<String>,
        window_state: impl Into<String>,
    ) -> Self {
        self.default_portlet_mode = portlet_mode.into();
        self.default_window_state = window_state.into();
        self
    }

    /// Builder-style setter for the initial-notification switch.
    pub fn with_emit_initial_state(mut self, emit: bool) -> Self {
        self.emit_initial_state = emit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HubError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.default_portlet_mode, "");
        assert_eq!(config.default_window_state, "");
        assert!(config.emit_initial_state);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(HubConfig::from_yaml_str("").unwrap(), HubConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = HubConfig::from_yaml_str("default_portlet_mode: VIEW\n").unwrap();
        assert_eq!(config.default_portlet_mode, "VIEW");
        assert_eq!(config.default_window_state, "");
        assert!(config.emit_initial_state);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = HubConfig::from_yaml_str("emit_initial_state: [1, 2").unwrap_err();
        assert!(matches!(err, HubError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_portlet_mode: VIEW\ndefault_window_state: NORMAL\nemit_initial_state: false"
        )
        .unwrap();
        let config = HubConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config,
            HubConfig::default()
                .with_default_state("VIEW", "NORMAL")
                .with_emit_initial_state(false)
        );
    }

    #[test]
    fn test_missing_file() {
        let err = HubConfig::from_file("/nonexistent/hub.yaml").unwrap_err();
        assert!(matches!(err, HubError::Io(_)));
    }
}
