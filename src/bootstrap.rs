//! Page bootstrap data: the portlets on the page, how each one partitions
//! its parameter names, and the state each one starts in.
//!
//! The hub only reads this data. It is normally produced by the page
//! rendering pipeline and handed over as YAML or JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};
use crate::state::RenderState;

/// One portlet as declared by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortletDescriptor {
    pub id: String,

    /// Parameter names visible only to this portlet.
    #[serde(default)]
    pub private_parameters: Vec<String>,

    /// Parameter names shared with every other portlet that declares the
    /// same name public.
    #[serde(default)]
    pub public_parameters: Vec<String>,

    /// Initial authoritative state.
    #[serde(default)]
    pub state: RenderState,
}

impl PortletDescriptor {
    /// A portlet with no declared parameters and a default state.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            private_parameters: Vec::new(),
            public_parameters: Vec::new(),
            state: RenderState::default(),
        }
    }

    /// Declare private parameter names.
    pub fn with_private<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.private_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declare public parameter names.
    pub fn with_public<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initial render state.
    pub fn with_state(mut self, state: RenderState) -> Self {
        self.state = state;
        self
    }

    /// Whether `name` is declared public for this portlet.
    pub fn is_public(&self, name: &str) -> bool {
        self.public_parameters.iter().any(|p| p == name)
    }
}

/// All portlets on the page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBootstrap {
    #[serde(default)]
    pub portlets: Vec<PortletDescriptor>,
}

impl PageBootstrap {
    pub fn new(portlets: Vec<PortletDescriptor>) -> Self {
        Self { portlets }
    }

    /// Parse and validate a YAML page description.
    pub fn from_yaml_str(yaml: &str) -> HubResult<Self> {
        let page: Self = serde_yaml::from_str(yaml)?;
        page.validate()?;
        Ok(page)
    }

    /// Parse and validate a JSON page description.
    pub fn from_json_str(json: &str) -> HubResult<Self> {
        let page: Self = serde_json::from_str(json)?;
        page.validate()?;
        Ok(page)
    }

    /// Load a page description; `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> HubResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("[PortletHub] Loading page bootstrap from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Check ids are non-empty and unique, and that no portlet declares a
    /// name both private and public.
    pub fn validate(&self) -> HubResult<()> {
        let mut seen = HashSet::new();
        for portlet in &self.portlets {
            if portlet.id.is_empty() {
                return Err(HubError::Bootstrap("portlet id must not be empty".into()));
            }
            if !seen.insert(portlet.id.as_str()) {
                return Err(HubError::Bootstrap(format!(
                    "duplicate portlet id '{}'",
                    portlet.id
                )));
            }
            if let Some(name) = portlet
                .private_parameters
                .iter()
                .find(|name| portlet.is_public(name))
            {
                return Err(HubError::Bootstrap(format!(
                    "parameter '{}' of portlet '{}' is declared both private and public",
                    name, portlet.id
                )));
            }
        }
        Ok(())
    }

    /// Look a portlet up by id.
    pub fn get(&self, portlet_id: &str) -> Option<&PortletDescriptor> {
        self.portlets.iter().find(|p| p.id == portlet_id)
    }

    /// Portlet ids in page order.
    pub fn portlet_ids(&self) -> Vec<String> {
        self.portlets.iter().map(|p| p.id.clone()).collect()
    }

    /// Six-portlet page used throughout the hub tests.
    ///
    /// ```text
    ///              private            public
    ///   portletA   parm1, parm2       -
    ///   portletB   parm1, parm2       pubparm1
    ///   portletC   parm1, parm2       pubparm1, pubparm2
    ///   portletD   parm2, pubparm1    pubparm2
    ///   portletE   parm1, parm2       pubparm1, pubparm2
    ///   portletF   -                  -
    /// ```
    #[cfg(test)]
    pub(crate) fn test_page() -> Self {
        let initial = || RenderState::new("VIEW", "NORMAL", Default::default());
        Self::new(vec![
            PortletDescriptor::new("portletA")
                .with_private(["parm1", "parm2"])
                .with_state(initial()),
            PortletDescriptor::new("portletB")
                .with_private(["parm1", "parm2"])
                .with_public(["pubparm1"])
                .with_state(initial()),
            PortletDescriptor::new("portletC")
                .with_private(["parm1", "parm2"])
                .with_public(["pubparm1", "pubparm2"])
                .with_state(initial()),
            PortletDescriptor::new("portletD")
                .with_private(["parm2", "pubparm1"])
                .with_public(["pubparm2"])
                .with_state(initial()),
            PortletDescriptor::new("portletE")
                .with_private(["parm1", "parm2"])
                .with_public(["pubparm1", "pubparm2"])
                .with_state(initial()),
            PortletDescriptor::new("portletF").with_state(initial()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAGE_YAML: &str = r#"
portlets:
  - id: portletA
    private_parameters: [parm1, parm2]
    state:
      portletMode: VIEW
      windowState: NORMAL
      parameters:
        parm1: [fred]
  - id: portletB
    private_parameters: [parm1]
    public_parameters: [pubparm1]
"#;

    #[test]
    fn test_from_yaml() {
        let page = PageBootstrap::from_yaml_str(PAGE_YAML).unwrap();
        assert_eq!(page.portlet_ids(), vec!["portletA", "portletB"]);

        let a = page.get("portletA").unwrap();
        assert_eq!(a.state.portlet_mode(), "VIEW");
        assert_eq!(a.state.parameters().get_value("parm1"), Some(Some("fred")));

        let b = page.get("portletB").unwrap();
        assert!(b.is_public("pubparm1"));
        assert!(!b.is_public("parm1"));
        assert!(b.state.parameters().is_empty());
    }

    #[test]
    fn test_from_json() {
        let page = PageBootstrap::from_json_str(
            r#"{"portlets": [{"id": "p1", "public_parameters": ["shared"]}]}"#,
        )
        .unwrap();
        assert!(page.get("p1").unwrap().is_public("shared"));
        assert!(page.get("p2").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let page = PageBootstrap::new(vec![
            PortletDescriptor::new("dup"),
            PortletDescriptor::new("dup"),
        ]);
        assert!(matches!(page.validate(), Err(HubError::Bootstrap(_))));
    }

    #[test]
    fn test_overlapping_partitions_rejected() {
        let page = PageBootstrap::new(vec![PortletDescriptor::new("p")
            .with_private(["x"])
            .with_public(["x"])]);
        let err = page.validate().unwrap_err();
        assert!(err.to_string().contains("both private and public"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = PageBootstrap::from_json_str(r#"{"portlets": [{"id": ""}]}"#).unwrap_err();
        assert!(matches!(err, HubError::Bootstrap(_)));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{}", PAGE_YAML).unwrap();
        let page = PageBootstrap::from_file(file.path()).unwrap();
        assert_eq!(page.portlets.len(), 2);

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"portlets": [{{"id": "only"}}]}}"#).unwrap();
        let page = PageBootstrap::from_file(file.path()).unwrap();
        assert_eq!(page.portlet_ids(), vec!["only"]);
    }

    #[test]
    fn test_fixture_page_is_valid() {
        let page = PageBootstrap::test_page();
        page.validate().unwrap();
        assert_eq!(page.portlets.len(), 6);
        assert!(!page.get("portletD").unwrap().is_public("pubparm1"));
    }
}
