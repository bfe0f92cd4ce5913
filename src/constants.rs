//! Constants registry exposed to every registered portlet.
//!
//! The registry is a fixed set of string tokens for portlet modes, window
//! states, and resource URL cacheability levels. It is a `const` value: it
//! exists before any hub is constructed and can never be mutated.

use serde::Serialize;

/// Portlet mode `VIEW`.
pub const VIEW: &str = "VIEW";
/// Portlet mode `EDIT`.
pub const EDIT: &str = "EDIT";
/// Portlet mode `HELP`.
pub const HELP: &str = "HELP";

/// Window state `NORMAL`.
pub const NORMAL: &str = "NORMAL";
/// Window state `MINIMIZED`.
pub const MINIMIZED: &str = "MINIMIZED";
/// Window state `MAXIMIZED`.
pub const MAXIMIZED: &str = "MAXIMIZED";

/// Resource URL cacheability: full.
pub const FULL: &str = "cacheLevelFull";
/// Resource URL cacheability: portlet.
pub const PORTLET: &str = "cacheLevelPortlet";
/// Resource URL cacheability: page.
pub const PAGE: &str = "cacheLevelPage";

/// The constants object handed out by [`PortletInit::constants`](crate::hub::PortletInit::constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Constants {
    pub view: &'static str,
    pub edit: &'static str,
    pub help: &'static str,
    pub normal: &'static str,
    pub minimized: &'static str,
    pub maximized: &'static str,
    pub full: &'static str,
    pub portlet: &'static str,
    pub page: &'static str,
}

/// The process-wide registry.
pub const CONSTANTS: Constants = Constants {
    view: VIEW,
    edit: EDIT,
    help: HELP,
    normal: NORMAL,
    minimized: MINIMIZED,
    maximized: MAXIMIZED,
    full: FULL,
    portlet: PORTLET,
    page: PAGE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portlet_modes_equal_their_names() {
        assert_eq!(CONSTANTS.view, "VIEW");
        assert_eq!(CONSTANTS.edit, "EDIT");
        assert_eq!(CONSTANTS.help, "HELP");
    }

    #[test]
    fn test_window_states_equal_their_names() {
        assert_eq!(CONSTANTS.normal, "NORMAL");
        assert_eq!(CONSTANTS.minimized, "MINIMIZED");
        assert_eq!(CONSTANTS.maximized, "MAXIMIZED");
    }

    #[test]
    fn test_cache_levels() {
        assert_eq!(CONSTANTS.full, "cacheLevelFull");
        assert_eq!(CONSTANTS.portlet, "cacheLevelPortlet");
        assert_eq!(CONSTANTS.page, "cacheLevelPage");
    }
}
