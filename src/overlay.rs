//! Code overlay
//!
//! One overlay per session, owned by the console. Opening is two steps: the
//! console marks the overlay as requested for a node and fetches the URI,
//! then [`CodeOverlay::show`] fills it in. A fetch that completes after the
//! overlay was closed or re-targeted is ignored.

use crate::api::endpoints::{self, CodeFormat};
use crate::api::ApiClient;

/// What the overlay displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub node_id: String,
    pub uri: String,
    pub png_url: String,
    pub svg_url: String,
}

impl OverlayContent {
    pub fn new(client: &ApiClient, node_id: &str, uri: String) -> Self {
        Self {
            node_id: node_id.to_string(),
            uri,
            png_url: client.absolute_url(&endpoints::node_code_path(node_id, CodeFormat::Png)),
            svg_url: client.absolute_url(&endpoints::node_code_path(node_id, CodeFormat::Svg)),
        }
    }

    pub fn image_url(&self, format: CodeFormat) -> &str {
        match format {
            CodeFormat::Png => &self.png_url,
            CodeFormat::Svg => &self.svg_url,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeOverlay {
    visible: bool,
    requested: Option<String>,
    content: Option<OverlayContent>,
}

impl CodeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&OverlayContent> {
        self.content.as_ref()
    }

    /// Node whose URI is being fetched, if any
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    /// Start opening for a node; replaces any earlier request
    pub fn open(&mut self, node_id: &str) {
        self.requested = Some(node_id.to_string());
    }

    /// Fill in fetched content
    ///
    /// Returns false (and changes nothing) when the content is for a node
    /// that is no longer the one requested.
    pub fn show(&mut self, content: OverlayContent) -> bool {
        if self.requested.as_deref() != Some(content.node_id.as_str()) {
            tracing::debug!("Dropping overlay content for {}", content.node_id);
            return false;
        }
        self.content = Some(content);
        self.visible = true;
        true
    }

    /// Hide; the node listing underneath is untouched
    pub fn close(&mut self) {
        self.visible = false;
        self.requested = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;

    fn content(id: &str) -> OverlayContent {
        OverlayContent::new(&MockTransport::new().client(), id, format!("hysteria2://{}", id))
    }

    #[test]
    fn test_open_then_show() {
        let mut overlay = CodeOverlay::new();
        overlay.open("a");
        assert!(!overlay.is_visible());
        assert!(overlay.show(content("a")));
        assert!(overlay.is_visible());
        let shown = overlay.content().unwrap();
        assert_eq!(shown.png_url, "http://relay.test/api/nodes/a/qrcode.png");
        assert_eq!(shown.svg_url, "http://relay.test/api/nodes/a/qrcode.svg");
    }

    #[test]
    fn test_second_open_overwrites_in_place() {
        let mut overlay = CodeOverlay::new();
        overlay.open("a");
        overlay.show(content("a"));
        overlay.open("b");
        assert!(overlay.show(content("b")));
        assert!(overlay.is_visible());
        assert_eq!(overlay.content().unwrap().node_id, "b");
    }

    #[test]
    fn test_late_content_after_close_is_ignored() {
        let mut overlay = CodeOverlay::new();
        overlay.open("a");
        overlay.close();
        assert!(!overlay.show(content("a")));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_superseded_request_is_ignored() {
        let mut overlay = CodeOverlay::new();
        overlay.open("a");
        overlay.open("b");
        assert!(!overlay.show(content("a")));
        assert!(overlay.content().is_none());
    }
}
