//! Node management view: node table plus subscription controls

use crate::api::models::{Node, NodeList, Subscription};
use crate::api::{endpoints, ApiClient, ApiError};

pub const ENABLED_GLYPH: &str = "✅";
pub const DISABLED_GLYPH: &str = "⛔";

/// Stands in for the live token in the listener's subscription info
const TOKEN_PLACEHOLDER: &str = "<token>";

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: String,
    pub name: String,
    pub username: String,
    pub enabled: bool,
}

impl NodeRow {
    pub fn glyph(&self) -> &'static str {
        if self.enabled {
            ENABLED_GLYPH
        } else {
            DISABLED_GLYPH
        }
    }

    /// Label of the toggle operation for the displayed state
    pub fn toggle_label(&self) -> &'static str {
        if self.enabled {
            "Disable"
        } else {
            "Enable"
        }
    }

    pub fn detail(&self) -> String {
        format!("ID: {}  User: {}", self.id, self.username)
    }
}

impl From<Node> for NodeRow {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            name: node.name,
            username: node.username,
            enabled: node.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodesView {
    pub rows: Vec<NodeRow>,
    /// Absolute subscription URL, as last reported by the server
    pub subscription_url: String,
    pub subscription_note: Option<String>,
    /// Highlighted row
    pub selected: usize,
}

impl NodesView {
    pub fn selected_row(&self) -> Option<&NodeRow> {
        self.rows.get(self.selected)
    }

    pub fn row(&self, id: &str) -> Option<&NodeRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// The listener never reveals the live token; only a URL from a rotation
    /// in this session is usable
    pub fn subscription_is_placeholder(&self) -> bool {
        self.subscription_url.contains(TOKEN_PLACEHOLDER)
    }

    pub fn copyable_subscription_url(&self) -> Option<&str> {
        (!self.subscription_is_placeholder()).then_some(self.subscription_url.as_str())
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }
}

/// Listing first, then subscription state
pub async fn load(client: &ApiClient) -> Result<NodesView, ApiError> {
    let listing: NodeList = client.call_json(endpoints::nodes()).await?;
    let subscription: Subscription = client.call_json(endpoints::subscription()).await?;

    Ok(NodesView {
        rows: listing.nodes.into_iter().map(NodeRow::from).collect(),
        subscription_url: client.absolute_url(&subscription.url),
        subscription_note: subscription.note.filter(|n| !n.is_empty()),
        selected: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_rows_and_glyphs() {
        let mock = MockTransport::new();
        mock.respond_json(
            "GET /api/nodes",
            json!({"nodes": [
                {"id": "a", "name": "phone", "username": "u-a", "enabled": true},
                {"id": "b", "name": "laptop", "username": "u-b", "enabled": false}
            ]}),
        );
        mock.respond_json("GET /api/subscription", json!({"url": "/sub/<token>"}));

        let view = load(&mock.client()).await.unwrap();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].glyph(), ENABLED_GLYPH);
        assert_eq!(view.rows[1].glyph(), DISABLED_GLYPH);
        assert_eq!(view.rows[0].toggle_label(), "Disable");
        assert_eq!(view.rows[1].toggle_label(), "Enable");
        assert_eq!(view.subscription_url, "http://relay.test/sub/<token>");
        assert!(view.subscription_is_placeholder());
        assert_eq!(view.copyable_subscription_url(), None);
        assert_eq!(mock.calls(), vec!["GET /api/nodes", "GET /api/subscription"]);
    }

    #[tokio::test]
    async fn test_listing_failure_skips_subscription() {
        let mock = MockTransport::new();
        mock.respond_status("GET /api/nodes", 401);
        assert_eq!(
            load(&mock.client()).await,
            Err(ApiError::AuthenticationRequired)
        );
        assert_eq!(mock.count("GET /api/subscription"), 0);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut view = NodesView {
            rows: vec![
                NodeRow {
                    id: "a".into(),
                    name: "a".into(),
                    username: "u".into(),
                    enabled: true,
                },
                NodeRow {
                    id: "b".into(),
                    name: "b".into(),
                    username: "u".into(),
                    enabled: true,
                },
            ],
            subscription_url: String::new(),
            subscription_note: None,
            selected: 0,
        };
        view.select_previous();
        assert_eq!(view.selected, 0);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected, 1);
        assert_eq!(view.selected_row().map(|r| r.id.as_str()), Some("b"));
    }
}
