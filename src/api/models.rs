//! Wire types for the control-plane API
//!
//! Field names follow the server's camelCase JSON. Unknown fields are ignored
//! so newer servers can add keys without breaking the console.

use serde::{Deserialize, Serialize};

/// One peer credential record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub enabled: bool,
}

/// `GET /api/nodes`
///
/// The server encodes an empty listing as `{"nodes": null}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<Node>,
}

/// `GET /api/nodes/{id}/uri`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeUri {
    pub uri: String,
}

/// `POST /api/nodes` reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedNode {
    #[serde(default)]
    pub id: String,
}

/// `GET /api/subscription`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    pub url: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// `POST /api/subscription/rotate` reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RotatedSubscription {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub url: String,
}

/// Relay settings, saved as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub sni: String,
    #[serde(default)]
    pub masquerade_url: String,
    #[serde(default)]
    pub masquerade_rewrite: bool,
    pub listen_port: u16,
}

/// `GET /api/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub hysteria_status: String,
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub recent_errors: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Node>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_node_listing_is_empty() {
        let list: NodeList = serde_json::from_str(r#"{"nodes":null}"#).unwrap();
        assert!(list.nodes.is_empty());
    }

    #[test]
    fn test_settings_ignores_extra_fields() {
        let json = r#"{"listenPort":443,"sni":"www.bing.com","masqueradeUrl":"https://www.bing.com","masqueradeRewrite":true,"manageListen":"0.0.0.0:3333"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.listen_port, 443);
        assert!(settings.masquerade_rewrite);
    }

    #[test]
    fn test_settings_serializes_exactly_four_keys() {
        let settings = Settings {
            sni: "x".to_string(),
            masquerade_url: "y".to_string(),
            masquerade_rewrite: true,
            listen_port: 443,
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sni": "x",
                "masqueradeUrl": "y",
                "masqueradeRewrite": true,
                "listenPort": 443
            })
        );
    }

    #[test]
    fn test_dashboard_decodes_server_shape() {
        let json = r#"{"hysteriaStatus":"active","listen":":443","port":443,"pin":"AB:CD","recentErrors":""}"#;
        let dashboard: Dashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.hysteria_status, "active");
        assert_eq!(dashboard.listen, ":443");
        assert!(dashboard.recent_errors.is_empty());
    }
}
