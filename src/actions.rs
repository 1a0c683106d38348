//! Operator actions
//!
//! Every remote operation the operator can trigger is an [`Action`]. Running
//! one is always the same sequence:
//!
//! 1. gate: destructive actions carry a confirmation prompt and wait for
//!    consent ([`Gate::AwaitingConsent`]); declining issues no call
//! 2. validate: malformed input is rejected before anything is sent
//! 3. execute: the remote call(s), returning an explicit [`ActionOutcome`]
//!
//! Mutations never patch local state. An outcome with `reload` set makes the
//! console re-enter the current route so the view is rebuilt from the server.

use crate::api::endpoints::{self, CodeFormat};
use crate::api::models::{CreatedNode, NodeUri, RotatedSubscription, Settings};
use crate::api::{ApiClient, ApiError};
use crate::overlay::OverlayContent;
use crate::views::SettingsForm;
use std::fmt;
use std::path::PathBuf;

/// Server-side minimum for the admin password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Suggested name in the add-node prompt
pub const DEFAULT_NODE_NAME: &str = "my-phone";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch a node's URI for the clipboard
    CopyUri { id: String },
    /// Fetch a node's URI for the code overlay
    OpenCode { id: String },
    /// Flip a node; `enabled` is the state currently displayed
    ToggleNode { id: String, enabled: bool },
    ResetNode { id: String },
    DeleteNode { id: String },
    AddNode { name: String },
    RotateSubscription,
    /// Save the whole settings form as one unit
    SaveSettings(SettingsForm),
    RotateCert,
    ChangePassword { password: String },
    /// Save one of a node's code images to the download directory
    DownloadCode { id: String, format: CodeFormat },
}

impl Action {
    /// Confirmation prompt for destructive actions
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            Action::ResetNode { .. } => Some("Reset password? The old one will stop working."),
            Action::DeleteNode { .. } => Some("Delete node?"),
            Action::RotateSubscription => {
                Some("Rotate token? Old subscription URL will stop working.")
            }
            Action::RotateCert => Some("Rotate self-signed cert? Clients should update pinSHA256."),
            _ => None,
        }
    }

    /// An action the operator backed out of while entering it
    ///
    /// An empty password prompt is a cancel, not an error.
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::ChangePassword { password } if password.is_empty())
    }

    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::CopyUri { .. } => "copy-uri",
            Action::OpenCode { .. } => "open-code",
            Action::ToggleNode { .. } => "toggle-node",
            Action::ResetNode { .. } => "reset-node",
            Action::DeleteNode { .. } => "delete-node",
            Action::AddNode { .. } => "add-node",
            Action::RotateSubscription => "rotate-subscription",
            Action::SaveSettings(_) => "save-settings",
            Action::RotateCert => "rotate-cert",
            Action::ChangePassword { .. } => "change-password",
            Action::DownloadCode { .. } => "download-code",
        }
    }

    /// Node the action addresses, if any
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Action::CopyUri { id }
            | Action::OpenCode { id }
            | Action::ToggleNode { id, .. }
            | Action::ResetNode { id }
            | Action::DeleteNode { id }
            | Action::DownloadCode { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Check operator input; returns the action ready to execute
    pub fn validate(self) -> Result<Validated, ActionError> {
        if let Some(id) = self.node_id() {
            if !endpoints::is_addressable_node_id(id) {
                return Err(ActionError::Validation(format!(
                    "Node id {:?} cannot be addressed",
                    id
                )));
            }
        }
        let action = match self {
            Action::AddNode { name } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(ActionError::Validation("Node name is required".into()));
                }
                Validated::AddNode { name }
            }
            Action::SaveSettings(form) => {
                Validated::SaveSettings(form.to_settings().map_err(ActionError::Validation)?)
            }
            Action::ChangePassword { password } => {
                if password.chars().count() < MIN_PASSWORD_LEN {
                    return Err(ActionError::Validation(format!(
                        "Password must be at least {} characters",
                        MIN_PASSWORD_LEN
                    )));
                }
                Validated::ChangePassword { password }
            }
            other => Validated::Plain(other),
        };
        Ok(action)
    }
}

/// An action whose input passed local validation
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    AddNode { name: String },
    SaveSettings(Settings),
    ChangePassword { password: String },
    /// Actions without operator input
    Plain(Action),
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirmation gate
// ─────────────────────────────────────────────────────────────────────────────

/// A destructive action waiting for the operator's answer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub prompt: &'static str,
    pub action: Action,
}

/// Result of submitting an action to the console
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Validated and handed to a background task
    Dispatched,
    /// Parked until the operator consents or declines
    AwaitingConsent(&'static str),
    /// Dropped before any call (cancelled prompt)
    Ignored,
    /// Rejected by local validation
    Rejected(ActionError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Outcome & errors
// ─────────────────────────────────────────────────────────────────────────────

/// Explicit success result of an action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOutcome {
    /// Message for the operator
    pub message: Option<String>,
    /// Re-enter the current route
    pub reload: bool,
    /// Text to place on the clipboard
    pub clipboard: Option<String>,
    /// Content for the code overlay
    pub overlay: Option<OverlayContent>,
    /// File written by a download
    pub saved: Option<PathBuf>,
    /// Absolute subscription URL issued by a rotation
    pub subscription_url: Option<String>,
}

impl ActionOutcome {
    fn reload() -> Self {
        Self {
            reload: true,
            ..Default::default()
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Rejected locally, nothing was sent
    Validation(String),
    /// The remote call failed
    Api(ApiError),
    /// Writing a download failed
    Storage(String),
}

impl ActionError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ActionError::Api(e) if e.is_auth())
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{}", msg),
            Self::Api(err) => write!(f, "{}", err),
            Self::Storage(msg) => write!(f, "Could not save file: {}", msg),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<ApiError> for ActionError {
    fn from(err: ApiError) -> Self {
        ActionError::Api(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Execution
// ─────────────────────────────────────────────────────────────────────────────

/// Where downloads land
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub download_dir: PathBuf,
}

pub async fn execute(
    client: &ApiClient,
    action: Validated,
    context: &ActionContext,
) -> Result<ActionOutcome, ActionError> {
    match action {
        Validated::AddNode { name } => {
            let created: CreatedNode = client.call_json(endpoints::create_node(&name)).await?;
            tracing::info!("Created node {:?} ({})", name, created.id);
            Ok(ActionOutcome::reload().with_message("Node created. Copy URI from table."))
        }
        Validated::SaveSettings(settings) => {
            let reply = client.call(endpoints::save_settings(&settings)).await?;
            tracing::info!("Saved settings (listen port {})", settings.listen_port);
            let text = reply.verbatim();
            let message = if text.is_empty() { "Saved.".to_string() } else { text };
            Ok(ActionOutcome::reload().with_message(message))
        }
        Validated::ChangePassword { password } => {
            client.call(endpoints::change_password(&password)).await?;
            tracing::info!("Admin password changed");
            Ok(ActionOutcome::default().with_message("Password updated."))
        }
        Validated::Plain(action) => execute_plain(client, action, context).await,
    }
}

async fn execute_plain(
    client: &ApiClient,
    action: Action,
    context: &ActionContext,
) -> Result<ActionOutcome, ActionError> {
    match action {
        Action::CopyUri { id } => {
            let uri: NodeUri = client.call_json(endpoints::node_uri(&id)).await?;
            Ok(ActionOutcome {
                clipboard: Some(uri.uri),
                ..Default::default()
            })
        }
        Action::OpenCode { id } => {
            let uri: NodeUri = client.call_json(endpoints::node_uri(&id)).await?;
            Ok(ActionOutcome {
                overlay: Some(OverlayContent::new(client, &id, uri.uri)),
                ..Default::default()
            })
        }
        Action::ToggleNode { id, enabled } => {
            client.call(endpoints::set_node_enabled(&id, !enabled)).await?;
            tracing::info!(
                "{} node {}",
                if enabled { "Disabled" } else { "Enabled" },
                id
            );
            Ok(ActionOutcome::reload())
        }
        Action::ResetNode { id } => {
            client.call(endpoints::reset_node(&id)).await?;
            tracing::info!("Reset credentials of node {}", id);
            Ok(ActionOutcome::reload().with_message("New password generated. Copy new URI now."))
        }
        Action::DeleteNode { id } => {
            client.call(endpoints::delete_node(&id)).await?;
            tracing::info!("Deleted node {}", id);
            Ok(ActionOutcome::reload())
        }
        Action::RotateSubscription => {
            let rotated: RotatedSubscription =
                client.call_json(endpoints::rotate_subscription()).await?;
            tracing::info!("Rotated subscription token");
            let url = (!rotated.url.is_empty()).then(|| client.absolute_url(&rotated.url));
            Ok(ActionOutcome {
                subscription_url: url,
                ..ActionOutcome::reload().with_message("New token generated.")
            })
        }
        Action::RotateCert => {
            client.call(endpoints::rotate_cert()).await?;
            tracing::info!("Rotated relay certificate");
            Ok(ActionOutcome::reload().with_message("Rotated. See dashboard for new pin."))
        }
        Action::DownloadCode { id, format } => {
            let bytes = client.call_bytes(endpoints::node_code(&id, format)).await?;
            let path = download_path(&context.download_dir, &id, format);
            tokio::fs::create_dir_all(&context.download_dir)
                .await
                .map_err(|e| ActionError::Storage(e.to_string()))?;
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| ActionError::Storage(format!("{}: {}", path.display(), e)))?;
            tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
            Ok(ActionOutcome {
                saved: Some(path),
                ..Default::default()
            })
        }
        // Inputs are turned into their own `Validated` variants by `validate`
        Action::AddNode { .. } | Action::SaveSettings(_) | Action::ChangePassword { .. } => {
            Err(ActionError::Validation(format!(
                "{} was not validated",
                action.name()
            )))
        }
    }
}

/// `<dir>/<node-id>.<ext>`, with path separators in the id neutralized
pub fn download_path(dir: &std::path::Path, id: &str, format: CodeFormat) -> PathBuf {
    let stem: String = id
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.join(format!("{}.{}", stem, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::views::SettingsField;
    use serde_json::json;

    fn context() -> ActionContext {
        ActionContext {
            download_dir: std::env::temp_dir().join(format!(
                "hy2console-test-{}",
                std::process::id()
            )),
        }
    }

    async fn run(mock: &MockTransport, action: Action) -> Result<ActionOutcome, ActionError> {
        let validated = action.validate()?;
        execute(&mock.client(), validated, &context()).await
    }

    #[test]
    fn test_destructive_actions_need_confirmation() {
        assert!(Action::ResetNode { id: "a".into() }.confirmation().is_some());
        assert!(Action::DeleteNode { id: "a".into() }.confirmation().is_some());
        assert!(Action::RotateSubscription.confirmation().is_some());
        assert!(Action::RotateCert.confirmation().is_some());

        assert!(Action::CopyUri { id: "a".into() }.confirmation().is_none());
        assert!(Action::ToggleNode { id: "a".into(), enabled: true }
            .confirmation()
            .is_none());
        assert!(Action::AddNode { name: "x".into() }.confirmation().is_none());
    }

    #[test]
    fn test_blank_node_name_rejected() {
        let err = Action::AddNode { name: "   ".into() }.validate().unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(Action::ChangePassword { password: "short".into() }
            .validate()
            .is_err());
        assert!(Action::ChangePassword { password: "".into() }.is_noop());
        assert!(Action::ChangePassword { password: "longenough".into() }
            .validate()
            .is_ok());
    }

    #[test]
    fn test_download_path_sanitizes_id() {
        let path = download_path(std::path::Path::new("/tmp/x"), "a/b", CodeFormat::Svg);
        assert_eq!(path, std::path::PathBuf::from("/tmp/x/a_b.svg"));
    }

    #[tokio::test]
    async fn test_dot_only_node_ids_are_rejected_before_any_call() {
        let mock = MockTransport::new();
        for id in [".", ".."] {
            let err = run(&mock, Action::DeleteNode { id: id.into() })
                .await
                .unwrap_err();
            assert!(matches!(err, ActionError::Validation(_)));
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rotation_reports_new_subscription_url() {
        let mock = MockTransport::new();
        mock.respond_json(
            "POST /api/subscription/rotate",
            json!({"ok": true, "token": "NEWTOK", "url": "/sub/NEWTOK"}),
        );

        let out = run(&mock, Action::RotateSubscription).await.unwrap();
        assert!(out.reload);
        assert_eq!(out.message.as_deref(), Some("New token generated."));
        assert_eq!(
            out.subscription_url.as_deref(),
            Some("http://relay.test/sub/NEWTOK")
        );
    }

    #[tokio::test]
    async fn test_toggle_calls_opposite_of_displayed_state() {
        let mock = MockTransport::new();
        mock.respond_json("POST /api/nodes/a/disable", json!({"ok": true}));
        mock.respond_json("POST /api/nodes/b/enable", json!({"ok": true}));

        let out = run(&mock, Action::ToggleNode { id: "a".into(), enabled: true })
            .await
            .unwrap();
        assert!(out.reload);
        run(&mock, Action::ToggleNode { id: "b".into(), enabled: false })
            .await
            .unwrap();

        assert_eq!(
            mock.calls(),
            vec!["POST /api/nodes/a/disable", "POST /api/nodes/b/enable"]
        );
    }

    #[tokio::test]
    async fn test_copy_uri_does_not_reload() {
        let mock = MockTransport::new();
        mock.respond_json("GET /api/nodes/a/uri", json!({"uri": "hysteria2://u:p@h:443"}));
        let out = run(&mock, Action::CopyUri { id: "a".into() }).await.unwrap();
        assert_eq!(out.clipboard.as_deref(), Some("hysteria2://u:p@h:443"));
        assert!(!out.reload);
    }

    #[tokio::test]
    async fn test_reset_instructs_refetch() {
        let mock = MockTransport::new();
        mock.respond_json("POST /api/nodes/a/reset", json!({"ok": true}));
        let out = run(&mock, Action::ResetNode { id: "a".into() }).await.unwrap();
        assert!(out.reload);
        assert!(out.clipboard.is_none());
        assert!(out.overlay.is_none());
        assert_eq!(
            out.message.as_deref(),
            Some("New password generated. Copy new URI now.")
        );
    }

    #[tokio::test]
    async fn test_add_node_does_not_open_overlay() {
        let mock = MockTransport::new();
        mock.respond_json("POST /api/nodes", json!({"ok": true, "id": "n1"}));
        let out = run(&mock, Action::AddNode { name: " laptop ".into() }).await.unwrap();
        assert!(out.overlay.is_none());
        assert!(out.reload);
        assert_eq!(mock.json_bodies("POST /api/nodes"), vec![json!({"name": "laptop"})]);
    }

    #[tokio::test]
    async fn test_save_settings_sends_one_atomic_post() {
        let mock = MockTransport::new();
        mock.respond_json("POST /api/settings", json!({"ok": true, "port": 443}));
        let form = SettingsForm {
            sni: "x".into(),
            masquerade_url: "y".into(),
            masquerade_rewrite: true,
            listen_port: "443".into(),
            focus: SettingsField::Sni,
        };

        let out = run(&mock, Action::SaveSettings(form)).await.unwrap();

        assert_eq!(mock.calls(), vec!["POST /api/settings"]);
        assert_eq!(
            mock.json_bodies("POST /api/settings"),
            vec![json!({"sni": "x", "masqueradeUrl": "y", "masqueradeRewrite": true, "listenPort": 443})]
        );
        assert_eq!(out.message.as_deref(), Some(r#"{"ok":true,"port":443}"#));
        assert!(out.reload);
    }

    #[tokio::test]
    async fn test_password_change_does_not_reload() {
        let mock = MockTransport::new();
        mock.respond_json("POST /api/admin/password", json!({"ok": true}));
        let out = run(&mock, Action::ChangePassword { password: "correct horse".into() })
            .await
            .unwrap();
        assert!(!out.reload);
        assert_eq!(out.message.as_deref(), Some("Password updated."));
    }

    #[tokio::test]
    async fn test_remote_error_surfaces() {
        let mock = MockTransport::new();
        mock.respond_error("DELETE /api/nodes/a", 500, "storage failure\n");
        let err = run(&mock, Action::DeleteNode { id: "a".into() }).await.unwrap_err();
        assert_eq!(
            err,
            ActionError::Api(ApiError::Remote {
                status: 500,
                message: "storage failure".into()
            })
        );
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let mock = MockTransport::new();
        mock.respond_raw("GET /api/nodes/a/qrcode.svg", 200, Some("image/svg+xml"), "<svg/>");
        let out = run(&mock, Action::DownloadCode { id: "a".into(), format: CodeFormat::Svg })
            .await
            .unwrap();
        let path = out.saved.unwrap();
        assert!(path.ends_with("a.svg"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
        let _ = std::fs::remove_file(path);
    }
}
