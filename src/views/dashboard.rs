//! Dashboard: read-only service summary

use crate::api::models::Dashboard;
use crate::api::{endpoints, ApiClient, ApiError};

/// Shown when the server reports no recent errors
pub const NO_ERRORS_PLACEHOLDER: &str = "(none)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    /// `active` / `inactive`
    pub status: String,
    pub listen: String,
    pub pin: String,
    pub port: u16,
    /// Error lines from the journal, or the placeholder
    pub recent_errors: String,
}

impl DashboardView {
    pub fn from_model(model: Dashboard) -> Self {
        let recent_errors = if model.recent_errors.trim().is_empty() {
            NO_ERRORS_PLACEHOLDER.to_string()
        } else {
            model.recent_errors
        };
        Self {
            status: model.hysteria_status,
            listen: model.listen,
            pin: model.pin,
            port: model.port,
            recent_errors,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    pub fn status_badge(&self) -> String {
        format!("Hysteria: {}", self.status)
    }

    pub fn listen_badge(&self) -> String {
        format!("Listen UDP: {}", self.listen)
    }

    pub fn pin_badge(&self) -> String {
        format!("PinSHA256: {}", self.pin)
    }

    pub fn tip(&self) -> String {
        format!(
            "Tip: cloud provider security group must allow UDP/{}.",
            self.port
        )
    }
}

pub async fn load(client: &ApiClient) -> Result<DashboardView, ApiError> {
    let model: Dashboard = client.call_json(endpoints::dashboard()).await?;
    Ok(DashboardView::from_model(model))
}
