//! View builders
//!
//! Each builder loads what its view needs from the control plane (calls are
//! sequential, never joined) and produces a plain view model. Rendering lives
//! in `tui::views`; actions are wired by the console against these models.

pub mod dashboard;
pub mod logs;
pub mod nodes;
pub mod settings;

pub use dashboard::DashboardView;
pub use logs::LogsView;
pub use nodes::NodesView;
pub use settings::{SettingsField, SettingsForm};

use crate::api::{ApiClient, ApiError};
use crate::router::Route;

/// Options builders take from configuration
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Tail size requested by the logs view
    pub log_lines: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            log_lines: crate::api::endpoints::DEFAULT_LOG_LINES,
        }
    }
}

/// A fully loaded view, ready to render
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    Dashboard(DashboardView),
    Nodes(NodesView),
    Logs(LogsView),
    Settings(SettingsForm),
}

impl ViewModel {
    pub fn route(&self) -> Route {
        match self {
            ViewModel::Dashboard(_) => Route::Dashboard,
            ViewModel::Nodes(_) => Route::Nodes,
            ViewModel::Logs(_) => Route::Logs,
            ViewModel::Settings(_) => Route::Settings,
        }
    }
}

/// Select the builder for a route and run it
pub async fn build(
    route: Route,
    client: &ApiClient,
    options: BuildOptions,
) -> Result<ViewModel, ApiError> {
    Ok(match route {
        Route::Dashboard => ViewModel::Dashboard(dashboard::load(client).await?),
        Route::Nodes => ViewModel::Nodes(nodes::load(client).await?),
        Route::Logs => ViewModel::Logs(logs::load(client, options.log_lines).await?),
        Route::Settings => ViewModel::Settings(settings::load(client).await?),
    })
}
