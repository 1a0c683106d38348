//! Logs view: fixed-size tail of the relay's journal, shown verbatim

use crate::api::{endpoints, ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsView {
    /// Tail size that was requested
    pub requested: usize,
    pub text: String,
}

impl LogsView {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

pub async fn load(client: &ApiClient, lines: usize) -> Result<LogsView, ApiError> {
    let request = endpoints::logs(lines);
    let text = client.call_text(request).await?;
    Ok(LogsView {
        requested: lines,
        text,
    })
}
