//! Settings view: editable relay settings form
//!
//! The form keeps the port as text while it is being edited; it becomes a
//! [`Settings`] value only through [`SettingsForm::to_settings`], which is
//! where out-of-range ports are rejected.

use crate::api::models::Settings;
use crate::api::{endpoints, ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Sni,
    MasqueradeUrl,
    MasqueradeRewrite,
    ListenPort,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::Sni,
        SettingsField::MasqueradeUrl,
        SettingsField::MasqueradeRewrite,
        SettingsField::ListenPort,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::Sni => "SNI",
            SettingsField::MasqueradeUrl => "Masquerade URL",
            SettingsField::MasqueradeRewrite => "Rewrite Host",
            SettingsField::ListenPort => "Listen port (UDP)",
        }
    }

    fn index(&self) -> usize {
        SettingsField::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        SettingsField::ALL[(self.index() + 1) % SettingsField::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = SettingsField::ALL.len();
        SettingsField::ALL[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub sni: String,
    pub masquerade_url: String,
    pub masquerade_rewrite: bool,
    pub listen_port: String,
    pub focus: SettingsField,
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sni: settings.sni.clone(),
            masquerade_url: settings.masquerade_url.clone(),
            masquerade_rewrite: settings.masquerade_rewrite,
            listen_port: settings.listen_port.to_string(),
            focus: SettingsField::default(),
        }
    }

    /// Current value of a field as display text
    pub fn value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Sni => self.sni.clone(),
            SettingsField::MasqueradeUrl => self.masquerade_url.clone(),
            SettingsField::MasqueradeRewrite => {
                if self.masquerade_rewrite { "[x]" } else { "[ ]" }.to_string()
            }
            SettingsField::ListenPort => self.listen_port.clone(),
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SettingsField::Sni => Some(&mut self.sni),
            SettingsField::MasqueradeUrl => Some(&mut self.masquerade_url),
            SettingsField::ListenPort => Some(&mut self.listen_port),
            SettingsField::MasqueradeRewrite => None,
        }
    }

    /// Type a character into the focused field
    pub fn insert_char(&mut self, c: char) {
        if self.focus == SettingsField::ListenPort && !c.is_ascii_digit() {
            return;
        }
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Space on the checkbox
    pub fn toggle(&mut self) {
        if self.focus == SettingsField::MasqueradeRewrite {
            self.masquerade_rewrite = !self.masquerade_rewrite;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Build the atomic settings value; the port must be in 1..=65535
    pub fn to_settings(&self) -> Result<Settings, String> {
        let port = self
            .listen_port
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|p| (1..=65535).contains(p))
            .ok_or_else(|| format!("invalid port: {:?}", self.listen_port.trim()))?;

        Ok(Settings {
            sni: self.sni.trim().to_string(),
            masquerade_url: self.masquerade_url.trim().to_string(),
            masquerade_rewrite: self.masquerade_rewrite,
            listen_port: port as u16,
        })
    }
}

pub async fn load(client: &ApiClient) -> Result<SettingsForm, ApiError> {
    let settings: Settings = client.call_json(endpoints::settings()).await?;
    Ok(SettingsForm::from_settings(&settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use serde_json::json;

    fn form(port: &str) -> SettingsForm {
        SettingsForm {
            sni: "www.bing.com".into(),
            masquerade_url: "https://www.bing.com".into(),
            masquerade_rewrite: true,
            listen_port: port.into(),
            focus: SettingsField::Sni,
        }
    }

    #[test]
    fn test_port_range() {
        assert!(form("0").to_settings().is_err());
        assert!(form("65536").to_settings().is_err());
        assert!(form("").to_settings().is_err());
        assert_eq!(form("1").to_settings().unwrap().listen_port, 1);
        assert_eq!(form("65535").to_settings().unwrap().listen_port, 65535);
    }

    #[test]
    fn test_port_field_only_takes_digits() {
        let mut f = form("44");
        f.focus = SettingsField::ListenPort;
        f.insert_char('x');
        f.insert_char('3');
        assert_eq!(f.listen_port, "443");
        f.backspace();
        assert_eq!(f.listen_port, "44");
    }

    #[test]
    fn test_toggle_only_on_checkbox() {
        let mut f = form("443");
        f.toggle();
        assert!(f.masquerade_rewrite);
        f.focus = SettingsField::MasqueradeRewrite;
        f.toggle();
        assert!(!f.masquerade_rewrite);
        f.insert_char('a');
        assert_eq!(f.value(SettingsField::MasqueradeRewrite), "[ ]");
    }

    #[test]
    fn test_focus_wraps() {
        assert_eq!(SettingsField::ListenPort.next(), SettingsField::Sni);
        assert_eq!(SettingsField::Sni.prev(), SettingsField::ListenPort);
    }

    #[tokio::test]
    async fn test_load_populates_form() {
        let mock = MockTransport::new();
        mock.respond_json(
            "GET /api/settings",
            json!({"sni": "a.example", "masqueradeUrl": "https://a.example", "masqueradeRewrite": false, "listenPort": 8443, "manageListen": "0.0.0.0:3333"}),
        );
        let form = load(&mock.client()).await.unwrap();
        assert_eq!(form.sni, "a.example");
        assert_eq!(form.listen_port, "8443");
        assert!(!form.masquerade_rewrite);
    }
}
