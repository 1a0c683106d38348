//! Sign-in and sign-out against the manager's login entry point
//!
//! The web UI authenticates with a form post that answers `302 /#dashboard` on
//! success and re-renders the login page on failure. The page may embed an
//! anti-forgery token in a hidden input; when present it is scraped and handed
//! to the transport before posting.

use super::{endpoints, ApiClient, ApiError};
use regex::Regex;
use std::sync::OnceLock;

/// Operator credentials for the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// One-time code, only sent when non-empty
    pub totp: Option<String>,
}

fn csrf_input() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<input[^>]*name="(?:gorilla\.csrf\.Token|csrf_token|_csrf)"[^>]*>"#)
            .expect("static regex")
    })
}

fn value_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"value="([^"]*)""#).expect("static regex"))
}

/// Pull the anti-forgery token out of a login page, if it carries one
pub fn scrape_csrf_token(html: &str) -> Option<String> {
    let tag = csrf_input().find(html)?;
    value_attr()
        .captures(tag.as_str())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| !token.is_empty())
}

/// Best-effort reason from a re-rendered login page
fn rejection_reason(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    for reason in ["invalid totp", "invalid credentials"] {
        if lower.contains(reason) {
            return reason.to_string();
        }
    }
    "invalid credentials".to_string()
}

/// Sign in; on success the transport's cookie jar holds the session
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<(), ApiError> {
    let page = client.call_raw(endpoints::login_page()).await?;
    if page.is_success() {
        let token = scrape_csrf_token(&page.text());
        if token.is_some() {
            tracing::debug!("Login page carries an anti-forgery token");
        }
        client.remember_csrf_token(token);
    }

    let response = client
        .call_raw(endpoints::login(
            &credentials.username,
            &credentials.password,
            credentials.totp.as_deref(),
        ))
        .await?;

    if response.is_redirect() {
        let back_to_login = response
            .location
            .as_deref()
            .map(|l| l.contains("/login"))
            .unwrap_or(false);
        if !back_to_login {
            tracing::info!("Signed in as {}", credentials.username);
            return Ok(());
        }
    }

    match response.status {
        200..=399 => Err(ApiError::LoginRejected(rejection_reason(&response.text()))),
        status => Err(ApiError::Remote {
            status,
            message: response.text().trim().to_string(),
        }),
    }
}

/// Sign out; the server clears the session and redirects to `/login`
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let response = client.call_raw(endpoints::logout()).await?;
    if response.is_success() || response.is_redirect() {
        tracing::info!("Signed out");
        Ok(())
    } else {
        Err(ApiError::Remote {
            status: response.status,
            message: response.text().trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;

    fn creds() -> Credentials {
        Credentials {
            username: "admin".to_string(),
            password: "correct horse".to_string(),
            totp: None,
        }
    }

    #[test]
    fn test_scrape_csrf_token() {
        let html = r#"<form method="post"><input type="hidden" name="gorilla.csrf.Token" value="abc+/="><input name="username"></form>"#;
        assert_eq!(scrape_csrf_token(html), Some("abc+/=".to_string()));
        assert_eq!(scrape_csrf_token("<form></form>"), None);
    }

    #[tokio::test]
    async fn test_login_success_on_redirect_to_app() {
        let mock = MockTransport::new();
        mock.respond_text("GET /login", "<html></html>");
        mock.respond_redirect("POST /login", "/#dashboard");
        assert_eq!(login(&mock.client(), &creds()).await, Ok(()));
        assert_eq!(mock.calls(), vec!["GET /login", "POST /login"]);
    }

    #[tokio::test]
    async fn test_login_rejected_when_page_is_rendered_again() {
        let mock = MockTransport::new();
        mock.respond_text("GET /login", "<html></html>");
        mock.respond_raw(
            "POST /login",
            200,
            Some("text/html"),
            "<p class=\"err\">invalid totp</p>",
        );
        assert_eq!(
            login(&mock.client(), &creds()).await,
            Err(ApiError::LoginRejected("invalid totp".to_string()))
        );
    }

    #[tokio::test]
    async fn test_login_forbidden_is_remote_error() {
        let mock = MockTransport::new();
        mock.respond_error("POST /login", 403, "Forbidden - CSRF token invalid");
        let err = login(&mock.client(), &creds()).await.unwrap_err();
        assert!(matches!(err, ApiError::Remote { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_logout_accepts_redirect() {
        let mock = MockTransport::new();
        mock.respond_redirect("GET /logout", "/login");
        assert_eq!(logout(&mock.client()).await, Ok(()));
    }
}
