//! Broker session configuration for the authorization-code login.
//!
//! Credentials are an explicit value handed to whoever needs them; nothing
//! here is process-global. This module only builds the login URL and pulls
//! the auth code back out of the redirect. Exchanging the code for an access
//! token is the only step that needs the app secret; it happens outside this
//! tool, so the secret is never taken here.

use reqwest::Url;
use thiserror::Error;

/// Authorization endpoint of the broker's v3 API.
pub const DEFAULT_AUTH_BASE: &str = "https://api-t1.fyers.in/api/v3/generate-authcode";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("no auth_code parameter in redirect URL")]
    MissingAuthCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerCredentials {
    client_id: String,
    redirect_uri: String,
}

impl BrokerCredentials {
    pub fn new(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let creds = Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
        };
        if creds.client_id.trim().is_empty() {
            return Err(SessionError::MissingCredential("client_id"));
        }
        Url::parse(&creds.redirect_uri).map_err(|e| SessionError::InvalidUrl(e.to_string()))?;
        Ok(creds)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Login URL the user opens in a browser.
    pub fn authorization_url(&self, base: &str, state: &str) -> Result<Url, SessionError> {
        Url::parse_with_params(
            base,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("state", state),
            ],
        )
        .map_err(|e| SessionError::InvalidUrl(e.to_string()))
    }
}

/// Pull the `auth_code` query parameter out of the pasted redirect URL.
pub fn extract_auth_code(redirect_url: &str) -> Result<String, SessionError> {
    let url =
        Url::parse(redirect_url.trim()).map_err(|e| SessionError::InvalidUrl(e.to_string()))?;
    url.query_pairs()
        .find(|(key, _)| key == "auth_code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or(SessionError::MissingAuthCode)
}

/// First ten characters followed by an ellipsis, for log lines.
pub fn redact(secret: &str) -> String {
    let head: String = secret.chars().take(10).collect();
    format!("{head}...")
}
