//! `OAuth2` provider configurations.

use crate::error::{Error, Result};
use url::Url;

/// `OAuth2` provider configuration.
///
/// Only the authorize endpoint is needed on the client. The token endpoint
/// is used by the backend exchange service.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name (e.g., "Microsoft").
    pub name: String,
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Default scopes.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(name: impl Into<String>, auth_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            default_scopes: Vec::new(),
        })
    }

    /// Sets the default scopes.
    #[must_use]
    pub fn with_default_scopes(mut self, scopes: Vec<String>) -> Self {
        self.default_scopes = scopes;
        self
    }

    /// Microsoft/Outlook `OAuth2` provider configuration.
    ///
    /// Scopes:
    /// - `openid`, `email`, `profile` - mailbox identity for the exchange service
    /// - `offline_access` - Refresh token
    /// - `https://graph.microsoft.com/Mail.Read` - read mail for triage
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn microsoft() -> Result<Self> {
        Ok(Self::new(
            "Microsoft",
            "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
        )?
        .with_default_scopes(
            [
                "openid",
                "email",
                "profile",
                "offline_access",
                "https://graph.microsoft.com/Mail.Read",
            ]
            .map(String::from)
            .to_vec(),
        ))
    }

    /// Google `OAuth2` provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn google() -> Result<Self> {
        Ok(
            Self::new("Google", "https://accounts.google.com/o/oauth2/v2/auth")?
                .with_default_scopes(
                    [
                        "openid",
                        "email",
                        "profile",
                        "https://www.googleapis.com/auth/gmail.readonly",
                    ]
                    .map(String::from)
                    .to_vec(),
                ),
        )
    }

    /// Looks up a preset by name (`microsoft`/`outlook`, `google`/`gmail`).
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "microsoft" | "outlook" => Self::microsoft(),
            "google" | "gmail" => Self::google(),
            other => Err(Error::InvalidConfig(format!("unknown provider: {other}"))),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the authorize URL is not https (loopback excepted).
    pub fn validate(&self) -> Result<()> {
        let loopback = matches!(self.auth_url.host_str(), Some("localhost" | "127.0.0.1"));
        if self.auth_url.scheme() != "https" && !loopback {
            return Err(Error::InvalidConfig("auth_url must use https".into()));
        }
        Ok(())
    }
}
