//! Authorization Code request.

use crate::provider::Provider;
use url::Url;

/// Client registration used to send the user to the provider's consent page.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from provider.
    pub client_id: String,
    /// Redirect URI the provider sends the code back to.
    pub redirect_uri: String,
    /// Provider configuration.
    pub provider: Provider,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            provider,
        }
    }

    /// Builds the authorization URL for user consent.
    ///
    /// # Arguments
    ///
    /// * `scopes` - Optional scopes to request (uses provider defaults if None)
    /// * `state` - Optional state parameter for CSRF protection
    #[must_use]
    pub fn authorization_url(&self, scopes: Option<&[String]>, state: Option<&str>) -> Url {
        let mut url = self.provider.auth_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client_id)
                .append_pair("response_type", "code")
                .append_pair("redirect_uri", &self.redirect_uri);

            let scope_str = scopes.map_or_else(
                || self.provider.default_scopes.join(" "),
                |s| s.join(" "),
            );

            if !scope_str.is_empty() {
                pairs.append_pair("scope", &scope_str);
            }

            if let Some(state_val) = state {
                pairs.append_pair("state", state_val);
            }

            // Provider-specific parameters
            match self.provider.name.as_str() {
                "Google" => {
                    pairs
                        .append_pair("access_type", "offline")
                        .append_pair("prompt", "consent");
                }
                "Microsoft" => {
                    pairs
                        .append_pair("response_mode", "query")
                        .append_pair("prompt", "select_account");
                }
                _ => {}
            }
        }

        url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        OAuthClient::new(
            "test_client",
            "http://localhost:8080/callback",
            Provider::microsoft().unwrap(),
        )
    }

    #[test]
    fn test_authorization_url() {
        let url = client().authorization_url(None, Some("random_state"));

        assert!(url.as_str().contains("client_id=test_client"));
        assert!(url.as_str().contains("response_type=code"));
        assert!(url.as_str().contains("state=random_state"));
        assert!(
            url.as_str()
                .contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback")
        );
        assert!(url.as_str().contains("response_mode=query"));
    }

    #[test]
    fn test_authorization_url_custom_scopes() {
        let scopes = vec!["email".to_string(), "profile".to_string()];
        let url = client().authorization_url(Some(&scopes), None);

        // Space becomes + in query parameters
        assert!(url.as_str().contains("scope=email+profile"));
        assert!(!url.as_str().contains("state="));
    }

    #[test]
    fn test_google_specific_params() {
        let client = OAuthClient::new("c", "http://localhost/cb", Provider::google().unwrap());
        let url = client.authorization_url(None, None);

        assert!(url.as_str().contains("access_type=offline"));
        assert!(url.as_str().contains("prompt=consent"));
    }
}
