//! Redirect query parsing.

use url::Url;

/// Base used to resolve a redirect given as path and query only.
const RELATIVE_BASE: &str = "http://localhost/";

/// Parameters the provider appends to the redirect URI.
///
/// Empty values are treated as absent. When a key repeats, the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    path: String,
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    state: Option<String>,
}

impl CallbackParams {
    /// Parses an absolute URL (`https://app/callback?code=..`) or a path with
    /// query (`/callback?code=..`). Unparseable input yields no parameters.
    #[must_use]
    pub fn parse(uri: &str) -> Self {
        let url = Url::parse(uri).or_else(|_| Url::parse(RELATIVE_BASE)?.join(uri));
        let Ok(url) = url else {
            tracing::debug!(uri, "Unparseable redirect, treating as empty");
            return Self {
                path: "/".to_string(),
                ..Self::default()
            };
        };

        let mut params = Self {
            path: url.path().to_string(),
            ..Self::default()
        };

        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                "state" => &mut params.state,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }

    /// Path part of the redirect, without query.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Authorization code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Provider error code (e.g. `access_denied`).
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Human-readable error description.
    #[must_use]
    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }

    /// Echoed CSRF state.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Failure reason if the provider reported an error: the description,
    /// or the error code when there is none.
    #[must_use]
    pub fn error_reason(&self) -> Option<&str> {
        self.error()
            .map(|error| self.error_description().unwrap_or(error))
    }
}
