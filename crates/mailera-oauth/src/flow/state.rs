//! CSRF `state` parameter for the authorization request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

/// Opaque random value sent with the authorization request and echoed back
/// on the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfState(String);

impl CsrfState {
    /// Generates a fresh state from 32 random bytes.
    #[must_use]
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::thread_rng().r#gen();
        Self(URL_SAFE_NO_PAD.encode(random_bytes))
    }

    /// Returns the encoded value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `other` is the value this state was issued with.
    #[must_use]
    pub fn matches(&self, other: Option<&str>) -> bool {
        other == Some(self.0.as_str())
    }
}

impl From<String> for CsrfState {
    fn from(value: String) -> Self {
        Self(value)
    }
}
