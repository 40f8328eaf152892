//! Shell settings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default backend that trades authorization codes for the mailbox identity.
pub const DEFAULT_EXCHANGE_URL: &str =
    "https://n8n-production-9f74.up.railway.app/webhook/oauth-callback";
/// Default redirect URI registered with the provider.
pub const DEFAULT_REDIRECT_URI: &str = "https://mailera-nine.vercel.app/callback";

/// Settings that persist across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `OAuth` provider preset (`microsoft` or `google`).
    pub provider: String,
    /// Client ID registered with the provider.
    pub client_id: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Token-exchange service endpoint.
    pub exchange_url: String,
    /// How long the success screen is shown, in milliseconds.
    pub success_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: "microsoft".to_string(),
            client_id: String::new(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            exchange_url: DEFAULT_EXCHANGE_URL.to_string(),
            success_delay_ms: 1500,
        }
    }
}

impl Settings {
    /// Default settings file (`~/.config/mailera/settings.json` on Linux).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailera")
            .join("settings.json")
    }

    /// Loads settings from `path`, then applies environment overrides.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let mut settings = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Applies `MAILERA_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 4] = [
            ("MAILERA_PROVIDER", &mut self.provider),
            ("MAILERA_CLIENT_ID", &mut self.client_id),
            ("MAILERA_REDIRECT_URI", &mut self.redirect_uri),
            ("MAILERA_EXCHANGE_URL", &mut self.exchange_url),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    /// Display delay before success is reported.
    pub const fn success_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.success_delay_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.exchange_url, DEFAULT_EXCHANGE_URL);
        assert_eq!(settings.success_delay().as_millis(), 1500);
        assert!(settings.client_id.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"client_id":"abc"}"#).unwrap();
        assert_eq!(settings.client_id, "abc");
        assert_eq!(settings.redirect_uri, DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(|key| match key {
            "MAILERA_CLIENT_ID" => Some("from-env".to_string()),
            "MAILERA_EXCHANGE_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(settings.client_id, "from-env");
        assert_eq!(settings.exchange_url, DEFAULT_EXCHANGE_URL);
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("config.json")).await.unwrap();
        assert_eq!(settings.provider, "microsoft");
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"client_id":"abc","success_delay_ms":0}"#)
            .await
            .unwrap();
        let settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.client_id, "abc");
        assert_eq!(settings.success_delay(), std::time::Duration::ZERO);
    }
}
