//! Onboarding and dashboard steps.

use serde::{Deserialize, Serialize};

/// Path the `OAuth` provider redirects back to.
pub const CALLBACK_PATH: &str = "/callback";

/// Screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    /// Landing screen.
    #[default]
    Welcome,
    /// Persona selection.
    Identity,
    /// First-run rule tuning.
    Tuning,
    /// Mailbox authorization.
    Connect,
    /// Handling the `OAuth` redirect.
    Callback,
    /// Triaged mail overview.
    Dashboard,
    /// Settings screen.
    Settings,
    /// Rule tuning reached from settings.
    EditRules,
}

impl Step {
    /// Step to start in when the app is entered at `path`.
    #[must_use]
    pub fn initial_for_path(path: &str) -> Self {
        if path.trim_end_matches('/') == CALLBACK_PATH {
            Self::Callback
        } else {
            Self::Welcome
        }
    }

    /// Returns true for the steps that show the rule editor.
    #[must_use]
    pub const fn is_tuning(&self) -> bool {
        matches!(self, Self::Tuning | Self::EditRules)
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Identity => "Choose your persona",
            Self::Tuning => "Fine-tune priority",
            Self::Connect => "Connect & secure",
            Self::Callback => "Connecting",
            Self::Dashboard => "Daily briefing",
            Self::Settings => "Settings",
            Self::EditRules => "Edit rules",
        }
    }
}
