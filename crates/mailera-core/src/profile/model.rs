//! Profile data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rules::RuleSet;

/// Preset identity the user picks during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    /// Grades and deadlines first.
    Overachiever,
    /// Only emergencies get through.
    LayingFlat,
    /// Events and socials are top priority.
    Party,
    /// Work-life balance.
    Balanced,
    /// Journals and grants first.
    Researcher,
}

impl Persona {
    /// All personas, in the order they are offered.
    pub const ALL: [Self; 5] = [
        Self::Overachiever,
        Self::Researcher,
        Self::Balanced,
        Self::Party,
        Self::LayingFlat,
    ];

    /// Parse from tag. Accepts any case and `-` for `_`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "OVERACHIEVER" => Some(Self::Overachiever),
            "LAYING_FLAT" => Some(Self::LayingFlat),
            "PARTY" => Some(Self::Party),
            "BALANCED" => Some(Self::Balanced),
            "RESEARCHER" => Some(Self::Researcher),
            _ => None,
        }
    }

    /// Tag representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overachiever => "OVERACHIEVER",
            Self::LayingFlat => "LAYING_FLAT",
            Self::Party => "PARTY",
            Self::Balanced => "BALANCED",
            Self::Researcher => "RESEARCHER",
        }
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Overachiever => "Overachiever",
            Self::LayingFlat => "Chill Mode",
            Self::Party => "Socialite",
            Self::Balanced => "Balanced",
            Self::Researcher => "Researcher",
        }
    }
}

impl std::str::FromStr for Persona {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnknownPersona(s.to_string()))
    }
}

/// Interface language preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    ZhCn,
    /// Traditional Chinese.
    ZhTw,
}

impl Language {
    /// Parse from code (`en`, `zh-cn`, `ZH_TW`, ...).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "EN" => Some(Self::En),
            "ZH_CN" => Some(Self::ZhCn),
            "ZH_TW" => Some(Self::ZhTw),
            _ => None,
        }
    }

    /// Code representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::ZhCn => "ZH_CN",
            Self::ZhTw => "ZH_TW",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnknownLanguage(s.to_string()))
    }
}

/// Everything the client knows about its user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// First-run vs returning user.
    pub has_completed_setup: bool,
    /// Selected persona.
    pub identity: Option<Persona>,
    /// Authenticated mailbox, set only once `OAuth` succeeds.
    pub email: Option<String>,
    /// Account holder's name as reported by the exchange service.
    pub display_name: Option<String>,
    /// When the mailbox was connected.
    pub connected_at: Option<DateTime<Utc>>,
    /// The user's priority rules.
    pub rules: RuleSet,
}

impl UserProfile {
    /// Logout: everything back to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Persona change: identity cleared and rules back to the seed.
    /// Mailbox and setup flag are kept.
    pub fn reset_persona(&mut self) {
        self.identity = None;
        self.rules = RuleSet::seed();
    }

    /// Records a successful mailbox connection.
    pub fn record_connection(&mut self, email: impl Into<String>, name: impl Into<String>) {
        self.email = Some(email.into());
        self.display_name = Some(name.into());
        self.has_completed_setup = true;
        self.connected_at = Some(Utc::now());
    }

    /// Returns true once a mailbox is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.email.is_some()
    }
}
