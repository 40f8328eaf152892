//! The application reducer.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::step::Step;
use crate::profile::{Language, Persona, UserProfile};
use crate::rules::RuleSet;

/// Top-level application state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Current screen.
    pub step: Step,
    /// The user's profile.
    pub profile: UserProfile,
    /// Interface language.
    pub language: Language,
    /// Reason of the last failed authorization, shown on the connect screen.
    pub last_error: Option<String>,
}

impl AppState {
    /// Fresh state for an app entered at `path`.
    #[must_use]
    pub fn at_path(path: &str) -> Self {
        Self {
            step: Step::initial_for_path(path),
            ..Self::default()
        }
    }
}

/// Something a screen reports upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Welcome screen call to action.
    Start,
    /// Persona picked.
    PersonaSelected(Persona),
    /// Rule editor saved.
    TuningCompleted(RuleSet),
    /// Back button.
    Back,
    /// "Authorize" pressed on the connect screen.
    ConnectRequested,
    /// The app was entered through the `OAuth` redirect.
    CallbackEntered,
    /// Callback handler reported success.
    OAuthSucceeded {
        /// Authenticated mailbox.
        email: String,
        /// Account holder's name.
        name: String,
    },
    /// Callback handler reported failure.
    OAuthFailed {
        /// Why authorization failed.
        reason: String,
    },
    /// Dashboard navigation to settings.
    OpenSettings,
    /// Settings "edit rules".
    EditRules,
    /// Settings "switch persona" (confirmed).
    ChangePersona,
    /// Log out.
    Logout,
    /// Language switcher.
    LanguageChanged(Language),
}

/// Side effect the shell must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the current location without adding a history entry.
    ReplaceLocation(String),
    /// Send the user to the provider's authorization page.
    BeginAuthorization,
}

/// Result of reducing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next state.
    pub state: AppState,
    /// Effects to perform, in order.
    pub effects: Vec<Effect>,
    /// False if the event did not apply to the current step.
    pub applied: bool,
}

/// Maps `(state, event)` to the next state.
///
/// Events that make no sense on the current step leave the state untouched
/// and report `applied: false`.
#[must_use]
pub fn reduce(state: &AppState, event: Event) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    let applied = match (state.step, event) {
        (Step::Welcome, Event::Start) => {
            next.step = Step::Identity;
            true
        }
        (Step::Identity, Event::PersonaSelected(persona)) => {
            next.profile.identity = Some(persona);
            next.step = Step::Tuning;
            true
        }
        (step @ (Step::Tuning | Step::EditRules), Event::TuningCompleted(rules)) => {
            next.profile.rules = rules;
            next.step = if step == Step::EditRules {
                Step::Settings
            } else {
                Step::Connect
            };
            true
        }
        (Step::Tuning, Event::Back) => {
            next.step = Step::Identity;
            true
        }
        (Step::EditRules, Event::Back) => {
            next.step = Step::Settings;
            true
        }
        (Step::Settings, Event::Back) => {
            next.step = Step::Dashboard;
            true
        }
        (Step::Connect, Event::ConnectRequested) => {
            next.last_error = None;
            effects.push(Effect::BeginAuthorization);
            true
        }
        (_, Event::CallbackEntered) => {
            next.step = Step::Callback;
            true
        }
        (Step::Callback, Event::OAuthSucceeded { email, name }) => {
            info!(%email, "Mailbox connected");
            next.profile.record_connection(email, name);
            next.last_error = None;
            next.step = Step::Dashboard;
            effects.push(Effect::ReplaceLocation("/".to_string()));
            true
        }
        (Step::Callback, Event::OAuthFailed { reason }) => {
            warn!(%reason, "Authorization failed");
            next.last_error = Some(reason);
            next.step = Step::Connect;
            effects.push(Effect::ReplaceLocation("/".to_string()));
            true
        }
        (Step::Dashboard, Event::OpenSettings) => {
            next.step = Step::Settings;
            true
        }
        (Step::Settings, Event::EditRules) => {
            next.step = Step::EditRules;
            true
        }
        (Step::Settings, Event::ChangePersona) => {
            next.profile.reset_persona();
            next.step = Step::Identity;
            true
        }
        (_, Event::Logout) => {
            next.profile.reset();
            next.last_error = None;
            next.step = Step::Welcome;
            true
        }
        (_, Event::LanguageChanged(language)) => {
            next.language = language;
            true
        }
        (step, event) => {
            debug!(?step, ?event, "Event does not apply to current step");
            false
        }
    };

    if applied && next.step != state.step {
        info!(from = ?state.step, to = ?next.step, "Step changed");
    }

    Transition {
        state: next,
        effects,
        applied,
    }
}
