//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mailera_core::{Language, Persona};

/// Email triage onboarding and dashboard.
#[derive(Debug, Parser)]
#[command(name = "mailera", version, about)]
pub struct Cli {
    /// Where the application state is persisted.
    #[arg(long, global = true, env = "MAILERA_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Settings file to read instead of the default location.
    #[arg(long, global = true, env = "MAILERA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One user action per invocation.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the current screen.
    Status,
    /// Leave the welcome screen.
    Start,
    /// List the available personas.
    Personas,
    /// Pick a persona.
    Persona {
        /// Persona tag, e.g. `overachiever` or `laying-flat`.
        persona: Persona,
    },
    /// Open the interactive rule editor.
    Tune,
    /// Go back one screen.
    Back,
    /// Authorize mailbox access.
    Connect {
        /// Print the authorization URL without opening a browser.
        #[arg(long)]
        no_browser: bool,
    },
    /// Process an `OAuth` redirect pasted from the browser.
    Callback {
        /// Redirect URL or path and query, e.g. `/callback?code=...`.
        uri: String,
        /// Reject the redirect unless its `state` equals this value.
        #[arg(long)]
        expect_state: Option<String>,
    },
    /// Open settings from the dashboard.
    Settings,
    /// Edit the classification rules from settings.
    EditRules,
    /// Pick a new persona, resetting the current one.
    ChangePersona {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Forget the profile and start over.
    Logout,
    /// Switch interface language (`en`, `zh-cn`, `zh-tw`).
    Language {
        /// Language code.
        language: Language,
    },
}
