//! Runs one command against the persisted application state.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, bail};
use mailera_core::{AppState, CALLBACK_PATH, Effect, Event, StateStore, Step, reduce};
use mailera_oauth::{
    CallbackHandler, CallbackParams, CallbackResult, CallbackStatus, CsrfState, HttpExchange,
    Location, MemoryLocation, OAuthClient, Provider,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::cli::Command;
use crate::loopback::{self, Loopback};
use crate::render;
use crate::settings::Settings;
use crate::tuning::{self, Outcome};

const RESET_WARNING: &str =
    "Changing identity will reset your default classification rules. Are you sure?";

/// How long `connect` waits for the browser to come back.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// A callback that has been processed but whose result has not been applied.
struct PendingCallback {
    handler: CallbackHandler<HttpExchange>,
    results: mpsc::UnboundedReceiver<CallbackResult>,
    status: CallbackStatus,
    location: MemoryLocation,
}

/// State, storage and settings for one invocation.
pub struct Shell {
    store: StateStore,
    settings: Settings,
    state: AppState,
}

impl Shell {
    /// Loads the persisted state.
    pub async fn open(store: StateStore, settings: Settings) -> anyhow::Result<Self> {
        let state = store
            .load()
            .await
            .with_context(|| format!("loading {}", store.path().display()))?;
        Ok(Self {
            store,
            settings,
            state,
        })
    }

    /// Current application state.
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Executes `command`, saves the state and shows the resulting screen.
    pub async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Status => {
                render::screen(&mut io::stdout().lock(), &self.state)?;
                return Ok(());
            }
            Command::Personas => {
                render::personas(&mut io::stdout().lock(), self.state.profile.identity)?;
                return Ok(());
            }
            Command::Start => {
                self.dispatch(Event::Start)?;
            }
            Command::Persona { persona } => {
                self.dispatch(Event::PersonaSelected(persona))?;
            }
            Command::Tune => self.tune().await?,
            Command::Back => {
                self.dispatch(Event::Back)?;
            }
            Command::Connect { no_browser } => self.connect(no_browser).await?,
            Command::Callback { uri, expect_state } => {
                let pending = self
                    .begin_callback(&uri, expect_state.map(CsrfState::from))
                    .await?;
                self.finish_callback(pending).await?;
            }
            Command::Settings => {
                self.dispatch(Event::OpenSettings)?;
            }
            Command::EditRules => {
                self.dispatch(Event::EditRules)?;
            }
            Command::ChangePersona { yes } => {
                if self.state.step == Step::Settings && !yes && !confirm(RESET_WARNING).await? {
                    println!("Cancelled.");
                    return Ok(());
                }
                self.dispatch(Event::ChangePersona)?;
            }
            Command::Logout => {
                self.dispatch(Event::Logout)?;
            }
            Command::Language { language } => {
                self.dispatch(Event::LanguageChanged(language))?;
            }
        }

        self.save().await?;
        render::screen(&mut io::stdout().lock(), &self.state)?;
        Ok(())
    }

    /// Reduces `event`, failing if it does not apply to the current step.
    fn dispatch(&mut self, event: Event) -> anyhow::Result<Vec<Effect>> {
        let transition = reduce(&self.state, event);
        if !transition.applied {
            bail!(
                "that action is not available on the {} screen",
                self.state.step.display_name()
            );
        }
        self.state = transition.state;
        Ok(transition.effects)
    }

    async fn save(&self) -> anyhow::Result<()> {
        self.store
            .save(&self.state)
            .await
            .with_context(|| format!("saving {}", self.store.path().display()))
    }

    async fn tune(&mut self) -> anyhow::Result<()> {
        if !self.state.step.is_tuning() {
            bail!(
                "rules can only be edited while tuning, not on the {} screen",
                self.state.step.display_name()
            );
        }

        let rules = self.state.profile.rules.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            tuning::run_session(rules, io::stdin().lock(), io::stdout())
        })
        .await??;

        match outcome {
            Outcome::Saved(rules) => self.dispatch(Event::TuningCompleted(rules))?,
            Outcome::Back => self.dispatch(Event::Back)?,
        };
        Ok(())
    }

    async fn connect(&mut self, no_browser: bool) -> anyhow::Result<()> {
        let effects = self.dispatch(Event::ConnectRequested)?;
        self.save().await?;
        if effects.contains(&Effect::BeginAuthorization) {
            self.authorize(no_browser).await?;
        }
        Ok(())
    }

    async fn authorize(&mut self, no_browser: bool) -> anyhow::Result<()> {
        if self.settings.client_id.is_empty() {
            bail!("no client ID configured; set MAILERA_CLIENT_ID or client_id in settings.json");
        }
        let provider = Provider::by_name(&self.settings.provider)?;
        provider.validate()?;
        let redirect = Url::parse(&self.settings.redirect_uri)
            .with_context(|| format!("invalid redirect URI {}", self.settings.redirect_uri))?;
        if Step::initial_for_path(redirect.path()) != Step::Callback {
            bail!("redirect URI {redirect} must use the {CALLBACK_PATH} path");
        }

        let client = OAuthClient::new(&self.settings.client_id, redirect.as_str(), provider);
        let csrf = CsrfState::generate();
        let url = client.authorization_url(None, Some(csrf.as_str()));

        // Bind before the browser can possibly redirect back.
        let listener = if loopback::is_loopback(&redirect) {
            Some(Loopback::bind(&redirect).await?)
        } else {
            None
        };

        println!("Open this address to authorize:\n\n  {url}\n");
        if !no_browser && let Err(e) = opener::open(url.as_str()) {
            warn!(error = %e, "Could not open a browser");
        }

        let Some(mut listener) = listener else {
            println!(
                "After approving access, copy the address you were sent to and run:\n\n  \
                 mailera callback '<address>' --expect-state {}\n",
                csrf.as_str()
            );
            return Ok(());
        };

        let target = listener
            .wait_for_callback(CALLBACK_TIMEOUT)
            .await
            .context("authorization not completed; run `mailera connect` to try again")?;
        let pending = self.begin_callback(&target, Some(csrf)).await?;
        listener
            .finish(&pending.location.current(), &pending.status)
            .await;
        self.finish_callback(pending).await
    }

    /// Enters the callback step and runs the handler over `uri`.
    ///
    /// Only the callback path is accepted; any other address is rejected
    /// before the state changes or the exchange service is contacted.
    async fn begin_callback(
        &mut self,
        uri: &str,
        expected_state: Option<CsrfState>,
    ) -> anyhow::Result<PendingCallback> {
        let params = CallbackParams::parse(uri);
        if Step::initial_for_path(params.path()) != Step::Callback {
            bail!(
                "{} is not the callback address ({CALLBACK_PATH})",
                params.path()
            );
        }
        self.dispatch(Event::CallbackEntered)?;
        render::callback(&mut io::stdout().lock(), &CallbackStatus::Loading)?;

        let exchange = HttpExchange::from_url(&self.settings.exchange_url)
            .with_context(|| format!("invalid exchange URL {}", self.settings.exchange_url))?;
        let mut handler = CallbackHandler::new(exchange, self.settings.redirect_uri.clone())
            .with_success_delay(self.settings.success_delay());
        if let Some(state) = expected_state {
            handler = handler.with_expected_state(state);
        }

        let mut location = MemoryLocation::new(uri);
        let (tx, results) = mpsc::unbounded_channel();
        let status = handler.handle(&mut location, tx).await;

        let mut out = io::stdout().lock();
        writeln!(out)?;
        render::callback(&mut out, &status)?;

        Ok(PendingCallback {
            handler,
            results,
            status,
            location,
        })
    }

    /// Waits for the handler's notification and applies it.
    async fn finish_callback(&mut self, mut pending: PendingCallback) -> anyhow::Result<()> {
        debug!(
            delayed = pending.handler.has_pending_notification(),
            "Waiting for callback result"
        );
        let result = pending
            .results
            .recv()
            .await
            .context("callback finished without reporting a result")?;

        let event = match result {
            CallbackResult::Success { email, name } => Event::OAuthSucceeded { email, name },
            CallbackResult::Failure { reason } => Event::OAuthFailed { reason },
        };
        for effect in self.dispatch(event)? {
            if let Effect::ReplaceLocation(path) = effect {
                debug!(%path, "Location replaced");
            }
        }
        println!();
        Ok(())
    }
}

async fn confirm(question: &'static str) -> anyhow::Result<bool> {
    let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
        print!("{question} [y/N] ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line)
    })
    .await??;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
