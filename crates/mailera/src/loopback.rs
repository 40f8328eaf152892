//! Local listener for `http://localhost` redirect URIs.
//!
//! The browser lands on the callback path with the code in the query. The
//! listener answers with `303 See Other` to the scrubbed location so the
//! code never stays in the address bar, then serves one status page there.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, bail};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use mailera_oauth::CallbackStatus;
use tokio::net::TcpListener;
use tokio::sync::{Notify, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// How long to wait for the browser to follow the redirect.
const FOLLOW_UP_TIMEOUT: Duration = Duration::from_secs(5);
/// How long open connections get to drain once the page is served.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Returns true if `redirect` points at this machine over plain HTTP.
pub fn is_loopback(redirect: &Url) -> bool {
    redirect.scheme() == "http"
        && matches!(
            redirect.host_str(),
            Some("localhost" | "127.0.0.1" | "[::1]")
        )
}

/// Where to send the browser and what to show it there.
#[derive(Debug, Clone)]
struct Finished {
    location: String,
    page: String,
}

#[derive(Clone)]
struct RedirectState {
    /// Taken by the first hit on the callback path.
    first: Arc<Mutex<Option<oneshot::Sender<String>>>>,
    outcome: watch::Receiver<Option<Finished>>,
    served: Arc<Notify>,
}

/// Redirect listener bound to the redirect URI's port.
///
/// Requests are served concurrently, so an idle or speculative connection
/// from the browser does not hold up the callback. Dropping the listener
/// stops the server.
pub struct Loopback {
    addr: SocketAddr,
    target: Option<oneshot::Receiver<String>>,
    outcome: watch::Sender<Option<Finished>>,
    served: Arc<Notify>,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<std::io::Result<()>>,
}

impl Loopback {
    /// Binds the host and port of `redirect` and starts serving its path.
    pub async fn bind(redirect: &Url) -> anyhow::Result<Self> {
        let port = redirect
            .port_or_known_default()
            .context("redirect URI has no port")?;
        let host = match redirect.host_str() {
            Some("localhost") | None => "127.0.0.1",
            Some(host) => host.trim_start_matches('[').trim_end_matches(']'),
        };
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("binding {host}:{port}"))?;
        let addr = listener.local_addr()?;

        let (target_tx, target_rx) = oneshot::channel();
        let (outcome_tx, outcome_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let served = Arc::new(Notify::new());

        let state = RedirectState {
            first: Arc::new(Mutex::new(Some(target_tx))),
            outcome: outcome_rx,
            served: Arc::clone(&served),
        };
        let app = Router::new()
            .route(redirect.path(), get(on_callback))
            .with_state(state);

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });
        info!(%addr, "Waiting for authorization redirect");

        Ok(Self {
            addr,
            target: Some(target_rx),
            outcome: outcome_tx,
            served,
            shutdown: Some(shutdown_tx),
            server,
        })
    }

    /// Address actually bound.
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits up to `timeout` for the browser to hit the callback path.
    ///
    /// Returns the request target (path and query). The browser is held on
    /// that request until [`Loopback::finish`] supplies the redirect.
    pub async fn wait_for_callback(&mut self, timeout: Duration) -> anyhow::Result<String> {
        let target = self
            .target
            .take()
            .context("authorization redirect already received")?;
        match tokio::time::timeout(timeout, target).await {
            Ok(Ok(target)) => {
                debug!("Authorization redirect received");
                Ok(target)
            }
            Ok(Err(_)) => bail!("redirect listener stopped before the browser returned"),
            Err(_) => bail!(
                "no authorization redirect within {} seconds",
                timeout.as_secs()
            ),
        }
    }

    /// Redirects the browser to `location`, serves `status` there, then
    /// shuts the server down.
    pub async fn finish(&mut self, location: &str, status: &CallbackStatus) {
        self.outcome.send_replace(Some(Finished {
            location: location.to_string(),
            page: status_page(status),
        }));

        if tokio::time::timeout(FOLLOW_UP_TIMEOUT, self.served.notified())
            .await
            .is_err()
        {
            debug!("Browser did not follow the redirect");
        }
        self.shutdown().await;
    }

    async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut self.server).await {
            Ok(Ok(Ok(()))) => debug!("Redirect listener stopped"),
            Ok(Ok(Err(e))) => warn!(error = %e, "Redirect listener failed"),
            Ok(Err(e)) => warn!(error = %e, "Redirect listener task failed"),
            Err(_) => {
                debug!("Connections still open, stopping listener");
                self.server.abort();
            }
        }
    }
}

impl Drop for Loopback {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn on_callback(State(state): State<RedirectState>, uri: Uri) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    let first = state.first.lock().ok().and_then(|mut slot| slot.take());
    if let Some(tx) = first {
        if tx.send(target).is_err() {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        return match wait_for_outcome(state.outcome).await {
            Some(finished) => Redirect::to(&finished.location).into_response(),
            None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        };
    }

    match wait_for_outcome(state.outcome).await {
        Some(finished) => {
            state.served.notify_one();
            Html(finished.page).into_response()
        }
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Resolves once the outcome is set; `None` if the listener went away.
async fn wait_for_outcome(mut outcome: watch::Receiver<Option<Finished>>) -> Option<Finished> {
    let finished = outcome.wait_for(Option::is_some).await.ok()?;
    finished.clone()
}

fn status_page(status: &CallbackStatus) -> String {
    format!(
        "<!doctype html><title>Mailera</title><h1>{}</h1><p>{}</p><p>You can close this window.</p>",
        escape(status.title()),
        escape(status.message())
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
