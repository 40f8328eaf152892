//! The one-shot callback state machine.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::exchange::{ExchangeRequest, TokenExchange};
use super::listener::CallbackListener;
use super::location::Location;
use super::params::CallbackParams;
use super::status::{CallbackStatus, FailureKind};
use crate::flow::CsrfState;

/// Reason reported when the redirect carries no code.
pub const NO_CODE_REASON: &str = "No authorization code";
/// Reason reported when the exchange service fails.
pub const EXCHANGE_FAILED_REASON: &str = "Registration failed";
/// Reason reported when the echoed `state` does not match.
pub const STATE_MISMATCH_REASON: &str = "State mismatch";
/// Mailbox used when the exchange response omits `email`.
pub const PLACEHOLDER_EMAIL: &str = "user@outlook.com";
/// Name used when the exchange response omits `name`.
pub const PLACEHOLDER_NAME: &str = "User";
/// How long the success state is shown before it is reported.
pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_millis(1500);

/// Success notification waiting out the display delay. Aborted on drop.
#[derive(Debug)]
struct PendingNotification(JoinHandle<()>);

impl Drop for PendingNotification {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Handles one redirect navigation.
///
/// Create one handler per navigation. [`handle`](Self::handle) runs at most
/// once; later calls return the current status without touching the network.
/// Dropping the handler (or calling [`cancel`](Self::cancel)) before the
/// success delay elapses withdraws the success notification.
#[derive(Debug)]
pub struct CallbackHandler<E> {
    exchange: E,
    redirect_uri: String,
    success_delay: Duration,
    expected_state: Option<CsrfState>,
    status: CallbackStatus,
    entered: bool,
    pending: Option<PendingNotification>,
}

impl<E: TokenExchange> CallbackHandler<E> {
    /// Handler posting codes to `exchange` together with `redirect_uri`.
    #[must_use]
    pub fn new(exchange: E, redirect_uri: impl Into<String>) -> Self {
        Self {
            exchange,
            redirect_uri: redirect_uri.into(),
            success_delay: DEFAULT_SUCCESS_DELAY,
            expected_state: None,
            status: CallbackStatus::Loading,
            entered: false,
            pending: None,
        }
    }

    /// Overrides the success display delay.
    #[must_use]
    pub const fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay;
        self
    }

    /// Requires the redirect to echo `state`.
    #[must_use]
    pub fn with_expected_state(mut self, state: CsrfState) -> Self {
        self.expected_state = Some(state);
        self
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &CallbackStatus {
        &self.status
    }

    /// Returns true while a success notification is waiting to fire.
    #[must_use]
    pub fn has_pending_notification(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.0.is_finished())
    }

    /// Withdraws a pending success notification.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("Pending success notification cancelled");
        }
    }

    /// Processes the redirect found at `location`.
    ///
    /// Failures are reported to `listener` before this returns. Success is
    /// reported from a spawned task once the success delay has elapsed.
    pub async fn handle<L, N>(&mut self, location: &mut N, listener: L) -> CallbackStatus
    where
        L: CallbackListener,
        N: Location + ?Sized,
    {
        if self.entered {
            warn!("Callback already handled for this navigation, ignoring");
            return self.status.clone();
        }
        self.entered = true;

        let params = CallbackParams::parse(&location.current());

        if let Some(reason) = params.error_reason() {
            let reason = reason.to_string();
            self.fail(location, &params, &listener, FailureKind::Denied, reason);
            return self.status.clone();
        }

        if let Some(expected) = &self.expected_state
            && !expected.matches(params.state())
        {
            self.fail(
                location,
                &params,
                &listener,
                FailureKind::StateMismatch,
                STATE_MISMATCH_REASON.to_string(),
            );
            return self.status.clone();
        }

        let Some(code) = params.code() else {
            self.fail(
                location,
                &params,
                &listener,
                FailureKind::MissingCode,
                NO_CODE_REASON.to_string(),
            );
            return self.status.clone();
        };

        self.status = CallbackStatus::Exchanging;
        info!("Exchanging authorization code");

        let request = ExchangeRequest {
            code: code.to_string(),
            redirect_uri: self.redirect_uri.clone(),
        };

        match self.exchange.exchange(&request).await {
            Ok(response) => {
                // The code is spent; make sure a reload cannot replay it.
                location.replace(params.path());

                let email = response
                    .email
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_EMAIL.to_string());
                let name = response
                    .name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

                info!(%email, "Authorization code exchanged");
                self.status = CallbackStatus::Success {
                    email: email.clone(),
                    name: name.clone(),
                };
                self.schedule_success(listener, email, name);
            }
            Err(e) => {
                warn!(error = %e, "Code exchange failed");
                self.fail(
                    location,
                    &params,
                    &listener,
                    FailureKind::Exchange,
                    EXCHANGE_FAILED_REASON.to_string(),
                );
            }
        }

        self.status.clone()
    }

    fn fail<L, N>(
        &mut self,
        location: &mut N,
        params: &CallbackParams,
        listener: &L,
        kind: FailureKind,
        reason: String,
    ) where
        L: CallbackListener,
        N: Location + ?Sized,
    {
        warn!(?kind, %reason, "Callback failed");
        location.replace(params.path());
        self.status = CallbackStatus::Failure {
            kind,
            reason: reason.clone(),
        };
        listener.on_error(reason);
    }

    fn schedule_success<L: CallbackListener>(&mut self, listener: L, email: String, name: String) {
        let delay = self.success_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            listener.on_success(email, name);
        });
        self.pending = Some(PendingNotification(task));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::mpsc;

    use super::*;
    use crate::callback::exchange::ExchangeResponse;
    use crate::callback::location::MemoryLocation;
    use crate::callback::status::CallbackResult;
    use crate::error::{Error, Result};

    #[derive(Clone)]
    struct MockExchange {
        calls: Arc<AtomicUsize>,
        last_request: Arc<std::sync::Mutex<Option<ExchangeRequest>>>,
        status: u16,
        response: ExchangeResponse,
    }

    impl MockExchange {
        fn ok(email: Option<&str>, name: Option<&str>) -> Self {
            Self {
                calls: Arc::default(),
                last_request: Arc::default(),
                status: 200,
                response: ExchangeResponse {
                    email: email.map(String::from),
                    name: name.map(String::from),
                },
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                status,
                ..Self::ok(None, None)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenExchange for MockExchange {
        async fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if self.status >= 300 {
                return Err(Error::Exchange {
                    status: reqwest::StatusCode::from_u16(self.status).unwrap(),
                });
            }
            Ok(self.response.clone())
        }
    }

    const REDIRECT: &str = "https://mailera.example/callback";

    fn handler(exchange: &MockExchange) -> CallbackHandler<MockExchange> {
        CallbackHandler::new(exchange.clone(), REDIRECT)
    }

    #[tokio::test]
    async fn test_provider_error_reports_description() {
        let exchange = MockExchange::ok(None, None);
        let mut handler = handler(&exchange);
        let mut location =
            MemoryLocation::new("/callback?error=access_denied&error_description=User%20cancelled");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let status = handler.handle(&mut location, tx).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackResult::Failure {
                reason: "User cancelled".into()
            }
        );
        assert!(matches!(
            status,
            CallbackStatus::Failure {
                kind: FailureKind::Denied,
                ..
            }
        ));
        assert_eq!(exchange.calls(), 0);
        assert_eq!(location.current(), "/callback");
    }

    #[tokio::test]
    async fn test_provider_error_without_description() {
        let exchange = MockExchange::ok(None, None);
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?error=access_denied");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackResult::Failure {
                reason: "access_denied".into()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_code() {
        let exchange = MockExchange::ok(None, None);
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackResult::Failure {
                reason: NO_CODE_REASON.into()
            }
        );
        assert_eq!(exchange.calls(), 0);
        assert_eq!(location.replacements().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_reported_after_delay() {
        let exchange = MockExchange::ok(Some("a@b.com"), Some("A"));
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?code=abc123");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let status = handler.handle(&mut location, tx).await;

        assert_eq!(
            status,
            CallbackStatus::Success {
                email: "a@b.com".into(),
                name: "A".into()
            }
        );
        // Query scrubbed before the delayed notification.
        assert_eq!(location.current(), "/callback");
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(handler.has_pending_notification());

        assert_eq!(
            rx.recv().await.unwrap(),
            CallbackResult::Success {
                email: "a@b.com".into(),
                name: "A".into()
            }
        );
        assert!(rx.recv().await.is_none());
        assert_eq!(exchange.calls(), 1);

        let request = exchange.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.code, "abc123");
        assert_eq!(request.redirect_uri, REDIRECT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_fields_use_placeholders() {
        let exchange = MockExchange::ok(None, Some(""));
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?code=abc123");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;

        assert_eq!(
            rx.recv().await.unwrap(),
            CallbackResult::Success {
                email: PLACEHOLDER_EMAIL.into(),
                name: PLACEHOLDER_NAME.into()
            }
        );
    }

    #[tokio::test]
    async fn test_exchange_failure() {
        let exchange = MockExchange::failing(500);
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?code=abc123");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let status = handler.handle(&mut location, tx).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackResult::Failure {
                reason: EXCHANGE_FAILED_REASON.into()
            }
        );
        // Sender dropped with no success queued.
        assert!(rx.recv().await.is_none());
        assert_eq!(status.message(), "Failed to complete registration. Please try again.");
        assert_eq!(location.current(), "/callback");
        assert!(!handler.has_pending_notification());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_entry_is_ignored() {
        let exchange = MockExchange::ok(Some("a@b.com"), Some("A"));
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?code=abc123");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx.clone()).await;
        let mut replay = MemoryLocation::new("/callback?code=abc123");
        let status = handler.handle(&mut replay, tx).await;

        assert!(matches!(status, CallbackStatus::Success { .. }));
        assert_eq!(exchange.calls(), 1);
        assert!(replay.replacements().is_empty());

        assert!(matches!(
            rx.recv().await.unwrap(),
            CallbackResult::Success { .. }
        ));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_withdraws_success() {
        let exchange = MockExchange::ok(Some("a@b.com"), Some("A"));
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?code=abc123");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;
        handler.cancel();

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_withdraws_success() {
        let exchange = MockExchange::ok(Some("a@b.com"), Some("A"));
        let mut handler = handler(&exchange);
        let mut location = MemoryLocation::new("/callback?code=abc123");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;
        drop(handler);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_state_mismatch_rejected_before_exchange() {
        let exchange = MockExchange::ok(Some("a@b.com"), None);
        let mut handler =
            handler(&exchange).with_expected_state(CsrfState::from("expected".to_string()));
        let mut location = MemoryLocation::new("/callback?code=abc123&state=forged");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;

        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackResult::Failure {
                reason: STATE_MISMATCH_REASON.into()
            }
        );
        assert_eq!(exchange.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_matching_state_accepted() {
        let exchange = MockExchange::ok(Some("a@b.com"), None);
        let mut handler = handler(&exchange)
            .with_expected_state(CsrfState::from("s1".to_string()))
            .with_success_delay(Duration::ZERO);
        let mut location = MemoryLocation::new("/callback?code=abc123&state=s1");
        let (tx, mut rx) = mpsc::unbounded_channel();

        handler.handle(&mut location, tx).await;

        assert!(matches!(
            rx.recv().await.unwrap(),
            CallbackResult::Success { .. }
        ));
        assert_eq!(exchange.calls(), 1);
    }
}
