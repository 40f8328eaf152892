//! Upward notification of callback results.

use tokio::sync::mpsc::UnboundedSender;

use super::status::CallbackResult;

/// Receives the single result of a callback.
///
/// `on_error` is called synchronously with the failure transition.
/// `on_success` is called from a scheduled task after the display delay, so
/// implementors must be `Send + 'static`.
pub trait CallbackListener: Send + 'static {
    /// Mailbox connected.
    fn on_success(&self, email: String, name: String);

    /// Authorization failed.
    fn on_error(&self, reason: String);
}

impl CallbackListener for UnboundedSender<CallbackResult> {
    fn on_success(&self, email: String, name: String) {
        if self.send(CallbackResult::Success { email, name }).is_err() {
            tracing::debug!("Callback result dropped, receiver gone");
        }
    }

    fn on_error(&self, reason: String) {
        if self.send(CallbackResult::Failure { reason }).is_err() {
            tracing::debug!("Callback result dropped, receiver gone");
        }
    }
}
