//! Callback states and results.

/// Why a callback ended in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Provider returned `error` (user denied or provider-side problem).
    Denied,
    /// Redirect carried no authorization code.
    MissingCode,
    /// Echoed `state` did not match the one sent.
    StateMismatch,
    /// Exchange service failed (network or non-2xx).
    Exchange,
}

/// Where the callback handler is in its one-shot flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackStatus {
    /// Reading the redirect.
    Loading,
    /// Waiting on the exchange service.
    Exchanging,
    /// Mailbox identity established.
    Success {
        /// Authenticated mailbox.
        email: String,
        /// Account holder's name.
        name: String,
    },
    /// Flow aborted.
    Failure {
        /// Failure category.
        kind: FailureKind,
        /// Reason reported to the application.
        reason: String,
    },
}

impl CallbackStatus {
    /// Returns true for `Success` and `Failure`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failure { .. })
    }

    /// Heading shown for this status.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Loading | Self::Exchanging => "Connecting...",
            Self::Success { .. } => "Connected!",
            Self::Failure { .. } => "Connection Failed",
        }
    }

    /// Message shown under the heading.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Loading => "Processing authorization...",
            Self::Exchanging => "Exchanging authorization code...",
            Self::Success { .. } => "Successfully connected!",
            Self::Failure { kind, reason } => match kind {
                FailureKind::Denied => reason.as_str(),
                FailureKind::MissingCode => "No authorization code received",
                FailureKind::StateMismatch => "Authorization response did not match this request",
                FailureKind::Exchange => "Failed to complete registration. Please try again.",
            },
        }
    }
}

/// Outcome reported to the application, produced once per callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    /// Mailbox connected.
    Success {
        /// Authenticated mailbox.
        email: String,
        /// Account holder's name.
        name: String,
    },
    /// Authorization failed.
    Failure {
        /// Why.
        reason: String,
    },
}
