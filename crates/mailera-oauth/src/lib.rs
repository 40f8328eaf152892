//! # mailera-oauth
//!
//! `OAuth2` mailbox authorization for the Mailera triage client.
//!
//! ## Features
//!
//! - **Authorization request**: provider authorize URL with a CSRF `state`
//! - **Redirect callback**: a one-shot state machine that reads the redirect,
//!   trades the authorization code with the backend exchange service and
//!   reports success or failure upward
//! - **Provider configurations**: Microsoft (Outlook) and Google presets
//!
//! The code-for-token exchange happens on the backend. This crate only posts
//! `{ code, redirect_uri }` to it and reads back the mailbox identity.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailera_oauth::{CallbackHandler, HttpExchange, MemoryLocation};
//! use tokio::sync::mpsc;
//!
//! let exchange = HttpExchange::new(endpoint);
//! let mut handler = CallbackHandler::new(exchange, "https://app.example/callback");
//! let mut location = MemoryLocation::new("/callback?code=abc123");
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! handler.handle(&mut location, tx).await;
//!
//! // Success arrives after the display delay, failures immediately.
//! let result = rx.recv().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod callback;
mod error;
pub mod flow;
pub mod provider;

pub use callback::{
    CallbackHandler, CallbackListener, CallbackParams, CallbackResult, CallbackStatus,
    ExchangeRequest, ExchangeResponse, FailureKind, HttpExchange, Location, MemoryLocation,
    TokenExchange,
};
pub use error::{Error, Result};
pub use flow::{CsrfState, OAuthClient};
pub use provider::Provider;
