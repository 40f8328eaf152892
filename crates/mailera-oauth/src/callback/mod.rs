//! `OAuth` redirect callback handling.
//!
//! The provider redirects the browser back to the callback path with either
//! `code` or `error`/`error_description` in the query. [`CallbackHandler`]
//! turns that redirect into exactly one [`CallbackResult`]:
//!
//! ```text
//! Loading ── error param ─────────────────────────▶ Failure
//!    │ ─── no code ───────────────────────────────▶ Failure
//!    └──▶ Exchanging ── non-2xx / transport error ─▶ Failure
//!              └── 2xx ───────────────────────────▶ Success (reported after a delay)
//! ```
//!
//! The query string is scrubbed from the [`Location`] on every terminal
//! transition. Authorization codes are single use.

mod exchange;
mod handler;
mod listener;
mod location;
mod params;
mod status;

pub use exchange::{ExchangeRequest, ExchangeResponse, HttpExchange, TokenExchange};
pub use handler::{
    CallbackHandler, DEFAULT_SUCCESS_DELAY, EXCHANGE_FAILED_REASON, NO_CODE_REASON,
    PLACEHOLDER_EMAIL, PLACEHOLDER_NAME, STATE_MISMATCH_REASON,
};
pub use listener::CallbackListener;
pub use location::{Location, MemoryLocation};
pub use params::CallbackParams;
pub use status::{CallbackResult, CallbackStatus, FailureKind};
