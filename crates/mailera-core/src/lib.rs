//! # mailera-core
//!
//! Core logic for the Mailera email-triage client.
//!
//! This crate provides:
//! - **Priority rules** - ordered keyword buckets with forgiving edit operations
//! - **Rule editor** - an in-progress edit session with drag-and-drop between buckets
//! - **User profile** - persona, connected mailbox and the user's rule set
//! - **Application state** - the onboarding step machine driven by a pure reducer
//! - **State store** - JSON persistence of the application state
//!
//! ## Example
//!
//! ```ignore
//! use mailera_core::{AppState, Event, Persona, reduce};
//!
//! let state = AppState::default();
//! let state = reduce(&state, Event::Start).state;
//! let transition = reduce(&state, Event::PersonaSelected(Persona::Researcher));
//! assert_eq!(transition.state.step, mailera_core::Step::Tuning);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod app;
mod error;
pub mod profile;
pub mod rules;
pub mod store;

pub use app::{AppState, CALLBACK_PATH, Effect, Event, Step, Transition, reduce};
pub use error::{Error, Result};
pub use profile::{Language, Persona, UserProfile};
pub use rules::{DragSession, PriorityRule, RuleEditor, RuleId, RuleSet};
pub use store::StateStore;
