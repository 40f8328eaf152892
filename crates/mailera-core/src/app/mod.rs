//! Application state and the onboarding step machine.
//!
//! Screens never mutate shared state. They emit an [`Event`], and [`reduce`]
//! maps the current [`AppState`] and that event to the next state plus any
//! [`Effect`]s the shell must carry out.

mod reducer;
mod step;

pub use reducer::{AppState, Effect, Event, Transition, reduce};
pub use step::{CALLBACK_PATH, Step};
