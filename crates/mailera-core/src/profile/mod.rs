//! User profile and persona models.

mod model;

pub use model::{Language, Persona, UserProfile};
