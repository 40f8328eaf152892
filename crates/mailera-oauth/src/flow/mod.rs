//! Building the authorization request.

mod code;
mod state;

pub use code::OAuthClient;
pub use state::CsrfState;
