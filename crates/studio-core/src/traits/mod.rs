//! Seams between the client and its embedding application.

mod redirect;
mod token_store;

pub use redirect::{LoginRedirect, NoopRedirect};
pub use token_store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenStore, USER_KEY};
