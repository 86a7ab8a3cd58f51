//! studio-store - File-backed session storage.
//!
//! Persists the session the way the site keeps it in browser local storage:
//! one JSON object keyed by `accessToken`, `refreshToken` and `user`.

mod store;

pub use store::FileTokenStore;
