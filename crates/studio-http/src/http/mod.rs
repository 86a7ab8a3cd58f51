//! HTTP transport for the studio backend.

pub(crate) mod client;
pub mod endpoints;
mod request;

pub(crate) use client::HttpClient;
pub use request::{ApiRequest, ApiResponse};
pub use reqwest::Method;
