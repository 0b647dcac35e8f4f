//! campus-http - Live backend over the portal's REST API.
//!
//! [`HttpClient`] is the configured transport: base URL, timeout, default
//! headers and a bearer token read from the session on every call.
//! [`HttpBackend`] maps each portal operation onto it.

mod backend;
mod client;
mod endpoints;

pub use backend::HttpBackend;
pub use client::{ApiResponse, ClientConfig, DEFAULT_TIMEOUT, HttpClient, Request, RequestOptions};
pub use reqwest::Method;
pub use reqwest::header;
