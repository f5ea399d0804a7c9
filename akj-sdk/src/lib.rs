//! Wire types and HTTP client for the AKJ savings-scheme payment backend.
//!
//! The `objects` module mirrors the backend's JSON contracts. The HTTP client
//! lives behind the `client` feature so crates that only need the types do
//! not pull in `reqwest`.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;

/// Production backend serving the payment endpoints.
pub const DEFAULT_BASE_URL: &str = "https://akj.brightechsoftware.com";
