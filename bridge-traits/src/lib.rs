//! # Host Bridge Traits
//!
//! Transport abstraction the resolution core is written against.
//!
//! ## Overview
//!
//! The core never talks to the network directly. Every call to the metadata
//! provider or to a lyrics source goes through [`HttpClient`](http::HttpClient),
//! which each host supplies. Desktop hosts get a reqwest-backed adapter from
//! `bridge-desktop`; tests inject mocks or recording fakes.
//!
//! ## Error Handling
//!
//! All bridge operations report failures through [`BridgeError`](error::BridgeError).
//! Implementations should:
//!
//! - Convert transport-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Leave non-2xx responses to the caller (they are returned, not raised)
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` so a single client can serve many
//! concurrent resolution requests.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;

pub use error::BridgeError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
