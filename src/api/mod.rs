//! HTTP access to the CultBrawl backend.
//!
//! [`ApiClient`] is the only way requests reach the backend. Every call runs
//! through the [`Interceptor`] (bearer token in, error translation out) and
//! resolves to either the decoded response body or an [`ApiError`].

mod client;
pub mod error;
mod interceptor;

pub use client::ApiClient;
pub use error::{translate, ApiError, Failure};
pub use interceptor::Interceptor;
