//! Thin wrapper over `reqwest` with a fixed base URL and timeout.

use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, Failure};
use super::interceptor::Interceptor;
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Backend client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    interceptor: Arc<Interceptor>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, interceptor: Interceptor) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("cultbrawl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interceptor: Arc::new(interceptor),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.interceptor.session()
    }

    /// Resolve `path` against the base URL. Absolute URLs are used as given.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    /// POST a multipart form (file uploads). The content type, including the
    /// boundary, is set from the form.
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path).multipart(form))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = self.interceptor.authorize(request).await;

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Transport error");
                return Err(self
                    .interceptor
                    .on_failure(Failure::from_transport(&e))
                    .await);
            }
        };

        let status = response.status();
        let url = response.url().clone();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, %url, "Failed to read response body");
                return Err(self.interceptor.on_failure(Failure::NoResponse).await);
            }
        };

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "Response");

        if !status.is_success() {
            return Err(self
                .interceptor
                .on_failure(Failure::Status {
                    status,
                    body: body.to_vec(),
                })
                .await);
        }

        decode(&body).map_err(|e| {
            tracing::warn!(error = %e, %url, "Failed to parse response");
            ApiError::invalid_response("The server sent a response that could not be read.")
        })
    }
}

/// Decode a success body; an empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(body)
    }
}
