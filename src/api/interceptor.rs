//! Cross-cutting request/response handling for backend calls.

use reqwest::RequestBuilder;
use std::sync::Arc;

use super::error::{translate, ApiError, Failure};
use crate::session::SessionStore;
use crate::ui::{Notifier, Toast};

/// Attaches the bearer token on the way out and translates failures on the way back.
pub struct Interceptor {
    session: Arc<SessionStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Interceptor {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            notifier: None,
        }
    }

    /// Emit a toast for every failed request.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Request phase: add `Authorization: Bearer <token>` from the persisted record.
    ///
    /// Reads storage rather than memory so that a token written by a login in
    /// another handle is picked up. If the record cannot be read the request
    /// goes out anonymously; the endpoint decides whether that is acceptable.
    pub async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.read_stored().await {
            Ok(Some(stored)) => match stored.token() {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
            Ok(None) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read session for auth header");
                request
            }
        }
    }

    /// Response phase: translate a failure, expiring the session on 403.
    pub async fn on_failure(&self, failure: Failure) -> ApiError {
        let error = translate(&failure);

        match &error {
            ApiError::Forbidden { message } => {
                tracing::warn!(%message, "Request forbidden, ending session");
                self.session.invalidate().await;
            }
            ApiError::Server { status, message } => {
                tracing::debug!(status = *status, %message, "Server rejected request");
            }
            other => {
                tracing::debug!(error = %other, "Request failed");
            }
        }

        if let Some(notifier) = &self.notifier {
            notifier.notify(Toast::error(error.title(), error.to_string()));
        }

        error
    }
}
