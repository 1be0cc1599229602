//! Error taxonomy for backend calls.
//!
//! Every transport failure is classified once ([`Failure`]) and translated into
//! an [`ApiError`] whose `Display` output is the message shown to the user.
//! Callers never see `reqwest::Error`.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Shown when the server rejected a request without saying why
pub const DEFAULT_SERVER_MESSAGE: &str = "Request failed.";
/// Shown when the request was sent but nothing came back
pub const NO_RESPONSE_MESSAGE: &str = "No response from server.";
/// Shown when the request could not be built or sent at all
pub const UNEXPECTED_MESSAGE: &str = "Unexpected error.";

/// Error returned by every client and service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 403: the session is no longer valid and has been cleared
    #[error("{message}")]
    Forbidden { message: String },

    /// Any other error status from the backend
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Connection refused, timeout, or the connection dropped mid-response
    #[error("No response from server.")]
    NoResponse,

    /// The request could not be constructed or sent
    #[error("Unexpected error.")]
    Unexpected,

    /// Rejected locally before any request was made
    #[error("{0}")]
    Validation(String),

    /// The backend answered successfully but with an unusable payload
    #[error("{0}")]
    InvalidResponse(String),

    /// Logged in, but the session could not be written to storage
    #[error("Could not save the session: {0}")]
    SessionNotSaved(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Forbidden { .. } => Some(StatusCode::FORBIDDEN.as_u16()),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// Short toast title for this kind of failure
    pub fn title(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "Session expired",
            Self::Server { .. } => "Request failed",
            Self::NoResponse => "Network error",
            Self::Unexpected => "Error",
            Self::Validation(_) => "Invalid input",
            Self::InvalidResponse(_) => "Unexpected response",
            Self::SessionNotSaved(_) => "Login failed",
        }
    }
}

/// How a request failed, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The server responded with an error status
    Status { status: StatusCode, body: Vec<u8> },
    /// The request went out but no response came back
    NoResponse,
    /// The request never left the client
    Construction,
}

impl Failure {
    /// Classify a transport error.
    ///
    /// Builder errors (bad URL, invalid header value) mean nothing was sent.
    /// Anything else happened after the request was handed to the transport.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            Failure::Construction
        } else {
            Failure::NoResponse
        }
    }
}

/// Error payload the backend sends with error statuses.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Message { message: String },
    Error {
        #[serde(alias = "Error")]
        error: String,
    },
    Nested { error: NestedError },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: String,
}

/// Extract the server-provided message from an error body, if any.
pub fn server_message(body: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(body).ok()?;
    let message = match payload {
        ErrorPayload::Message { message } => message,
        ErrorPayload::Error { error } => error,
        ErrorPayload::Nested { error } => error.message,
    };
    let message = message.trim().to_string();
    (!message.is_empty()).then_some(message)
}

/// Translate a classified failure into the error surfaced to callers.
///
/// Pure: session invalidation on 403 is done by the interceptor.
pub fn translate(failure: &Failure) -> ApiError {
    match failure {
        Failure::Status { status, body } => {
            let message =
                server_message(body).unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string());
            if *status == StatusCode::FORBIDDEN {
                ApiError::Forbidden { message }
            } else {
                ApiError::Server {
                    status: status.as_u16(),
                    message,
                }
            }
        }
        Failure::NoResponse => ApiError::NoResponse,
        Failure::Construction => ApiError::Unexpected,
    }
}
