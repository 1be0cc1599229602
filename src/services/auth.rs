//! Login, registration and logout.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::models::{AuthResponse, Credentials, User};

const DEFAULT_LOGIN_MESSAGE: &str = "Logged in.";
const DEFAULT_REGISTER_MESSAGE: &str = "Account created.";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// Message from the backend, or a default
    pub message: String,
    /// The new session, when the backend issued a token
    pub user: Option<Arc<User>>,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Log in and establish the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Please fill in all fields."));
        }

        let response: AuthResponse = self
            .api
            .post("/auth/login", &Credentials { username, password })
            .await?;

        let message = response
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGIN_MESSAGE.to_string());

        let user = self.start_session(username, response).await?;
        match user {
            Some(user) => Ok(AuthOutcome {
                message,
                user: Some(user),
            }),
            None => Err(ApiError::invalid_response(
                "The server did not return a session token.",
            )),
        }
    }

    /// Create an account. If the backend hands back a token the new user is
    /// logged in straight away; otherwise they still have to log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, ApiError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Please fill in all fields."));
        }
        if password != confirm_password {
            return Err(ApiError::validation("Passwords do not match."));
        }

        let response: AuthResponse = self
            .api
            .post("/auth/register", &Credentials { username, password })
            .await?;

        let message = response
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_REGISTER_MESSAGE.to_string());
        let user = self.start_session(username, response).await?;

        Ok(AuthOutcome { message, user })
    }

    /// End the session and return to the login screen.
    pub async fn logout(&self) {
        tracing::info!("Logging out");
        self.api.session().invalidate().await;
    }

    async fn start_session(
        &self,
        username: &str,
        response: AuthResponse,
    ) -> Result<Option<Arc<User>>, ApiError> {
        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let mut profile = response.user.unwrap_or_default();
        if profile.username.is_empty() {
            profile.username = username.to_string();
        }

        match self.api.session().establish(User::new(profile, token)).await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::error!(error = %e, "Login succeeded but the session was not saved");
                Err(ApiError::SessionNotSaved(format!("{:#}", e)))
            }
        }
    }
}
