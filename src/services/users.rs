//! Profiles and the user leaderboard.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::models::{Id, Profile, ProfileEnvelope, ProfileField, User, UserStanding};

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn profile(&self, id: &Id) -> Result<Profile, ApiError> {
        let envelope: ProfileEnvelope = self.api.get(&format!("/user/{}", id)).await?;
        Ok(envelope.into_profile())
    }

    /// Save a single profile field and merge it into the session.
    ///
    /// Only the edited field is sent; the rest of the profile is untouched both
    /// on the server and locally.
    pub async fn update_field(
        &self,
        field: ProfileField,
        value: &str,
    ) -> Result<Arc<User>, ApiError> {
        if !self.api.session().is_authenticated() {
            return Err(ApiError::validation(
                "You need to be logged in to edit your profile.",
            ));
        }

        let mut body = Map::new();
        body.insert(field.as_str().to_string(), Value::String(value.to_string()));

        let _: Value = self.api.put("/user", &body).await?;
        tracing::info!(field = %field, "Profile field updated");

        // A 403 above would already have cleared the session
        self.api
            .session()
            .merge_profile(field, value)
            .await
            .ok_or_else(|| ApiError::validation("Your session ended while saving."))
    }

    /// Users ranked by points, best first.
    pub async fn leaderboard(&self) -> Result<Vec<UserStanding>, ApiError> {
        self.api.get("/user/leaderboard").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn alice() -> User {
        User::new(
            Profile {
                id: Some(Id::Num(1)),
                username: "alice".to_string(),
                lastname: Some("Liddell".to_string()),
                ..Default::default()
            },
            "t1",
        )
    }

    #[tokio::test]
    async fn test_independent_field_saves_merge() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user"))
            .and(body_json(json!({"firstname": "Alice"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/user"))
            .and(body_json(json!({"email": "alice@example.com"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        h.session.establish(alice()).await.unwrap();
        let users = UserService::new(h.api.clone());

        users
            .update_field(ProfileField::Firstname, "Alice")
            .await
            .unwrap();
        let user = users
            .update_field(ProfileField::Email, "alice@example.com")
            .await
            .unwrap();

        assert_eq!(user.profile.firstname.as_deref(), Some("Alice"));
        assert_eq!(user.profile.email.as_deref(), Some("alice@example.com"));
        assert_eq!(user.profile.lastname.as_deref(), Some("Liddell"));
        assert_eq!(user.profile.image_url, None);
        assert_eq!(user.username(), "alice");
        assert_eq!(user.token, "t1");
        server.verify().await;
    }

    #[tokio::test]
    async fn test_failed_save_keeps_old_value() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        h.session.establish(alice()).await.unwrap();

        let err = UserService::new(h.api.clone())
            .update_field(ProfileField::Lastname, "Smith")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(
            h.session.get().unwrap().profile.lastname.as_deref(),
            Some("Liddell")
        );
    }

    #[tokio::test]
    async fn test_update_requires_session() {
        let h = harness("http://127.0.0.1:9");
        let err = UserService::new(h.api.clone())
            .update_field(ProfileField::Email, "x@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_leaderboard_and_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"username": "bob", "points": 12},
                {"username": "alice", "points": 7}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": 2, "username": "bob", "firstname": "Bob"}
            })))
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        let users = UserService::new(h.api.clone());

        let board = users.leaderboard().await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].username, "bob");
        assert_eq!(board[0].points, 12);

        let bob = users.profile(&Id::Num(2)).await.unwrap();
        assert_eq!(bob.firstname.as_deref(), Some("Bob"));
    }
}
