//! User and session models.

use serde::{Deserialize, Serialize};

use super::Id;

/// Profile fields as the backend returns them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<Id>,
}

/// The authenticated user held by the session store.
///
/// `token` is never empty for a value of this type; records without a usable
/// token stay as [`StoredSession`] and are never promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub profile: Profile,
    pub token: String,
}

impl User {
    pub fn new(profile: Profile, token: impl Into<String>) -> Self {
        Self {
            profile,
            token: token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    pub fn id(&self) -> Option<&Id> {
        self.profile.id.as_ref()
    }

    /// Replace a single profile field, leaving everything else as is.
    pub fn with_field(mut self, field: ProfileField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            ProfileField::Firstname => self.profile.firstname = value,
            ProfileField::Lastname => self.profile.lastname = value,
            ProfileField::Email => self.profile.email = value,
            ProfileField::ImageUrl => self.profile.image_url = value,
        }
        self
    }
}

/// Persisted session record, read leniently.
///
/// This is what sits on disk; a record may be missing its token (e.g. written by
/// an older client) and is then treated as unauthenticated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredSession {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub token: Option<String>,
}

impl StoredSession {
    /// The bearer token, if the record carries a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn into_user(self) -> Option<User> {
        match self.token {
            Some(token) if !token.is_empty() => Some(User::new(self.profile, token)),
            _ => None,
        }
    }
}

/// Profile fields editable from the account screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Firstname,
    Lastname,
    Email,
    ImageUrl,
}

impl ProfileField {
    /// Key used in the update payload
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Firstname => "firstname",
            Self::Lastname => "lastname",
            Self::Email => "email",
            Self::ImageUrl => "imageUrl",
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firstname" | "first-name" => Ok(Self::Firstname),
            "lastname" | "last-name" => Ok(Self::Lastname),
            "email" => Ok(Self::Email),
            "imageurl" | "image-url" | "avatar" => Ok(Self::ImageUrl),
            other => Err(format!(
                "unknown profile field '{}' (expected firstname, lastname, email or image-url)",
                other
            )),
        }
    }
}

/// `/user/:id` answers either with the profile itself or wrapped in `{user}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfileEnvelope {
    Wrapped { user: Profile },
    Bare(Profile),
}

impl ProfileEnvelope {
    pub fn into_profile(self) -> Profile {
        match self {
            Self::Wrapped { user } => user,
            Self::Bare(profile) => profile,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<Profile>,
}

/// Response of `POST /upload`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(alias = "imageUrl", alias = "path")]
    pub url: String,
}
