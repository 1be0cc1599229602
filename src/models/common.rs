//! Shared model types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// Backend identifier.
///
/// The backend is not consistent about id types (numeric for users and battles,
/// sometimes strings for entities), so both are accepted and written back in the
/// form they arrived in. Equality and hashing use the textual form: `7` and
/// `"7"` are the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Str(String),
}

impl Id {
    fn canonical(&self) -> Cow<'_, str> {
        match self {
            Self::Num(n) => Cow::Owned(n.to_string()),
            Self::Str(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a == b,
            _ => self.canonical() == other.canonical(),
        }
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Str(s.to_string()),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

/// Generic `{message}` acknowledgement returned by write endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_str(r#"[7, "abc", "12"]"#).unwrap();
        assert_eq!(ids[0], Id::Num(7));
        assert_eq!(ids[1], Id::Str("abc".to_string()));
        // Quoted numbers stay strings on the wire
        assert_eq!(serde_json::to_string(&ids[2]).unwrap(), r#""12""#);
    }

    #[test]
    fn test_id_from_cli_argument() {
        assert_eq!(Id::from("42"), Id::Num(42));
        assert_eq!(Id::from("tt0111161"), Id::Str("tt0111161".to_string()));
        assert_eq!(Id::from("42").to_string(), "42");
    }

    #[test]
    fn test_id_equality_ignores_wire_type() {
        let quoted: Id = serde_json::from_str(r#""12""#).unwrap();
        assert_eq!(quoted, Id::Num(12));
        assert_eq!(Id::from("12"), quoted);
        assert_ne!(Id::Num(12), Id::Str("012".to_string()));

        let set: std::collections::HashSet<Id> = [Id::Num(7), Id::Str("7".to_string())].into();
        assert_eq!(set.len(), 1);

        // Still written back as received
        assert_eq!(serde_json::to_string(&quoted).unwrap(), r#""12""#);
    }
}
