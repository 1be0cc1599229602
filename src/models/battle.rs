//! Battle and vote models.

use serde::{Deserialize, Serialize};

use super::{Entity, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleStatus {
    Pending,
    Ongoing,
    Finished,
    #[serde(other)]
    Unknown,
}

impl BattleStatus {
    /// Whether votes are still accepted
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Ongoing)
    }
}

impl std::fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Ongoing => write!(f, "ongoing"),
            Self::Finished => write!(f, "finished"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A battle participant. List endpoints sometimes only send names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Participant {
    Entity(Entity),
    Name(String),
}

impl Participant {
    pub fn name(&self) -> &str {
        match self {
            Self::Entity(entity) => &entity.name,
            Self::Name(name) => name,
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            Self::Entity(entity) => Some(&entity.id),
            Self::Name(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    pub id: Id,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub status: BattleStatus,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub created_by_id: Option<Id>,
    #[serde(default)]
    pub duration_hours: Option<u32>,
    #[serde(default)]
    pub ends_at: Option<String>,
}

impl Battle {
    /// Display title, falling back to "A vs B"
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => self
                .participants
                .iter()
                .map(Participant::name)
                .collect::<Vec<_>>()
                .join(" vs "),
        }
    }

    pub fn has_participant(&self, entity_id: &Id) -> bool {
        self.participants
            .iter()
            .any(|p| p.id() == Some(entity_id))
    }
}

/// Body of `POST /battle`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBattle {
    pub entity1_id: Id,
    pub entity2_id: Id,
    pub duration_hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<Id>,
}

/// Body of `POST /battle/:id/vote`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voted_entity_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id>,
}

/// Vote counts computed by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    #[serde(default)]
    pub entity1_votes: u64,
    #[serde(default)]
    pub entity2_votes: u64,
}

impl VoteTally {
    pub fn total(&self) -> u64 {
        self.entity1_votes + self.entity2_votes
    }

    /// Rounded share of each side; an empty tally splits evenly.
    pub fn percentages(&self) -> (u8, u8) {
        let total = self.total();
        if total == 0 {
            return (50, 50);
        }
        let share = |votes: u64| ((votes as f64 / total as f64) * 100.0).round() as u8;
        (share(self.entity1_votes), share(self.entity2_votes))
    }
}

/// The caller's own vote in a battle, if any.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVote {
    #[serde(default)]
    pub voted_entity_id: Option<Id>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_with_entity_participants() {
        let battle: Battle = serde_json::from_str(
            r#"{
                "id": 4,
                "status": "pending",
                "participants": [
                    {"id": 1, "name": "Alien (1979)", "type": "movie", "imageUrl": "a.png"},
                    {"id": 2, "name": "Aliens (1986)", "type": "movie", "imageUrl": "b.png"}
                ]
            }"#,
        )
        .unwrap();

        assert!(battle.status.is_open());
        assert_eq!(battle.label(), "Alien (1979) vs Aliens (1986)");
        assert!(battle.has_participant(&Id::Num(2)));
        assert!(!battle.has_participant(&Id::Num(3)));
    }

    #[test]
    fn test_battle_with_name_participants_and_unknown_status() {
        let battle: Battle = serde_json::from_str(
            r#"{"id":"b1","title":"Best sequel","category":"movies","status":"archived","participants":["A","B"]}"#,
        )
        .unwrap();

        assert_eq!(battle.status, BattleStatus::Unknown);
        assert!(!battle.status.is_open());
        assert_eq!(battle.label(), "Best sequel");
        assert!(battle.participants[0].id().is_none());
    }

    #[test]
    fn test_vote_percentages() {
        assert_eq!(VoteTally::default().percentages(), (50, 50));

        let tally = VoteTally {
            entity1_votes: 1,
            entity2_votes: 2,
        };
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.percentages(), (33, 67));

        let tally = VoteTally {
            entity1_votes: 5,
            entity2_votes: 0,
        };
        assert_eq!(tally.percentages(), (100, 0));
    }

    #[test]
    fn test_vote_request_wire_format() {
        let body = VoteRequest {
            voted_entity_id: Id::Num(2),
            user_id: Some(Id::Num(9)),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["votedEntityId"], 2);
        assert_eq!(json["userId"], 9);
    }
}
