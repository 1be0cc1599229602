//! Battles and voting.

use dashmap::DashSet;
use serde_json::Value;
use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::models::{Battle, Id, MessageResponse, NewBattle, UserVote, VoteRequest, VoteTally};

/// Default lifetime of a new battle in hours
pub const DEFAULT_DURATION_HOURS: u32 = 1;

#[derive(Clone)]
pub struct BattleService {
    api: ApiClient,
    /// Battles with a vote currently being submitted
    voting: Arc<DashSet<Id>>,
}

/// Removes the battle from the in-flight set when the vote finishes.
struct VoteGuard {
    voting: Arc<DashSet<Id>>,
    battle_id: Id,
}

impl Drop for VoteGuard {
    fn drop(&mut self) {
        self.voting.remove(&self.battle_id);
    }
}

impl BattleService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            voting: Arc::new(DashSet::new()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Battle>, ApiError> {
        let battles: Option<Vec<Battle>> = self.api.get("/battle").await?;
        Ok(battles.unwrap_or_default())
    }

    pub async fn get(&self, id: &Id) -> Result<Battle, ApiError> {
        self.list()
            .await?
            .into_iter()
            .find(|battle| &battle.id == id)
            .ok_or_else(|| ApiError::validation(format!("Battle {} not found.", id)))
    }

    /// Start a battle between two different entities.
    pub async fn create(
        &self,
        first: &Id,
        second: &Id,
        duration_hours: u32,
    ) -> Result<Value, ApiError> {
        if first == second {
            return Err(ApiError::validation("A battle needs two different entities."));
        }
        if duration_hours == 0 {
            return Err(ApiError::validation("Duration must be at least one hour."));
        }

        let body = NewBattle {
            entity1_id: first.clone(),
            entity2_id: second.clone(),
            duration_hours,
            created_by_id: self.api.session().get().and_then(|u| u.id().cloned()),
        };

        let created: Value = self.api.post("/battle", &body).await?;
        tracing::info!(entity1 = %first, entity2 = %second, duration_hours, "Battle created");
        Ok(created)
    }

    pub async fn votes(&self, battle_id: &Id) -> Result<VoteTally, ApiError> {
        self.api.get(&format!("/battle/{}/votes", battle_id)).await
    }

    /// The logged-in user's vote in a battle.
    pub async fn user_vote(&self, battle_id: &Id) -> Result<UserVote, ApiError> {
        let vote: Option<UserVote> = self
            .api
            .get(&format!("/battle/{}/user-vote", battle_id))
            .await?;
        Ok(vote.unwrap_or_default())
    }

    /// Vote for one side of an open battle and return the updated tally.
    ///
    /// At most one vote per battle is in flight from this service; a second
    /// call while the first is pending is refused without a request.
    pub async fn vote(&self, battle: &Battle, entity_id: &Id) -> Result<VoteTally, ApiError> {
        if !battle.status.is_open() {
            return Err(ApiError::validation("This battle is finished."));
        }
        // Participants listed by name only cannot be checked locally
        let checkable = battle.participants.iter().any(|p| p.id().is_some());
        if checkable && !battle.has_participant(entity_id) {
            return Err(ApiError::validation(format!(
                "Entity {} is not part of this battle.",
                entity_id
            )));
        }

        let _guard = self.begin_vote(&battle.id)?;

        // Echo the participant's id in the form the backend sent it
        let voted_entity_id = battle
            .participants
            .iter()
            .filter_map(|p| p.id())
            .find(|id| *id == entity_id)
            .unwrap_or(entity_id)
            .clone();

        let body = VoteRequest {
            voted_entity_id,
            user_id: self.api.session().get().and_then(|u| u.id().cloned()),
        };
        let ack: Option<MessageResponse> = self
            .api
            .post(&format!("/battle/{}/vote", battle.id), &body)
            .await?;
        tracing::info!(battle = %battle.id, entity = %entity_id, "Vote submitted");
        if let Some(message) = ack.and_then(|ack| ack.message) {
            tracing::debug!(%message, "Vote acknowledged");
        }

        self.votes(&battle.id).await
    }

    fn begin_vote(&self, battle_id: &Id) -> Result<VoteGuard, ApiError> {
        if !self.voting.insert(battle_id.clone()) {
            tracing::debug!(battle = %battle_id, "Ignoring duplicate vote");
            return Err(ApiError::validation(
                "A vote is already being submitted for this battle.",
            ));
        }
        Ok(VoteGuard {
            voting: Arc::clone(&self.voting),
            battle_id: battle_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BattleStatus, Entity, Participant, Profile, User};
    use crate::test_support::harness;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entity(id: i64, name: &str) -> Participant {
        Participant::Entity(Entity {
            id: Id::Num(id),
            name: name.to_string(),
            kind: "movie".to_string(),
            image_url: None,
            api_id: None,
            source: None,
        })
    }

    fn battle(status: BattleStatus) -> Battle {
        Battle {
            id: Id::Num(7),
            title: None,
            category: None,
            status,
            participants: vec![entity(1, "Alien"), entity(2, "Aliens")],
            created_by_id: None,
            duration_hours: Some(1),
            ends_at: None,
        }
    }

    fn logged_in(id: i64) -> User {
        User::new(
            Profile {
                id: Some(Id::Num(id)),
                username: "alice".to_string(),
                ..Default::default()
            },
            "t1",
        )
    }

    #[tokio::test]
    async fn test_vote_posts_and_refetches_tally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/battle/7/vote"))
            .and(body_json(json!({"votedEntityId": 2, "userId": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/battle/7/votes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"entity1Votes": 4, "entity2Votes": 6})),
            )
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        h.session.establish(logged_in(3)).await.unwrap();

        let tally = BattleService::new(h.api.clone())
            .vote(&battle(BattleStatus::Pending), &Id::Num(2))
            .await
            .unwrap();

        assert_eq!(tally.percentages(), (40, 60));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_vote_refused_on_finished_battle() {
        let h = harness("http://127.0.0.1:9");
        let err = BattleService::new(h.api.clone())
            .vote(&battle(BattleStatus::Finished), &Id::Num(1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "This battle is finished.");
    }

    #[tokio::test]
    async fn test_vote_refused_for_outsider() {
        let h = harness("http://127.0.0.1:9");
        let err = BattleService::new(h.api.clone())
            .vote(&battle(BattleStatus::Ongoing), &Id::Num(99))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_double_vote_sends_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/battle/7/vote"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/battle/7/votes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entity1Votes": 1})))
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        let battles = BattleService::new(h.api.clone());
        let open = battle(BattleStatus::Pending);

        let (first, second) = tokio::join!(
            battles.vote(&open, &Id::Num(1)),
            battles.vote(&open, &Id::Num(1))
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(ApiError::Validation(msg)) if msg.contains("already being submitted")
        )));
        let posts = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == "POST")
            .count();
        assert_eq!(posts, 1);

        // The guard is released once the vote completes
        assert!(battles.vote(&open, &Id::Num(1)).await.is_ok());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_guard_released_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/battle/7/vote"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        let battles = BattleService::new(h.api.clone());
        let open = battle(BattleStatus::Pending);

        assert!(battles.vote(&open, &Id::Num(1)).await.is_err());
        let err = battles.vote(&open, &Id::Num(1)).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_create_validates_selection() {
        let h = harness("http://127.0.0.1:9");
        let battles = BattleService::new(h.api.clone());

        let err = battles
            .create(&Id::Num(1), &Id::Num(1), 1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "A battle needs two different entities.");

        let err = battles
            .create(&Id::Num(1), &Id::Num(2), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_sends_creator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/battle"))
            .and(body_json(json!({
                "entity1Id": 1,
                "entity2Id": "e-2",
                "durationHours": 1,
                "createdById": 3
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11})))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        h.session.establish(logged_in(3)).await.unwrap();

        let created = BattleService::new(h.api.clone())
            .create(&Id::Num(1), &Id::Str("e-2".to_string()), DEFAULT_DURATION_HOURS)
            .await
            .unwrap();
        assert_eq!(created["id"], 11);
    }

    #[tokio::test]
    async fn test_list_get_and_user_vote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/battle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "status": "pending", "participants": ["Alien", "Aliens"]},
                {"id": 8, "status": "finished", "participants": []}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/battle/7/user-vote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"votedEntityId": 2})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/battle/8/user-vote"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        let battles = BattleService::new(h.api.clone());

        assert_eq!(battles.list().await.unwrap().len(), 2);
        assert_eq!(battles.get(&Id::Num(8)).await.unwrap().status, BattleStatus::Finished);
        assert!(battles.get(&Id::Num(99)).await.is_err());

        let vote = battles.user_vote(&Id::Num(7)).await.unwrap();
        assert_eq!(vote.voted_entity_id, Some(Id::Num(2)));
        let vote = battles.user_vote(&Id::Num(8)).await.unwrap();
        assert_eq!(vote.voted_entity_id, None);
    }

    #[tokio::test]
    async fn test_string_ids_match_cli_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/battle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "7",
                "status": "ongoing",
                "participants": [
                    {"id": "12", "name": "Alien"},
                    {"id": "13", "name": "Aliens"}
                ]
            }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/battle/7/vote"))
            .and(body_json(json!({"votedEntityId": "12"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/battle/7/votes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entity1Votes": 1})))
            .mount(&server)
            .await;

        let h = harness(&server.uri());
        let battles = BattleService::new(h.api.clone());

        let battle = battles.get(&Id::from("7")).await.unwrap();
        assert!(battle.has_participant(&Id::from("12")));

        let tally = battles.vote(&battle, &Id::from("12")).await.unwrap();
        assert_eq!(tally.total(), 1);
        server.verify().await;
    }
}
