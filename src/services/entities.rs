//! Entity catalogue.

use crate::api::{ApiClient, ApiError};
use crate::models::{Entity, EntityStanding, NewEntity};

#[derive(Clone)]
pub struct EntityService {
    api: ApiClient,
}

impl EntityService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Entity>, ApiError> {
        // The endpoint answers `null` on an empty catalogue
        let entities: Option<Vec<Entity>> = self.api.get("/entity").await?;
        Ok(entities.unwrap_or_default())
    }

    pub async fn create(&self, entity: &NewEntity) -> Result<Entity, ApiError> {
        let created: Entity = self.api.post("/entity", entity).await?;
        tracing::info!(id = %created.id, name = %created.name, "Entity created");
        Ok(created)
    }

    pub async fn leaderboard(&self) -> Result<Vec<EntityStanding>, ApiError> {
        self.api.get("/entity/leaderboard").await
    }
}
