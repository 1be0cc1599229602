//! Leaderboard rows. Ranking is done server side; rows arrive in rank order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStanding {
    pub username: String,
    #[serde(default)]
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStanding {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, alias = "points")]
    pub wins: i64,
}
