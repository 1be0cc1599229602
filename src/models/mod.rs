//! Records exchanged with the CultBrawl backend.
//!
//! Wire format is camelCase JSON throughout.

pub mod battle;
pub mod common;
pub mod entity;
pub mod leaderboard;
pub mod movie;
pub mod user;

pub use battle::*;
pub use common::*;
pub use entity::*;
pub use leaderboard::*;
pub use movie::*;
pub use user::*;
