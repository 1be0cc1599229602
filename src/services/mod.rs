//! Typed wrappers around backend endpoints, one per area of the app.

mod auth;
mod battles;
mod entities;
mod movies;
mod uploads;
mod users;

pub use auth::AuthService;
pub use battles::{BattleService, DEFAULT_DURATION_HOURS};
pub use entities::EntityService;
pub use movies::MovieService;
pub use uploads::UploadService;
pub use users::UserService;
