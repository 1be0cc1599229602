pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod polling;
pub mod services;
pub mod session;
pub mod ui;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use config::Config;
use std::sync::Arc;

use crate::api::{ApiClient, Interceptor};
use crate::services::{
    AuthService, BattleService, EntityService, MovieService, UploadService, UserService,
};
use crate::session::{SessionStore, Storage};
use crate::ui::{Navigator, Notifier};

/// Everything a front end needs, wired once at startup.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub auth: AuthService,
    pub users: UserService,
    pub entities: EntityService,
    pub battles: BattleService,
    pub movies: MovieService,
    pub uploads: UploadService,
}

impl AppContext {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let session = Arc::new(SessionStore::new(storage, navigator));

        let mut interceptor = Interceptor::new(Arc::clone(&session));
        if config.notifications.enabled {
            interceptor = interceptor.with_notifier(notifier);
        }

        let api = ApiClient::new(&config.api, interceptor)?;
        let movies = MovieService::new(&config.omdb, &config.api)?;

        Ok(Self {
            auth: AuthService::new(api.clone()),
            users: UserService::new(api.clone()),
            entities: EntityService::new(api.clone()),
            battles: BattleService::new(api.clone()),
            uploads: UploadService::new(api.clone()),
            movies,
            session,
            api,
            config,
        })
    }
}
