//! Shared fixtures for tests that talk to a mock backend.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::{MemoryStorage, SessionStore, Storage};
use crate::ui::{MessageCenter, Navigator};
use crate::AppContext;

/// Counts login redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Storage whose every operation fails.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        bail!("storage unavailable")
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        bail!("storage unavailable")
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        bail!("storage unavailable")
    }
}

pub struct Harness {
    pub context: AppContext,
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    pub storage: Arc<dyn Storage>,
    pub navigator: Arc<RecordingNavigator>,
    pub messages: Arc<MessageCenter>,
}

pub fn test_config(uri: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = uri.to_string();
    config.api.timeout_ms = 500;
    config.notifications.display_ms = 60_000;
    config
}

/// URI of a local port with nothing listening on it.
pub fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn harness(uri: &str) -> Harness {
    harness_with(uri, Arc::new(MemoryStorage::new()))
}

pub fn harness_with(uri: &str, storage: Arc<dyn Storage>) -> Harness {
    let config = test_config(uri);
    let navigator = Arc::new(RecordingNavigator::default());
    let messages = Arc::new(MessageCenter::new(config.notifications.display_for()));

    let context = AppContext::new(
        config,
        Arc::clone(&storage),
        navigator.clone(),
        messages.clone(),
    )
    .unwrap();

    Harness {
        api: context.api.clone(),
        session: Arc::clone(&context.session),
        context,
        storage,
        navigator,
        messages,
    }
}
