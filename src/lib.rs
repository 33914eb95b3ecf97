use std::sync::Arc;

use crate::config::AppConfig;
use crate::notes::client::NotesClient;
use crate::session::SessionStore;

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod extractors;
pub mod notes;
pub mod pages;
pub mod query_cache;
pub mod session;

#[derive(Clone)]
pub struct AppState {
    pub notes_api: NotesClient,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, notes::client::ClientError> {
        let notes_api = NotesClient::new(
            config.notes_api_url.clone(),
            config.notes_api_token.clone(),
            config.notes_api_timeout,
        )?;
        Ok(Self {
            notes_api,
            sessions: Arc::new(SessionStore::new(config.max_sessions, config.session_idle)),
            config: Arc::new(config),
        })
    }
}
