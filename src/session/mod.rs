//! Per-browser state: the unsaved draft, the client-side query cache and the
//! note form's submission gate.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::notes::form::FormGate;
use crate::notes::model::NotesPage;
use crate::query_cache::QueryCache;

pub mod draft;

pub use draft::DraftStore;

pub const SESSION_COOKIE: &str = "notehub_session";

#[derive(Default)]
pub struct Session {
    pub draft: DraftStore,
    pub cache: QueryCache<NotesPage>,
    pub form: FormGate,
}

/// Live sessions, capped at `max_sessions`. Idle sessions expire; a request
/// carrying an expired id starts over.
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<Session>>,
}

impl SessionStore {
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { sessions }
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.sessions.get(id)
    }

    pub fn create(&self) -> (Uuid, Arc<Session>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Session::default());
        self.sessions.insert(id, Arc::clone(&session));
        tracing::debug!(session_id = %id, "session started");
        (id, session)
    }

    /// Number of live sessions after pending expirations and evictions run.
    pub fn len(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
