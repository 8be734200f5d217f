use db::DBService;
use services::services::session_state::SessionRegistry;
use sqlx::SqlitePool;

/// Constructor-injected application state: the store handle and the
/// in-memory session registry. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    sessions: SessionRegistry,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self {
            db,
            sessions: SessionRegistry::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
