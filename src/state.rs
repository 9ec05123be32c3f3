use std::sync::Arc;

use crate::auth::{SessionManager, SessionResolver};
use crate::config::Config;
use crate::store::UserStore;

/// Everything handlers need, built once at startup and shared through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserStore>,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(config: Config, users: Arc<dyn UserStore>) -> Self {
        let sessions = SessionManager::new(
            &config.secret_key,
            config.session_ttl_hours,
            config.session_cookie_secure,
        );
        Self {
            config: Arc::new(config),
            users,
            sessions,
        }
    }

    pub fn resolver(&self) -> SessionResolver {
        SessionResolver::new(self.sessions.clone(), Arc::clone(&self.users))
    }
}
