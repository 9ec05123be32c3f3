#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use bookshelf_api::config::{AdminSeed, Config};
use bookshelf_api::store::{MemoryUserStore, UserStore};
use bookshelf_api::AppState;

/// Lowest cost bcrypt accepts; keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config(static_dir: &Path) -> Config {
    Config {
        secret_key: "integration-test-secret".into(),
        static_dir: static_dir.to_path_buf(),
        bcrypt_cost: TEST_BCRYPT_COST,
        ..Config::default()
    }
}

pub fn with_admin(mut config: Config, username: &str, password: &str) -> Config {
    config.admin = Some(AdminSeed {
        username: username.into(),
        password: password.into(),
    });
    config
}

/// Builds state over a fresh in-memory store, returning the store for assertions.
pub fn test_state(config: Config) -> (AppState, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let users: Arc<dyn UserStore> = store.clone();
    (AppState::new(config, users), store)
}

/// Reads a response as JSON, panicking with the raw body when it is not JSON.
pub async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "response is not JSON ({}): {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    })
}

/// Returns the value of the `session` cookie set on a response, if any.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == bookshelf_api::auth::SESSION_COOKIE)
        .map(|c| c.value().to_string())
}
