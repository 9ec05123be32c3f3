use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::UserStore;
use crate::error::AppError;
use crate::models::{NewUser, User};

/// Process-local user table. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        // Check and insert under one write lock so concurrent registrations
        // cannot both claim a username.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(AppError::BadRequest("User already exists".into()));
        }

        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            is_admin: new_user.is_admin,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.users.read().await.len() as i64)
    }
}
