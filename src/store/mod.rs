//! User persistence.
//!
//! Handlers and the session resolver only see the `UserStore` trait. `PgUserStore`
//! backs production deployments; `MemoryUserStore` is used when no `DATABASE_URL`
//! is configured and in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, User};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short backend name reported by the health check.
    fn kind(&self) -> &'static str;

    /// Creates the backing schema if it does not exist yet. Idempotent.
    async fn init_schema(&self) -> Result<(), AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Inserts a user. A taken username yields `AppError::BadRequest("User already exists")`.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
