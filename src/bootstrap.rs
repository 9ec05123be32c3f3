//! One-shot database initialization.
//!
//! Creates the schema and, when `ADMIN_USERNAME`/`ADMIN_PASSWORD` are configured,
//! a seed admin account. Running it again is a no-op.

use actix_web::web;

use crate::config::AdminSeed;
use crate::error::AppError;
use crate::models::NewUser;
use crate::store::UserStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Schema ensured and the seed admin created by this call.
    Created { username: String },
    /// Schema ensured; the seed admin already existed or none is configured.
    AlreadyInitialized,
}

impl BootstrapOutcome {
    pub fn message(&self) -> String {
        match self {
            BootstrapOutcome::Created { username } => {
                format!("Database initialized and user {} created", username)
            }
            BootstrapOutcome::AlreadyInitialized => {
                "Database already initialized or user already exists".to_string()
            }
        }
    }
}

pub async fn init_database(
    users: &dyn UserStore,
    admin: Option<&AdminSeed>,
    bcrypt_cost: u32,
) -> Result<BootstrapOutcome, AppError> {
    users.init_schema().await?;

    let Some(seed) = admin else {
        log::info!("Database schema ready; no seed admin configured");
        return Ok(BootstrapOutcome::AlreadyInitialized);
    };

    if users.find_by_username(&seed.username).await?.is_some() {
        log::debug!("Seed admin {} already exists", seed.username);
        return Ok(BootstrapOutcome::AlreadyInitialized);
    }

    let username = seed.username.clone();
    let password = seed.password.clone();
    let new_user =
        web::block(move || NewUser::with_password(username, &password, true, bcrypt_cost))
            .await??;

    match users.insert(new_user).await {
        Ok(user) => {
            log::info!("Created seed admin {} (id {})", user.username, user.id);
            Ok(BootstrapOutcome::Created {
                username: user.username,
            })
        }
        // Another bootstrap won the race between our lookup and insert.
        Err(AppError::BadRequest(_)) => Ok(BootstrapOutcome::AlreadyInitialized),
        Err(e) => Err(e),
    }
}
