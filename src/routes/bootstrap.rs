use crate::{auth::MessageResponse, bootstrap, error::AppError, state::AppState};
use actix_web::{post, web, HttpResponse};

/// Initialize the database
///
/// Creates the schema and the configured seed admin. Idempotent.
///
/// ## Responses:
/// - `201 Created`: the seed admin was created by this call.
/// - `200 OK`: nothing left to do.
#[post("/init_db")]
pub async fn init_db(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    run(&state).await
}

/// Alias of `init_db` kept for existing deploy scripts.
#[post("/init_db_and_user")]
pub async fn init_db_and_user(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    run(&state).await
}

async fn run(state: &AppState) -> Result<HttpResponse, AppError> {
    let outcome = bootstrap::init_database(
        state.users.as_ref(),
        state.config.admin.as_ref(),
        state.config.bcrypt_cost,
    )
    .await?;

    let mut response = match outcome {
        bootstrap::BootstrapOutcome::Created { .. } => HttpResponse::Created(),
        bootstrap::BootstrapOutcome::AlreadyInitialized => HttpResponse::Ok(),
    };
    Ok(response.json(MessageResponse::new(outcome.message())))
}
