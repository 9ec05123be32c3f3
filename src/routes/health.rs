use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

/// Health check endpoint
///
/// Reports which user store backs the process and whether it answers a query.
/// Responds 503 while the store is unreachable.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let store = state.users.kind();
    match state.users.count().await {
        Ok(users) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "store": store,
            "users": users,
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::warn!("Health check failed against {} store: {}", store, e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unavailable",
                "store": store,
                "timestamp": Utc::now()
            }))
        }
    }
}
