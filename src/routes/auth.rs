use crate::{
    auth::{
        AuthenticatedUser, JsonBody, LoginRequest, LoginResponse, MessageResponse, OptionalUser,
        RegisterRequest, SessionStatus,
    },
    error::AppError,
    models::NewUser,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Register a new user
///
/// Mounted at both `POST /register` and `POST /api/auth/register`.
///
/// ## Responses:
/// - `201 Created`: `{"message": "User <name> registered successfully"}`.
/// - `400 Bad Request`: no body, malformed body, invalid fields, or the username is taken.
pub async fn register(
    state: web::Data<AppState>,
    register_data: JsonBody<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register_data.validate()?;
    let RegisterRequest { username, password } = register_data.into_inner();

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let cost = state.config.bcrypt_cost;
    let new_user =
        web::block(move || NewUser::with_password(username, &password, false, cost)).await??;

    // The store enforces uniqueness again, covering a concurrent registration.
    let user = state.users.insert(new_user).await?;
    log::info!("Registered user {} (id {})", user.username, user.id);

    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "User {} registered successfully",
        user.username
    ))))
}

/// Login user
///
/// Verifies the credentials, issues a session token and sets it as the `session` cookie.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: JsonBody<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    login_data.validate()?;
    let LoginRequest { username, password } = login_data.into_inner();

    let user = match state.users.find_by_username(&username).await? {
        Some(user) => user,
        None => {
            log::info!("Login attempt for unknown user {}", username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let (user, verified) = web::block(move || {
        let verified = user.check_password(&password);
        (user, verified)
    })
    .await?;

    if !verified {
        log::info!("Failed login for user {}", user.username);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = state.sessions.issue(user.id)?;
    log::info!("User {} logged in", user.username);

    Ok(HttpResponse::Ok()
        .cookie(state.sessions.cookie(token.clone()))
        .json(LoginResponse {
            message: format!("Logged in as {}", user.username),
            token,
            user,
        }))
}

/// Logout user
///
/// Expires the session cookie. Safe to call when already logged out.
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>, current: OptionalUser) -> impl Responder {
    if let Some(user) = current.0 {
        log::info!("User {} logged out", user.username);
    }
    HttpResponse::Ok()
        .cookie(state.sessions.removal_cookie())
        .json(MessageResponse::new("Logged out"))
}

/// Current user
///
/// Protected: responds 401 without a valid session.
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}

/// Login state of the caller; never fails.
#[get("/session")]
pub async fn session(current: OptionalUser) -> impl Responder {
    HttpResponse::Ok().json(SessionStatus {
        authenticated: current.0.is_some(),
        user: current.0,
    })
}
