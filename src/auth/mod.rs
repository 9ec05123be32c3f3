pub mod extractors;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod session;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::{AuthenticatedUser, CurrentUser, JsonBody, OptionalUser};
pub use middleware::IdentityMiddleware;
pub use password::{
    hash_password, validate_password_bytes, verify_password, MAX_PASSWORD_BYTES,
};
pub use resolver::{IdentityResolver, SessionResolver};
pub use session::{Claims, SessionManager, SESSION_COOKIE};

lazy_static! {
    // Usernames: letters, digits and `_ . @ -`, no whitespace.
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_.@-]+$").unwrap();
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must be 1 to 100 characters drawn from `USERNAME_REGEX`.
    #[validate(
        length(min = 1, max = 100),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, '_', '.', '@' or '-'"
        )
    )]
    pub username: String,
    /// At most `MAX_PASSWORD_BYTES` bytes of UTF-8.
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

/// Plain `{"message": ...}` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    /// Session token, also set as the `session` cookie.
    pub token: String,
    pub user: User,
}

/// Login state as seen by the current request.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}
