use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::password;
use crate::error::AppError;

/// A registered account as stored in the `users` table.
///
/// `password_hash` is never serialized, so a `User` can be returned from handlers as is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true only when `plaintext` matches the stored hash.
    /// A missing or corrupt hash fails closed.
    pub fn check_password(&self, plaintext: &str) -> bool {
        password::verify_password(plaintext, &self.password_hash)
    }
}

/// A user row that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewUser {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            password_hash: String::new(),
            is_admin,
        }
    }

    /// Hashes `plaintext` with bcrypt at `cost` and keeps only the hash.
    pub fn set_password(&mut self, plaintext: &str, cost: u32) -> Result<(), AppError> {
        self.password_hash = password::hash_password(plaintext, cost)?;
        Ok(())
    }

    /// Builds a record with a hashed password in one step.
    pub fn with_password(
        username: impl Into<String>,
        plaintext: &str,
        is_admin: bool,
        cost: u32,
    ) -> Result<Self, AppError> {
        let mut user = Self::new(username, is_admin);
        user.set_password(plaintext, cost)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn stored(new_user: NewUser) -> User {
        User {
            id: 1,
            username: new_user.username,
            password_hash: new_user.password_hash,
            is_admin: new_user.is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_set_password_never_keeps_plaintext() {
        let new_user = NewUser::with_password("alice", "pw1", false, TEST_COST).unwrap();
        assert_ne!(new_user.password_hash, "pw1");
        assert!(new_user.password_hash.starts_with("$2"));
    }

    #[test]
    fn test_check_password() {
        let user = stored(NewUser::with_password("alice", "pw1", false, TEST_COST).unwrap());
        assert!(user.check_password("pw1"));
        assert!(!user.check_password("pw2"));
        assert!(!user.check_password(""));
        assert!(!user.check_password("PW1"));
    }

    #[test]
    fn test_check_password_fails_closed() {
        let mut user = stored(NewUser::new("bob", false));
        assert!(!user.check_password(""));
        assert!(!user.check_password("anything"));

        user.password_hash = "not-a-bcrypt-hash".into();
        assert!(!user.check_password("not-a-bcrypt-hash"));
    }

    #[test]
    fn test_serialization_hides_hash() {
        let user = stored(NewUser::with_password("carol", "secret", true, TEST_COST).unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "carol");
        assert_eq!(json["is_admin"], true);
    }
}
