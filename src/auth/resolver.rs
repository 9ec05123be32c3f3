use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::session::SessionManager;
use crate::models::User;
use crate::store::UserStore;

/// Maps an opaque session token to the user it belongs to.
///
/// `None` means the token is invalid, expired, or points at a user that no
/// longer exists; callers treat the request as anonymous.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Option<User>;
}

/// Resolves signed session tokens by verifying them and loading the user by id.
#[derive(Clone)]
pub struct SessionResolver {
    sessions: SessionManager,
    users: Arc<dyn UserStore>,
}

impl SessionResolver {
    pub fn new(sessions: SessionManager, users: Arc<dyn UserStore>) -> Self {
        Self { sessions, users }
    }

    /// Looks a user up by primary key. Store failures count as "no user".
    pub async fn load_user(&self, id: i32) -> Option<User> {
        match self.users.find_by_id(id).await {
            Ok(user) => user,
            Err(e) => {
                log::error!("Failed to load session user {}: {}", id, e);
                None
            }
        }
    }
}

#[async_trait]
impl IdentityResolver for SessionResolver {
    async fn resolve(&self, token: &str) -> Option<User> {
        let claims = match self.sessions.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                log::debug!("Rejected session token: {}", e);
                return None;
            }
        };
        self.load_user(claims.sub).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::store::MemoryUserStore;

    async fn resolver_with_user() -> (SessionResolver, User) {
        let store = Arc::new(MemoryUserStore::new());
        let user = store
            .insert(NewUser::with_password("dave", "pw", false, 4).unwrap())
            .await
            .unwrap();
        let resolver = SessionResolver::new(SessionManager::new("secret", 1, false), store);
        (resolver, user)
    }

    #[actix_rt::test]
    async fn test_resolves_valid_token() {
        let (resolver, user) = resolver_with_user().await;
        let token = resolver.sessions.issue(user.id).unwrap();
        let resolved = resolver.resolve(&token).await.expect("user should resolve");
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.username, "dave");
    }

    #[actix_rt::test]
    async fn test_unknown_user_is_anonymous() {
        let (resolver, user) = resolver_with_user().await;
        let token = resolver.sessions.issue(user.id + 100).unwrap();
        assert!(resolver.resolve(&token).await.is_none());
    }

    #[actix_rt::test]
    async fn test_forged_token_is_anonymous() {
        let (resolver, user) = resolver_with_user().await;
        let forged = SessionManager::new("other", 1, false).issue(user.id).unwrap();
        assert!(resolver.resolve(&forged).await.is_none());
        assert!(resolver.resolve("not.a.token").await.is_none());
    }
}
