use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::CurrentUser;
use crate::auth::resolver::IdentityResolver;
use crate::auth::session::token_from_request;

/// Attaches the session user, if any, to every request.
///
/// The middleware never rejects a request: an absent or unresolvable token leaves
/// the request anonymous and protected handlers refuse it through the
/// `AuthenticatedUser` extractor.
pub struct IdentityMiddleware {
    resolver: Arc<dyn IdentityResolver>,
}

impl IdentityMiddleware {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            resolver: Arc::clone(&self.resolver),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    resolver: Arc<dyn IdentityResolver>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let resolver = Arc::clone(&self.resolver);

        Box::pin(async move {
            if let Some(token) = token_from_request(req.request()) {
                match resolver.resolve(&token).await {
                    Some(user) => {
                        req.extensions_mut().insert(CurrentUser(user));
                    }
                    None => log::debug!("Session token did not resolve; continuing anonymously"),
                }
            }
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::extractors::OptionalUser;
    use crate::models::User;
    use actix_web::{http::header, test, web, App, HttpResponse};
    use async_trait::async_trait;

    struct FixedResolver;

    #[async_trait]
    impl IdentityResolver for FixedResolver {
        async fn resolve(&self, token: &str) -> Option<User> {
            (token == "good").then(|| User {
                id: 9,
                username: "fixed".into(),
                password_hash: String::new(),
                is_admin: false,
                created_at: chrono::Utc::now(),
            })
        }
    }

    async fn whoami(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.map(|u| u.username).unwrap_or_else(|| "anonymous".into()))
    }

    #[actix_rt::test]
    async fn test_middleware_attaches_user() {
        let app = test::init_service(
            App::new()
                .wrap(IdentityMiddleware::new(Arc::new(FixedResolver)))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer good"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "fixed");

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer bad"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }
}
