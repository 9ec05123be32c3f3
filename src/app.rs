use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error,
};

use crate::auth::{IdentityMiddleware, IdentityResolver};
use crate::error::json_error_handler;
use crate::routes::{self, spa};
use crate::state::AppState;

/// Largest JSON body accepted by any handler.
const JSON_LIMIT: usize = 64 * 1024;

/// Builds the application: shared state, middleware, API routes and the SPA fallback.
///
/// Used by `main` for every worker and by the integration tests.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let resolver: Arc<dyn IdentityResolver> = Arc::new(state.resolver());

    App::new()
        .app_data(web::Data::new(state))
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_LIMIT)
                .error_handler(json_error_handler),
        )
        .wrap(IdentityMiddleware::new(resolver))
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .configure(routes::config)
        .default_service(web::to(spa::fallback))
}
