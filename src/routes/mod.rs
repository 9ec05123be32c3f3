pub mod auth;
pub mod bootstrap;
pub mod health;
pub mod spa;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(bootstrap::init_db)
        .service(bootstrap::init_db_and_user)
        // Legacy top-level endpoint. Other methods fall through to the SPA so a
        // client-side `/register` page still loads.
        .service(
            web::resource("/register")
                .route(web::post().to(auth::register))
                .default_service(web::to(spa::fallback)),
        )
        .service(
            web::scope(spa::API_PREFIX)
                .service(
                    web::scope("/auth")
                        .service(
                            web::resource("/register")
                                .route(web::post().to(auth::register))
                                .default_service(web::to(spa::api_method_not_allowed)),
                        )
                        .service(auth::login)
                        .service(auth::logout)
                        .service(auth::me)
                        .service(auth::session)
                        .default_service(web::to(spa::api_not_found)),
                )
                .default_service(web::to(spa::api_not_found)),
        );
}
