// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/languages", web::get().to(handlers::list_languages))
            .route("/syntax/check", web::post().to(handlers::check_syntax))
            .route("/execute", web::post().to(handlers::execute))
            .service(
                web::resource("/settings/api-key")
                    .route(web::get().to(handlers::get_api_key_status))
                    .route(web::put().to(handlers::save_api_key))
                    .route(web::delete().to(handlers::remove_api_key))
            )
    );
}
