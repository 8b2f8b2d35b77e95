//! HTTP handlers and route configuration.

mod generate;
mod haikus;
mod health;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Malformed or missing JSON bodies get the same error shape as everything else.
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid JSON body: {}", err)).into());

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .route("/health", web::get().to(health::health_check))
            .route("/generate-haiku", web::post().to(generate::generate_haiku))
            .service(
                web::scope("/haikus")
                    .route("", web::get().to(haikus::list_haikus))
                    .route("/{id}", web::get().to(haikus::get_haiku))
                    .route("/{id}", web::delete().to(haikus::delete_haiku))
                    .route("/{id}/rate", web::post().to(haikus::rate_haiku))
                    .route("/{id}/comments", web::post().to(haikus::add_comment)),
            ),
    );
}
