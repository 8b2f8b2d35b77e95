//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub kv_backend: &'static str,
    pub generator_configured: bool,
}

/// Health check endpoint - returns server status and which backends are wired.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        kv_backend: state.kv_backend.as_str(),
        generator_configured: state.generator.is_some(),
    };

    HttpResponse::Ok().json(response)
}
