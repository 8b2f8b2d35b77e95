//! Haiku generation handler.

use actix_web::{HttpResponse, web};

use haiku_core::domain::Haiku;
use haiku_shared::dto::{GenerateHaikuRequest, GenerateHaikuResponse};

use super::haikus::to_response;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/generate-haiku
pub async fn generate_haiku(
    state: web::Data<AppState>,
    body: web::Json<GenerateHaikuRequest>,
) -> AppResult<HttpResponse> {
    let prompt = body
        .into_inner()
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Please provide a topic or idea".to_string()))?;

    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::Configuration("Generation API key is not configured".to_string())
    })?;

    let text = generator.generate(&prompt).await?;

    let haiku = Haiku::new(prompt, text.clone());
    state.haikus.save(&haiku).await?;
    tracing::info!(id = %haiku.id, "Haiku generated and stored");

    Ok(HttpResponse::Ok().json(GenerateHaikuResponse {
        haiku: text,
        haiku_data: to_response(&haiku, false),
    }))
}
