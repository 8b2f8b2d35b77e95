//! Feed handlers - listing, reading, rating, commenting, deleting.

use actix_web::{HttpResponse, web};
use chrono::SecondsFormat;

use haiku_core::domain::{Haiku, StoredHaiku};
use haiku_shared::dto::{
    AddCommentRequest, CommentResponse, DeleteHaikuResponse, HaikuResponse, RateHaikuRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Render a haiku the way the web client expects it.
pub(super) fn to_response(haiku: &Haiku, recovered: bool) -> HaikuResponse {
    HaikuResponse {
        id: haiku.id.clone(),
        text: haiku.text.clone(),
        prompt: haiku.prompt.clone(),
        timestamp: haiku.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        likes: haiku.likes,
        dislikes: haiku.dislikes,
        comments: haiku
            .comments
            .iter()
            .map(|c| CommentResponse {
                id: c.id.clone(),
                text: c.text.clone(),
                timestamp: c.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            })
            .collect(),
        recovered,
    }
}

fn stored_response(stored: &StoredHaiku) -> HaikuResponse {
    to_response(stored.haiku(), stored.is_recovered())
}

/// GET /api/haikus - newest first
pub async fn list_haikus(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let mut haikus = state.haikus.get_all().await?;
    haikus.sort_by(|a, b| b.haiku().timestamp.cmp(&a.haiku().timestamp));

    let body: Vec<HaikuResponse> = haikus.iter().map(stored_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/haikus/{id}
pub async fn get_haiku(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let stored = state
        .haikus
        .get_one(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Haiku not found".to_string()))?;

    Ok(HttpResponse::Ok().json(stored_response(&stored)))
}

/// POST /api/haikus/{id}/rate
pub async fn rate_haiku(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RateHaikuRequest>,
) -> AppResult<HttpResponse> {
    let is_like = body
        .into_inner()
        .is_like
        .ok_or_else(|| AppError::BadRequest("Please provide a rating (isLike)".to_string()))?;

    let updated = state.haikus.rate(&path.into_inner(), is_like).await?;
    Ok(HttpResponse::Ok().json(to_response(&updated, false)))
}

/// POST /api/haikus/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = body
        .into_inner()
        .comment
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Comment cannot be empty".to_string()))?;

    let updated = state.haikus.add_comment(&path.into_inner(), &comment).await?;
    Ok(HttpResponse::Ok().json(to_response(&updated, false)))
}

/// DELETE /api/haikus/{id}
pub async fn delete_haiku(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.haikus.delete(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DeleteHaikuResponse {
        success: true,
        message: "Haiku deleted".to_string(),
    }))
}
