// src/handlers/ai.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::ai::{PitchPayload, PitchResponse, SuggestStatusPayload, SuggestStatusResponse},
};

// POST /api/ai/pitch
#[utoipa::path(
    post,
    path = "/api/ai/pitch",
    tag = "AI",
    request_body = PitchPayload,
    responses(
        (status = 200, description = "Pitch de WhatsApp gerado pela IA", body = PitchResponse),
        (status = 412, description = "Chave da IA ausente ou inválida"),
        (status = 502, description = "IA indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_pitch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Json(payload): Json<PitchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let pitch = app_state
        .pitch_service
        .pitch(&payload.client_name, &payload.vehicle, &payload.context)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(PitchResponse { pitch })))
}

// POST /api/ai/suggest-status
#[utoipa::path(
    post,
    path = "/api/ai/suggest-status",
    tag = "AI",
    request_body = SuggestStatusPayload,
    responses(
        (status = 200, description = "Status sugerido (nulo se a IA não souber)", body = SuggestStatusResponse),
        (status = 412, description = "Chave da IA ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn suggest_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Json(payload): Json<SuggestStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let status = app_state
        .pitch_service
        .suggest_status(&payload.history)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(SuggestStatusResponse { status })))
}
