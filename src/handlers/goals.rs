// src/handlers/goals.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, rbac::Admin},
    models::goals::{Goal, GoalBoard, GoalPayload},
};

// GET /api/goals
#[utoipa::path(
    get,
    path = "/api/goals",
    tag = "Goals",
    responses(
        (status = 200, description = "Meta da empresa e de cada vendedor (zerada se não configurada)", body = GoalBoard),
        (status = 403, description = "Só o admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_goals(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
) -> Result<impl IntoResponse, ApiError> {
    let board = app_state
        .goal_service
        .board()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(board)))
}

// PUT /api/goals
#[utoipa::path(
    put,
    path = "/api/goals",
    tag = "Goals",
    request_body = GoalPayload,
    responses(
        (status = 200, description = "Meta gravada; o mesmo nome sobrescreve", body = Goal),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Só o admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_goal(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
    Json(payload): Json<GoalPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let goal = app_state
        .goal_service
        .upsert(payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(goal)))
}
