// src/handlers/insurers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Admin},
    models::insurers::{Insurer, InsurerPayload},
};

// GET /api/insurers
#[utoipa::path(
    get,
    path = "/api/insurers",
    tag = "Insurers",
    responses(
        (status = 200, description = "Seguradoras em ordem alfabética", body = Vec<Insurer>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_insurers(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let insurers = app_state
        .insurer_service
        .list()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(insurers)))
}

// POST /api/insurers
#[utoipa::path(
    post,
    path = "/api/insurers",
    tag = "Insurers",
    request_body = InsurerPayload,
    responses(
        (status = 201, description = "Seguradora cadastrada", body = Insurer),
        (status = 400, description = "Nome em branco"),
        (status = 403, description = "Só o admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_insurer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
    Json(payload): Json<InsurerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let insurer = app_state
        .insurer_service
        .create(payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(insurer)))
}

// PUT /api/insurers/{id}
#[utoipa::path(
    put,
    path = "/api/insurers/{id}",
    tag = "Insurers",
    request_body = InsurerPayload,
    params(("id" = Uuid, Path, description = "ID da seguradora")),
    responses(
        (status = 200, description = "Seguradora renomeada", body = Insurer),
        (status = 404, description = "Seguradora não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_insurer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
    Path(id): Path<Uuid>,
    Json(payload): Json<InsurerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let insurer = app_state
        .insurer_service
        .update(id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(insurer)))
}

// DELETE /api/insurers/{id}
#[utoipa::path(
    delete,
    path = "/api/insurers/{id}",
    tag = "Insurers",
    params(("id" = Uuid, Path, description = "ID da seguradora")),
    responses(
        (status = 204, description = "Seguradora removida"),
        (status = 404, description = "Seguradora não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_insurer(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .insurer_service
        .delete(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
