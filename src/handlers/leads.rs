// src/handlers/leads.rs

use axum::{
    extract::{Path, Query, State},
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
    models::{
        ai::PitchResponse,
        bulk::{BulkDeletePayload, BulkDeleteReport},
        leads::{DistributeLeadPayload, Lead, LeadColumn, LeadPayload},
        pipeline::MoveStatusPayload,
    },
    services::filters::ListFilter,
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(ListFilter),
    responses(
        (status = 200, description = "Indicações visíveis para o usuário, mais recentes primeiro", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Query(filter): Query<ListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let leads = app_state
        .lead_service
        .list(&viewer, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/board
#[utoipa::path(
    get,
    path = "/api/leads/board",
    tag = "Leads",
    params(ListFilter),
    responses(
        (status = 200, description = "Quadro de indicações: uma coluna por status, na ordem do funil", body = Vec<LeadColumn>)
    ),
    security(("api_jwt" = []))
)]
pub async fn leads_board(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Query(filter): Query<ListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let board = app_state
        .lead_service
        .board(&viewer, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(board)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = LeadPayload,
    responses(
        (status = 201, description = "Indicação cadastrada", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Json(payload): Json<LeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let lead = app_state
        .lead_service
        .create(&viewer, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = LeadPayload,
    params(("id" = Uuid, Path, description = "ID da indicação")),
    responses(
        (status = 200, description = "Indicação atualizada", body = Lead),
        (status = 404, description = "Indicação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let lead = app_state
        .lead_service
        .update(&viewer, id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(lead)))
}

// POST /api/leads/{id}/move
#[utoipa::path(
    post,
    path = "/api/leads/{id}/move",
    tag = "Leads",
    request_body = MoveStatusPayload,
    params(("id" = Uuid, Path, description = "ID da indicação")),
    responses(
        (status = 200, description = "Indicação na coluna vizinha (ou onde estava, nas pontas)", body = Lead),
        (status = 404, description = "Indicação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .lead_service
        .move_status(&viewer, id, payload.direction)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID da indicação")),
    responses(
        (status = 204, description = "Indicação excluída"),
        (status = 404, description = "Indicação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .lead_service
        .delete(&viewer, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/leads/bulk-delete
#[utoipa::path(
    post,
    path = "/api/leads/bulk-delete",
    tag = "Leads",
    request_body = BulkDeletePayload,
    responses(
        (status = 200, description = "Resultado da exclusão, uma a uma e sem rollback; ids de outros vendedores voltam em `failed`", body = BulkDeleteReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .lead_service
        .bulk_delete(&viewer, payload.ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// POST /api/leads/distribute
#[utoipa::path(
    post,
    path = "/api/leads/distribute",
    tag = "Leads",
    request_body = DistributeLeadPayload,
    responses(
        (status = 201, description = "Indicação entregue ao vendedor, na primeira coluna", body = Lead),
        (status = 400, description = "Cliente e vendedor são obrigatórios"),
        (status = 403, description = "Só o admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn distribute_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
    Json(payload): Json<DistributeLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let lead = app_state
        .lead_service
        .distribute(payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// POST /api/leads/{id}/pitch
#[utoipa::path(
    post,
    path = "/api/leads/{id}/pitch",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID da indicação")),
    responses(
        (status = 200, description = "Pitch de WhatsApp gerado pela IA", body = PitchResponse),
        (status = 404, description = "Indicação não encontrada"),
        (status = 412, description = "Chave da IA ausente ou inválida"),
        (status = 502, description = "IA indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn lead_pitch(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .lead_service
        .get(&viewer, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    let pitch = app_state
        .pitch_service
        .pitch(&lead.client_name, &lead.vehicle, &lead.notes)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(PitchResponse { pitch })))
}
