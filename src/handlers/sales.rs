// src/handlers/sales.rs

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
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        bulk::{BulkDeletePayload, BulkDeleteReport},
        pipeline::MoveStatusPayload,
        sales::{Sale, SaleColumn, SalePayload},
    },
    services::filters::ListFilter,
};

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(ListFilter),
    responses(
        (status = 200, description = "Vendas visíveis para o usuário, mais recentes primeiro", body = Vec<Sale>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Query(filter): Query<ListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let sales = app_state
        .sale_service
        .list(&viewer, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/sales/board
#[utoipa::path(
    get,
    path = "/api/sales/board",
    tag = "Sales",
    params(ListFilter),
    responses(
        (status = 200, description = "Quadro de vendas: uma coluna por status, na ordem do funil", body = Vec<SaleColumn>)
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_board(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Query(filter): Query<ListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let board = app_state
        .sale_service
        .board(&viewer, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(board)))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = SalePayload,
    responses(
        (status = 201, description = "Venda lançada", body = Sale),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let sale = app_state
        .sale_service
        .create(&viewer, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// PUT /api/sales/{id}
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    tag = "Sales",
    request_body = SalePayload,
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda atualizada", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let sale = app_state
        .sale_service
        .update(&viewer, id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sale)))
}

// POST /api/sales/{id}/move
#[utoipa::path(
    post,
    path = "/api/sales/{id}/move",
    tag = "Sales",
    request_body = MoveStatusPayload,
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda na coluna vizinha (ou onde estava, nas pontas)", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .sale_service
        .move_status(&viewer, id, payload.direction)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 204, description = "Venda excluída"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .sale_service
        .delete(&viewer, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/sales/bulk-delete
#[utoipa::path(
    post,
    path = "/api/sales/bulk-delete",
    tag = "Sales",
    request_body = BulkDeletePayload,
    responses(
        (status = 200, description = "Resultado da exclusão, uma a uma e sem rollback; ids de outros vendedores voltam em `failed`", body = BulkDeleteReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .sale_service
        .bulk_delete(&viewer, payload.ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}
