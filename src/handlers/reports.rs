// src/handlers/reports.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::Admin},
    models::{
        bulk::BulkDeleteReport,
        reports::{DashboardReport, FinanceReport, PerformanceReport, SuhaiReport},
    },
};

// GET /api/reports/dashboard
#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Cards do dia/mês, progresso da meta e funis", body = DashboardReport),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .dashboard(&viewer)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/finance
#[utoipa::path(
    get,
    path = "/api/reports/finance",
    tag = "Reports",
    responses(
        (status = 200, description = "Vendas pagas e comissão total", body = FinanceReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_finance(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .finance(&viewer)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/performance
#[utoipa::path(
    get,
    path = "/api/reports/performance",
    tag = "Reports",
    responses(
        (status = 200, description = "Produção do mês por seguradora e por vendedor", body = PerformanceReport),
        (status = 403, description = "Só o admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_performance(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .performance()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// DELETE /api/reports/performance/{seller}/sales
#[utoipa::path(
    delete,
    path = "/api/reports/performance/{seller}/sales",
    tag = "Reports",
    params(("seller" = String, Path, description = "Nome do vendedor")),
    responses(
        (status = 200, description = "Produção do vendedor apagada, venda a venda", body = BulkDeleteReport),
        (status = 403, description = "Só o admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn purge_seller_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: Admin,
    Path(seller): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if seller.trim().is_empty() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("seller", validator::ValidationError::new("blank").with_message("required".into()));
        return Err(AppError::ValidationError(errors).to_api_error(&locale));
    }

    let report = app_state
        .sale_service
        .purge_seller(&seller)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/reports/suhai
#[utoipa::path(
    get,
    path = "/api/reports/suhai",
    tag = "Reports",
    responses(
        (status = 200, description = "Vendas Suhai pagas com totais de prêmio e comissão", body = SuhaiReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_suhai(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .suhai(&viewer)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}
