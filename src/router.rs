// src/router.rs

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users).post(handlers::users::create_user))
        .route("/me", get(handlers::auth::get_me))
        .route("/sellers", get(handlers::users::list_sellers))
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        );

    let sales_routes = Router::new()
        .route("/", get(handlers::sales::list_sales).post(handlers::sales::create_sale))
        .route("/board", get(handlers::sales::sales_board))
        .route("/bulk-delete", post(handlers::sales::bulk_delete_sales))
        .route(
            "/{id}",
            put(handlers::sales::update_sale).delete(handlers::sales::delete_sale),
        )
        .route("/{id}/move", post(handlers::sales::move_sale));

    let leads_routes = Router::new()
        .route("/", get(handlers::leads::list_leads).post(handlers::leads::create_lead))
        .route("/board", get(handlers::leads::leads_board))
        .route("/bulk-delete", post(handlers::leads::bulk_delete_leads))
        .route("/distribute", post(handlers::leads::distribute_lead))
        .route(
            "/{id}",
            put(handlers::leads::update_lead).delete(handlers::leads::delete_lead),
        )
        .route("/{id}/move", post(handlers::leads::move_lead))
        .route("/{id}/pitch", post(handlers::leads::lead_pitch));

    let goal_routes = Router::new().route(
        "/",
        get(handlers::goals::get_goals).put(handlers::goals::upsert_goal),
    );

    let insurer_routes = Router::new()
        .route(
            "/",
            get(handlers::insurers::list_insurers).post(handlers::insurers::create_insurer),
        )
        .route(
            "/{id}",
            put(handlers::insurers::update_insurer).delete(handlers::insurers::delete_insurer),
        );

    let report_routes = Router::new()
        .route("/dashboard", get(handlers::reports::get_dashboard))
        .route("/finance", get(handlers::reports::get_finance))
        .route("/performance", get(handlers::reports::get_performance))
        .route(
            "/performance/{seller}/sales",
            delete(handlers::reports::purge_seller_sales),
        )
        .route("/suhai", get(handlers::reports::get_suhai));

    let ai_routes = Router::new()
        .route("/pitch", post(handlers::ai::generate_pitch))
        .route("/suggest-status", post(handlers::ai::suggest_status));

    let stream_routes = Router::new().route("/{collection}", get(handlers::stream::stream_collection));

    // Tudo aqui exige token
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/sales", sales_routes)
        .nest("/leads", leads_routes)
        .nest("/goals", goal_routes)
        .nest("/insurers", insurer_routes)
        .nest("/reports", report_routes)
        .nest("/ai", ai_routes)
        .nest("/stream", stream_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let cors = cors_layer(app_state.config.cors_origin.as_deref());

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

// Sem CORS_ORIGIN configurada, qualquer origem passa
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => layer.allow_origin(value),
        Some(Err(_)) => {
            tracing::warn!("⚠️ CORS_ORIGIN inválida; liberando todas as origens");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
