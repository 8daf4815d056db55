// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_sellers,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::sales_board,
        handlers::sales::create_sale,
        handlers::sales::update_sale,
        handlers::sales::move_sale,
        handlers::sales::delete_sale,
        handlers::sales::bulk_delete_sales,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::leads_board,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::move_lead,
        handlers::leads::delete_lead,
        handlers::leads::bulk_delete_leads,
        handlers::leads::distribute_lead,
        handlers::leads::lead_pitch,

        // --- Goals ---
        handlers::goals::get_goals,
        handlers::goals::upsert_goal,

        // --- Insurers ---
        handlers::insurers::list_insurers,
        handlers::insurers::create_insurer,
        handlers::insurers::update_insurer,
        handlers::insurers::delete_insurer,

        // --- Reports ---
        handlers::reports::get_dashboard,
        handlers::reports::get_finance,
        handlers::reports::get_performance,
        handlers::reports::purge_seller_sales,
        handlers::reports::get_suhai,

        // --- AI ---
        handlers::ai::generate_pitch,
        handlers::ai::suggest_status,

        // --- Realtime ---
        handlers::stream::stream_collection,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::Viewer,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::UserPayload,

            // --- Pipeline ---
            models::pipeline::Direction,
            models::pipeline::MoveStatusPayload,

            // --- Sales ---
            models::sales::SaleStatus,
            models::sales::Sale,
            models::sales::SalePayload,
            models::sales::SaleColumn,

            // --- Leads ---
            models::leads::LeadStatus,
            models::leads::Lead,
            models::leads::LeadPayload,
            models::leads::DistributeLeadPayload,
            models::leads::LeadColumn,

            // --- Bulk ---
            models::bulk::BulkDeletePayload,
            models::bulk::BulkDeleteReport,

            // --- Goals ---
            models::goals::Goal,
            models::goals::GoalPayload,
            models::goals::GoalBoard,

            // --- Insurers ---
            models::insurers::Insurer,
            models::insurers::InsurerPayload,

            // --- Reports ---
            models::reports::DashboardReport,
            models::reports::GoalProgress,
            models::reports::SaleFunnelEntry,
            models::reports::LeadFunnelEntry,
            models::reports::FinanceReport,
            models::reports::InsurerCount,
            models::reports::SellerPerformance,
            models::reports::PerformanceReport,
            models::reports::SuhaiReport,

            // --- AI ---
            models::ai::PitchPayload,
            models::ai::PitchResponse,
            models::ai::SuggestStatusPayload,
            models::ai::SuggestStatusResponse,

            // --- Realtime ---
            services::realtime::Collection,
            services::realtime::SnapshotDiff,
        )
    ),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Users", description = "Usuário logado e cadastro de usuários"),
        (name = "Sales", description = "Vendas e quadro de vendas"),
        (name = "Leads", description = "Indicações, distribuição e pitch"),
        (name = "Goals", description = "Metas da empresa e dos vendedores"),
        (name = "Insurers", description = "Seguradoras"),
        (name = "Reports", description = "Dashboard, financeiro, performance e Suhai"),
        (name = "AI", description = "Assistente de vendas com IA"),
        (name = "Realtime", description = "Coleções ao vivo via Server-Sent Events")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
