// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{GoalRepository, InsurerRepository, LeadRepository, SaleRepository, UserRepository},
    services::{
        auth::{AuthService, MasterCredentials},
        dashboard_service::DashboardService,
        goal_service::GoalService,
        insurer_service::InsurerService,
        lead_service::LeadService,
        pitch::{GeminiClient, PitchService, TextGenerator},
        realtime::ChangeHub,
        sale_service::SaleService,
        user_service::UserService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_UTC_OFFSET_HOURS: i32 = -3; // Brasília
const DEFAULT_COMPANY_GOAL_KEY: &str = "EMPRESA_VM_SEGUROS";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub master_admin: Option<MasterCredentials>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub report_offset: FixedOffset,
    pub company_goal_key: String,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        // Vazio conta como ausente
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{} deve ser definida", key));

        let offset_hours = match get("REPORT_UTC_OFFSET_HOURS") {
            Some(raw) => raw
                .parse::<i32>()
                .with_context(|| format!("REPORT_UTC_OFFSET_HOURS inválido: {}", raw))?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let report_offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or_else(|| anyhow!("REPORT_UTC_OFFSET_HOURS fora do intervalo: {}", offset_hours))?;

        let master_admin = match (get("MASTER_ADMIN_LOGIN"), get("MASTER_ADMIN_PASSWORD")) {
            (Some(login), Some(password)) => Some(MasterCredentials { login, password }),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            master_admin,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            report_offset,
            company_goal_key: get("COMPANY_GOAL_KEY").unwrap_or_else(|| DEFAULT_COMPANY_GOAL_KEY.to_string()),
            cors_origin: get("CORS_ORIGIN"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub hub: ChangeHub,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub sale_service: SaleService,
    pub lead_service: LeadService,
    pub goal_service: GoalService,
    pub insurer_service: InsurerService,
    pub dashboard_service: DashboardService,
    pub pitch_service: PitchService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let hub = ChangeHub::new();

        let user_repo = UserRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let goal_repo = GoalRepository::new(db_pool.clone());
        let insurer_repo = InsurerRepository::new(db_pool.clone());

        let generator = match &config.gemini_api_key {
            Some(key) => {
                let client = GeminiClient::new(
                    config.gemini_base_url.clone(),
                    config.gemini_model.clone(),
                    key.clone(),
                );
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            None => {
                tracing::warn!("⚠️ GEMINI_API_KEY não configurada: o assistente de IA ficará indisponível");
                None
            }
        };

        Self {
            auth_service: AuthService::new(user_repo.clone(), config.jwt_secret.clone(), config.master_admin.clone()),
            user_service: UserService::new(user_repo.clone(), hub.clone()),
            sale_service: SaleService::new(sale_repo.clone(), hub.clone()),
            lead_service: LeadService::new(lead_repo.clone(), hub.clone()),
            goal_service: GoalService::new(
                goal_repo.clone(),
                user_repo.clone(),
                hub.clone(),
                config.company_goal_key.clone(),
            ),
            insurer_service: InsurerService::new(insurer_repo, hub.clone()),
            dashboard_service: DashboardService::new(
                sale_repo,
                lead_repo,
                goal_repo,
                user_repo,
                config.report_offset,
                config.company_goal_key.clone(),
            ),
            pitch_service: PitchService::new(generator),
            hub,
            db_pool,
            config: Arc::new(config),
        }
    }
}
