// src/services/dashboard_service.rs

use chrono::{FixedOffset, Utc};

use crate::{
    common::error::AppError,
    db::{GoalRepository, LeadRepository, SaleRepository, UserRepository},
    models::{
        auth::Viewer,
        reports::{DashboardReport, FinanceReport, PerformanceReport, SuhaiReport},
    },
    services::reports::{self, ReportWindow},
};

// Carrega as coleções e entrega para as funções puras de `reports`.
#[derive(Clone)]
pub struct DashboardService {
    sales: SaleRepository,
    leads: LeadRepository,
    goals: GoalRepository,
    users: UserRepository,
    offset: FixedOffset,
    company_goal_key: String,
}

impl DashboardService {
    pub fn new(
        sales: SaleRepository,
        leads: LeadRepository,
        goals: GoalRepository,
        users: UserRepository,
        offset: FixedOffset,
        company_goal_key: String,
    ) -> Self {
        Self { sales, leads, goals, users, offset, company_goal_key }
    }

    fn window(&self) -> ReportWindow {
        ReportWindow::at(Utc::now().with_timezone(&self.offset))
    }

    pub async fn dashboard(&self, viewer: &Viewer) -> Result<DashboardReport, AppError> {
        let sales = self.sales.list().await?;
        let leads = self.leads.list().await?;
        let goals = self.goals.list().await?;

        Ok(reports::dashboard(
            &sales,
            &leads,
            &goals,
            viewer,
            &self.window(),
            &self.company_goal_key,
        ))
    }

    pub async fn finance(&self, viewer: &Viewer) -> Result<FinanceReport, AppError> {
        let sales = self.sales.list().await?;
        Ok(reports::finance(&sales, viewer))
    }

    pub async fn performance(&self) -> Result<PerformanceReport, AppError> {
        let sales = self.sales.list().await?;
        let users = self.users.list().await?;
        Ok(reports::performance(&sales, &users, &self.window()))
    }

    pub async fn suhai(&self, viewer: &Viewer) -> Result<SuhaiReport, AppError> {
        let sales = self.sales.list().await?;
        Ok(reports::suhai(&sales, viewer))
    }
}
