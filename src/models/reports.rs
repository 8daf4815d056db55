// src/models/reports.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{leads::LeadStatus, sales::{Sale, SaleStatus}};

// 1. Dashboard (os cards do topo + funil)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub today_count: usize,
    pub today_premium: Decimal,
    // Todas as vendas do mês, qualquer status
    pub month_count: usize,
    // Só as pagas contam para as metas
    pub month_paid_count: usize,
    pub month_paid_premium: Decimal,
    // Comissão cheia para o admin, parte do vendedor para o vendedor
    pub month_commission: Decimal,
    pub goal: GoalProgress,
    pub sales_funnel: Vec<SaleFunnelEntry>,
    pub lead_funnel: Vec<LeadFunnelEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub target_count: i32,
    pub target_premium: Decimal,
    pub target_commission: Decimal,
    pub count_pct: u8,
    pub premium_pct: u8,
    pub commission_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleFunnelEntry {
    pub status: SaleStatus,
    pub count: usize,
    pub pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadFunnelEntry {
    pub status: LeadStatus,
    pub count: usize,
    pub pct: u8,
}

// 2. Financeiro (vendas pagas)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceReport {
    pub items: Vec<Sale>,
    pub total_commission: Decimal,
}

// 3. Performance da equipe no mês
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsurerCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerPerformance {
    pub name: String,
    pub total: usize,
    pub by_insurer: Vec<InsurerCount>,
    pub commission_produced: Decimal,
    pub premium_produced: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub by_insurer: Vec<InsurerCount>,
    pub sellers: Vec<SellerPerformance>,
}

// 4. Suhai (vendas pagas marcadas como Suhai)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuhaiReport {
    pub items: Vec<Sale>,
    pub total_premium: Decimal,
    pub total_commission: Decimal,
}
