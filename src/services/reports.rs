// src/services/reports.rs

//! Estatísticas derivadas: funções puras sobre as listas em memória.
//!
//! Nada aqui toca o banco. O `DashboardService` carrega as coleções e chama
//! estas funções a cada requisição, sem cache.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::{
    common::names::{normalize_insurer, normalize_name, same_person},
    models::{
        auth::{Role, User, Viewer},
        goals::Goal,
        leads::{Lead, LeadStatus},
        pipeline::PipelineStage,
        reports::{
            DashboardReport, FinanceReport, GoalProgress, InsurerCount, LeadFunnelEntry,
            PerformanceReport, SaleFunnelEntry, SellerPerformance, SuhaiReport,
        },
        sales::{Sale, SaleStatus},
    },
    services::filters::scope,
};

/// Janelas de tempo dos relatórios: início de hoje e início do mês, no fuso configurado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start_of_day: DateTime<Utc>,
    pub start_of_month: DateTime<Utc>,
}

impl ReportWindow {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        let offset_secs = i64::from(now.offset().local_minus_utc());
        let local_midnight_to_utc = |date: NaiveDate| {
            (date.and_time(NaiveTime::MIN) - Duration::seconds(offset_secs)).and_utc()
        };

        let today = now.date_naive();
        let first_of_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        Self {
            start_of_day: local_midnight_to_utc(today),
            start_of_month: local_midnight_to_utc(first_of_month),
        }
    }

    pub fn is_today(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_of_day
    }

    pub fn is_this_month(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_of_month
    }
}

/// Percentual atingido da meta, arredondado e limitado a `[0, 100]`.
/// Meta zero (ou negativa) conta como 1.
pub fn percent_of_goal(actual: Decimal, target: Decimal) -> u8 {
    let target = if target <= Decimal::ZERO { Decimal::ONE } else { target };
    let actual = actual.max(Decimal::ZERO);

    actual
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .map(|pct| pct.min(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_u8())
        .unwrap_or(100)
}

// Participação de `count` em `total`, arredondada; total zero conta como 1.
fn share_pct(count: usize, total: usize) -> u8 {
    let total = total.max(1);
    let pct = (count * 200 + total) / (2 * total);
    pct.min(100) as u8
}

// Comissão cheia para o admin, parte do vendedor para o vendedor.
fn commission_for(viewer: &Viewer, sale: &Sale) -> Decimal {
    if viewer.is_admin() {
        sale.full_commission
    } else {
        sale.seller_commission
    }
}

fn goal_progress(goal: Option<&Goal>, paid_count: usize, paid_premium: Decimal, commission: Decimal) -> GoalProgress {
    // Sem meta configurada, a referência é 1/1/1.
    let (target_count, target_premium, target_commission) = match goal {
        Some(g) => (g.target_count, g.target_premium, g.target_commission),
        None => (1, Decimal::ONE, Decimal::ONE),
    };

    GoalProgress {
        target_count,
        target_premium,
        target_commission,
        count_pct: percent_of_goal(Decimal::from(paid_count as u64), Decimal::from(target_count)),
        premium_pct: percent_of_goal(paid_premium, target_premium),
        commission_pct: percent_of_goal(commission, target_commission),
    }
}

/// Os cards do dashboard para quem está olhando.
pub fn dashboard(
    sales: &[Sale],
    leads: &[Lead],
    goals: &[Goal],
    viewer: &Viewer,
    window: &ReportWindow,
    company_goal_key: &str,
) -> DashboardReport {
    let base = scope(viewer, sales);

    let today: Vec<&Sale> = base.iter().copied().filter(|s| window.is_today(s.created_at)).collect();
    let month: Vec<&Sale> = base.iter().copied().filter(|s| window.is_this_month(s.created_at)).collect();
    let month_paid: Vec<&Sale> = month.iter().copied().filter(|s| s.status.is_paid()).collect();

    let month_paid_premium: Decimal = month_paid.iter().map(|s| s.premium).sum();
    let month_commission: Decimal = month_paid.iter().map(|s| commission_for(viewer, s)).sum();

    let goal_key = if viewer.is_admin() {
        normalize_name(company_goal_key)
    } else {
        normalize_name(&viewer.name)
    };
    let goal = goals.iter().find(|g| g.seller_key == goal_key);

    let sales_funnel = SaleStatus::STAGES
        .iter()
        .map(|status| {
            let count = month.iter().filter(|s| s.status == *status).count();
            SaleFunnelEntry {
                status: *status,
                count,
                pct: share_pct(count, month.len()),
            }
        })
        .collect();

    let month_leads: Vec<&Lead> = scope(viewer, leads)
        .into_iter()
        .filter(|l| window.is_this_month(l.created_at))
        .collect();
    let lead_funnel = LeadStatus::STAGES
        .iter()
        .map(|status| {
            let count = month_leads.iter().filter(|l| l.status == *status).count();
            LeadFunnelEntry {
                status: *status,
                count,
                pct: share_pct(count, month_leads.len()),
            }
        })
        .collect();

    DashboardReport {
        today_count: today.len(),
        today_premium: today.iter().map(|s| s.premium).sum(),
        month_count: month.len(),
        month_paid_count: month_paid.len(),
        month_paid_premium,
        month_commission,
        goal: goal_progress(goal, month_paid.len(), month_paid_premium, month_commission),
        sales_funnel,
        lead_funnel,
    }
}

/// Vendas pagas (mais recentes primeiro) e a comissão total de quem está olhando.
pub fn finance(sales: &[Sale], viewer: &Viewer) -> FinanceReport {
    let mut items: Vec<Sale> = scope(viewer, sales)
        .into_iter()
        .filter(|s| s.status.is_paid())
        .cloned()
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total_commission = items.iter().map(|s| commission_for(viewer, s)).sum();

    FinanceReport { items, total_commission }
}

/// Vendas pagas marcadas como Suhai.
pub fn suhai(sales: &[Sale], viewer: &Viewer) -> SuhaiReport {
    let mut items: Vec<Sale> = scope(viewer, sales)
        .into_iter()
        .filter(|s| s.status.is_paid() && s.suhai)
        .cloned()
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    SuhaiReport {
        total_premium: items.iter().map(|s| s.premium).sum(),
        total_commission: items.iter().map(|s| commission_for(viewer, s)).sum(),
        items,
    }
}

/// Agrupa pelo nome normalizado da seguradora. Cada venda cai em exatamente um grupo.
/// Ordem: maior contagem primeiro, depois rótulo.
pub fn group_by_insurer<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<InsurerCount> {
    let mut groups: BTreeMap<String, usize> = BTreeMap::new();
    for sale in sales {
        *groups.entry(normalize_insurer(&sale.insurer)).or_default() += 1;
    }

    let mut counts: Vec<InsurerCount> = groups
        .into_iter()
        .map(|(label, count)| InsurerCount { label, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts
}

/// Produção do mês por seguradora e por vendedor.
///
/// Entram os vendedores cadastrados e qualquer nome que apareça nas vendas;
/// quem não é vendedor cadastrado só aparece se vendeu no mês.
pub fn performance(sales: &[Sale], users: &[User], window: &ReportWindow) -> PerformanceReport {
    let month: Vec<&Sale> = sales.iter().filter(|s| window.is_this_month(s.created_at)).collect();

    // chave normalizada -> (nome para exibição, é vendedor cadastrado)
    let mut roster: BTreeMap<String, (String, bool)> = BTreeMap::new();
    for user in users.iter().filter(|u| u.role == Role::Seller) {
        roster
            .entry(normalize_name(&user.name))
            .or_insert_with(|| (user.name.trim().to_string(), true));
    }
    for sale in sales {
        let key = normalize_name(&sale.seller);
        if key.is_empty() {
            continue;
        }
        roster
            .entry(key)
            .or_insert_with(|| (sale.seller.trim().to_string(), false));
    }

    let sellers = roster
        .into_iter()
        .filter_map(|(_, (name, registered))| {
            let own: Vec<&Sale> = month.iter().copied().filter(|s| same_person(&s.seller, &name)).collect();
            if own.is_empty() && !registered {
                return None;
            }
            Some(SellerPerformance {
                total: own.len(),
                by_insurer: group_by_insurer(own.iter().copied()),
                commission_produced: own.iter().map(|s| s.seller_commission).sum(),
                premium_produced: own.iter().map(|s| s.premium).sum(),
                name,
            })
        })
        .collect();

    PerformanceReport {
        by_insurer: group_by_insurer(month.iter().copied()),
        sellers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    // 17/10/2026 12:00 em Brasília
    fn now() -> DateTime<FixedOffset> {
        brt().with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        brt().with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap().with_timezone(&Utc)
    }

    fn sale(seller: &str, premium: &str, share: &str, status: SaleStatus, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            client_name: "Cliente".into(),
            phone: String::new(),
            seller: seller.into(),
            insurer: String::new(),
            premium: dec(premium),
            full_commission: dec(share) * Decimal::from(3),
            seller_commission: dec(share),
            suhai: false,
            status,
            created_at,
        }
    }

    fn viewer(name: &str, role: Role) -> Viewer {
        Viewer { user_id: None, name: name.into(), login: name.to_lowercase(), role }
    }

    fn seller_user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            login: name.to_lowercase(),
            password_hash: String::new(),
            role: Role::Seller,
            commission_pct: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn window_uses_the_configured_offset() {
        let window = ReportWindow::at(now());
        assert_eq!(window.start_of_day, Utc.with_ymd_and_hms(2026, 10, 17, 3, 0, 0).unwrap());
        assert_eq!(window.start_of_month, Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap());
        // 23h de 30/09 em Brasília já é outubro em UTC, mas não conta no mês.
        let late_september = brt().with_ymd_and_hms(2026, 9, 30, 23, 0, 0).unwrap().with_timezone(&Utc);
        assert!(!window.is_this_month(late_september));
    }

    #[test]
    fn percent_of_goal_is_clamped() {
        assert_eq!(percent_of_goal(dec("50"), dec("200")), 25);
        assert_eq!(percent_of_goal(dec("500"), dec("200")), 100);
        assert_eq!(percent_of_goal(dec("0"), dec("0")), 0);
        // Meta zero vale 1
        assert_eq!(percent_of_goal(dec("1"), dec("0")), 100);
        assert_eq!(percent_of_goal(dec("0.004"), dec("0")), 0);
        assert_eq!(percent_of_goal(dec("-10"), dec("100")), 0);
        // Arredondamento como na tela: 12,5% -> 13%
        assert_eq!(percent_of_goal(dec("1"), dec("8")), 13);
    }

    #[test]
    fn percent_of_goal_stays_in_range_for_many_inputs() {
        let values = ["0", "0.01", "1", "3", "99.99", "100", "1000", "123456789.12"];
        for actual in values {
            for target in values {
                let pct = percent_of_goal(dec(actual), dec(target));
                assert!(pct <= 100, "{actual}/{target} gave {pct}");
            }
        }
        assert_eq!(percent_of_goal(Decimal::MAX, dec("0.0000001")), 100);
    }

    #[test]
    fn share_rounds_half_up_and_guards_zero_total() {
        assert_eq!(share_pct(0, 0), 0);
        assert_eq!(share_pct(1, 3), 33);
        assert_eq!(share_pct(2, 3), 67);
        assert_eq!(share_pct(1, 8), 13);
        assert_eq!(share_pct(4, 4), 100);
    }

    // O cenário do financeiro: só a venda paga entra, com a parte do vendedor.
    #[test]
    fn finance_and_dashboard_for_a_seller() {
        let sales = vec![
            sale("A", "1000", "100", SaleStatus::PaymentDone, at(10, 9)),
            sale("A", "500", "0", SaleStatus::Inspection, at(11, 9)),
        ];
        let a = viewer("A", Role::Seller);

        let fin = finance(&sales, &a);
        assert_eq!(fin.total_commission, dec("100"));
        assert_eq!(fin.items.len(), 1);

        let dash = dashboard(&sales, &[], &[], &a, &ReportWindow::at(now()), "EMPRESA_VM_SEGUROS");
        assert_eq!(dash.month_count, 2);
        assert_eq!(dash.month_paid_count, 1);
        assert_eq!(dash.month_paid_premium, dec("1000"));
        assert_eq!(dash.month_commission, dec("100"));
        assert_eq!(dash.today_count, 0);
    }

    #[test]
    fn admin_sees_full_commission_and_company_goal() {
        let sales = vec![
            sale("A", "1000", "100", SaleStatus::PaymentDone, at(17, 8)),
            sale("B", "2000", "200", SaleStatus::PaymentDone, at(17, 9)),
            sale("B", "700", "70", SaleStatus::SendBills, at(2, 9)),
        ];
        let goals = vec![Goal {
            seller_key: "EMPRESA_VM_SEGUROS".into(),
            seller: "EMPRESA_VM_SEGUROS".into(),
            target_count: 4,
            target_premium: dec("6000"),
            target_commission: dec("0"),
            updated_at: Utc::now(),
        }];
        let admin = viewer("ADMIN MASTER", Role::Admin);

        let dash = dashboard(&sales, &[], &goals, &admin, &ReportWindow::at(now()), "EMPRESA_VM_SEGUROS");
        assert_eq!(dash.today_count, 2);
        assert_eq!(dash.today_premium, dec("3000"));
        assert_eq!(dash.month_count, 3);
        assert_eq!(dash.month_commission, dec("900"));
        assert_eq!(dash.goal.count_pct, 50);
        assert_eq!(dash.goal.premium_pct, 50);
        // meta de comissão zero conta como 1
        assert_eq!(dash.goal.commission_pct, 100);

        let funnel: Vec<usize> = dash.sales_funnel.iter().map(|f| f.count).collect();
        assert_eq!(funnel, vec![0, 1, 0, 2]);
        assert_eq!(dash.sales_funnel[3].pct, 67);

        assert_eq!(finance(&sales, &admin).total_commission, dec("900"));
    }

    #[test]
    fn missing_goal_uses_placeholder_of_one() {
        let sales = vec![sale("Ana", "10", "1", SaleStatus::PaymentDone, at(5, 9))];
        let dash = dashboard(&sales, &[], &[], &viewer("ana", Role::Seller), &ReportWindow::at(now()), "X");
        assert_eq!(dash.goal.target_count, 1);
        assert_eq!(dash.goal.count_pct, 100);
    }

    #[test]
    fn seller_goal_matches_by_normalized_name() {
        let goals = vec![Goal {
            seller_key: "ANA BEATRIZ".into(),
            seller: "Ana Beatriz".into(),
            target_count: 10,
            target_premium: dec("1000"),
            target_commission: dec("100"),
            updated_at: Utc::now(),
        }];
        let sales = vec![sale(" ana beatriz", "250", "25", SaleStatus::PaymentDone, at(3, 9))];
        let dash = dashboard(&sales, &[], &goals, &viewer("Ana  Beatriz", Role::Seller), &ReportWindow::at(now()), "X");
        assert_eq!(dash.goal.count_pct, 10);
        assert_eq!(dash.goal.premium_pct, 25);
        assert_eq!(dash.goal.commission_pct, 25);
    }

    #[test]
    fn lead_funnel_counts_month_leads_in_scope() {
        let lead = |seller: &str, status, created_at| Lead {
            id: Uuid::new_v4(),
            client_name: "c".into(),
            phone: String::new(),
            vehicle: String::new(),
            seller: seller.into(),
            suhai: false,
            notes: String::new(),
            status,
            created_at,
        };
        let leads = vec![
            lead("A", LeadStatus::New, at(12, 9)),
            lead("A", LeadStatus::Quoted, at(13, 9)),
            lead("B", LeadStatus::Quoted, at(13, 9)),
        ];
        let dash = dashboard(&[], &leads, &[], &viewer("A", Role::Seller), &ReportWindow::at(now()), "X");
        let counts: Vec<usize> = dash.lead_funnel.iter().map(|f| f.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 0]);
        assert_eq!(dash.lead_funnel[0].pct, 50);
    }

    #[test]
    fn grouping_by_insurer_keeps_every_record_once() {
        let insurers = ["", "Suhai", "SUHAI SEGURADORA", "porto seguro", "Porto  Seguro", "outras", "Outros", "Allianz"];
        let sales: Vec<Sale> = insurers
            .iter()
            .map(|name| {
                let mut s = sale("A", "1", "0", SaleStatus::Inspection, at(1, 9));
                s.insurer = name.to_string();
                s
            })
            .collect();

        let groups = group_by_insurer(&sales);
        let total: usize = groups.iter().map(|g| g.count).sum();
        assert_eq!(total, sales.len());
        assert_eq!(groups[0], InsurerCount { label: "SUHAI SEGURADORA".into(), count: 3 });
        assert!(groups.contains(&InsurerCount { label: "OUTRAS".into(), count: 2 }));
        assert!(groups.contains(&InsurerCount { label: "PORTO SEGURO".into(), count: 2 }));
    }

    #[test]
    fn performance_lists_registered_sellers_even_without_sales() {
        let sales = vec![
            sale("Igor Vicente", "1000", "100", SaleStatus::Inspection, at(9, 9)),
            sale("igor vicente", "500", "50", SaleStatus::PaymentDone, at(10, 9)),
            // de setembro: não conta no mês, e o vendedor avulso some
            {
                let mut s = sale("Freelancer", "900", "90", SaleStatus::PaymentDone, at(1, 9));
                s.created_at = Utc.with_ymd_and_hms(2026, 9, 15, 12, 0, 0).unwrap();
                s
            },
        ];
        let users = vec![seller_user("Igor Vicente"), seller_user("Luana Viera")];

        let report = performance(&sales, &users, &ReportWindow::at(now()));

        let names: Vec<&str> = report.sellers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Igor Vicente", "Luana Viera"]);

        let igor = &report.sellers[0];
        assert_eq!(igor.total, 2);
        assert_eq!(igor.commission_produced, dec("150"));
        assert_eq!(igor.premium_produced, dec("1500"));
        assert_eq!(report.sellers[1].total, 0);

        let month_total: usize = report.by_insurer.iter().map(|g| g.count).sum();
        assert_eq!(month_total, 2);
    }

    #[test]
    fn suhai_report_only_counts_paid_suhai_sales() {
        let mut paid_suhai = sale("A", "1000", "100", SaleStatus::PaymentDone, at(3, 9));
        paid_suhai.suhai = true;
        let mut open_suhai = sale("A", "800", "80", SaleStatus::AwaitingPayment, at(4, 9));
        open_suhai.suhai = true;
        let paid_plain = sale("A", "600", "60", SaleStatus::PaymentDone, at(5, 9));

        let report = suhai(&[paid_suhai, open_suhai, paid_plain], &viewer("A", Role::Seller));
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.total_premium, dec("1000"));
        assert_eq!(report.total_commission, dec("100"));
    }
}
