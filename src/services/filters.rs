// src/services/filters.rs

use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::names::{normalize_name, same_person},
    models::{auth::Viewer, pipeline::PipelineStage, SellerRecord},
};

// Valor do filtro de vendedor que significa "todos"
pub const ALL_SELLERS: &str = "TODOS";

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFilter {
    /// Filtro por vendedor (só para o admin). Ausente ou `TODOS` = todos.
    pub seller: Option<String>,
    /// Busca por nome do cliente ou do vendedor, sem diferenciar maiúsculas.
    pub search: Option<String>,
}

/// O admin vê tudo; o vendedor só vê o que está no nome dele.
pub fn visible_to<T: SellerRecord>(viewer: &Viewer, record: &T) -> bool {
    viewer.is_admin() || same_person(record.seller(), &viewer.name)
}

pub fn scope<'a, T: SellerRecord>(viewer: &Viewer, records: &'a [T]) -> Vec<&'a T> {
    records.iter().filter(|r| visible_to(viewer, *r)).collect()
}

/// Aplica escopo do usuário, filtro de vendedor e busca, preservando a ordem.
pub fn apply<T: SellerRecord>(records: Vec<T>, viewer: &Viewer, filter: &ListFilter) -> Vec<T> {
    let seller_filter = filter
        .seller
        .as_deref()
        .map(normalize_name)
        .filter(|s| !s.is_empty() && s != ALL_SELLERS);

    let search = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    records
        .into_iter()
        .filter(|r| visible_to(viewer, r))
        .filter(|r| match (&seller_filter, viewer.is_admin()) {
            (Some(wanted), true) => normalize_name(r.seller()) == *wanted,
            _ => true,
        })
        .filter(|r| match &search {
            Some(term) => {
                r.client_name().to_lowercase().contains(term)
                    || r.seller().to_lowercase().contains(term)
            }
            None => true,
        })
        .collect()
}

/// Vendedor gravado no registro: o admin escolhe (ou herda o atual);
/// o vendedor logado é sempre ele mesmo.
pub fn resolve_seller(viewer: &Viewer, requested: Option<&str>, current: Option<&str>) -> String {
    if !viewer.is_admin() {
        return viewer.name.trim().to_string();
    }
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(current)
        .unwrap_or(viewer.name.as_str())
        .trim()
        .to_string()
}

/// Separa os registros nas colunas do quadro, na ordem do funil.
pub fn columns<T, S: PipelineStage>(records: Vec<T>, status_of: impl Fn(&T) -> S) -> Vec<(S, Vec<T>)> {
    let mut cols: Vec<(S, Vec<T>)> = S::STAGES.iter().map(|s| (*s, Vec::new())).collect();
    for record in records {
        let status = status_of(&record);
        if let Some(col) = cols.iter_mut().find(|(s, _)| *s == status) {
            col.1.push(record);
        }
    }
    cols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    struct Row {
        client: &'static str,
        seller: &'static str,
    }

    impl SellerRecord for Row {
        fn seller(&self) -> &str {
            self.seller
        }
        fn client_name(&self) -> &str {
            self.client
        }
    }

    fn viewer(name: &str, role: Role) -> Viewer {
        Viewer {
            user_id: None,
            name: name.to_string(),
            login: name.to_lowercase(),
            role,
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { client: "Carlos Andrade", seller: "Ana Beatriz" },
            Row { client: "Marcos Lima", seller: "IGOR VICENTE" },
            Row { client: "Paula Souza", seller: " ana  beatriz" },
        ]
    }

    #[test]
    fn sellers_only_see_their_own_records() {
        let result = apply(rows(), &viewer("ANA BEATRIZ", Role::Seller), &ListFilter::default());
        let clients: Vec<_> = result.iter().map(|r| r.client).collect();
        assert_eq!(clients, vec!["Carlos Andrade", "Paula Souza"]);
    }

    #[test]
    fn admin_seller_filter_and_todos() {
        let admin = viewer("ADMIN MASTER", Role::Admin);
        let only_igor = ListFilter { seller: Some("igor vicente".into()), search: None };
        assert_eq!(apply(rows(), &admin, &only_igor).len(), 1);

        let all = ListFilter { seller: Some(ALL_SELLERS.into()), search: None };
        assert_eq!(apply(rows(), &admin, &all).len(), 3);
    }

    #[test]
    fn seller_filter_is_ignored_for_sellers() {
        let filter = ListFilter { seller: Some("IGOR VICENTE".into()), search: None };
        let result = apply(rows(), &viewer("Ana Beatriz", Role::Seller), &filter);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn search_matches_client_or_seller_case_insensitively() {
        let admin = viewer("ADMIN MASTER", Role::Admin);
        let by_client = ListFilter { seller: None, search: Some("  PAULA ".into()) };
        assert_eq!(apply(rows(), &admin, &by_client).len(), 1);

        let by_seller = ListFilter { seller: None, search: Some("igor".into()) };
        assert_eq!(apply(rows(), &admin, &by_seller)[0].client, "Marcos Lima");
    }

    #[test]
    fn only_admins_choose_the_seller() {
        let admin = viewer("ADMIN MASTER", Role::Admin);
        assert_eq!(resolve_seller(&admin, Some(" Luana Viera "), Some("Igor")), "Luana Viera");
        assert_eq!(resolve_seller(&admin, Some("  "), Some("Igor")), "Igor");
        assert_eq!(resolve_seller(&admin, None, None), "ADMIN MASTER");

        let ana = viewer("Ana Beatriz", Role::Seller);
        assert_eq!(resolve_seller(&ana, Some("Igor"), Some("Igor")), "Ana Beatriz");
    }

    #[test]
    fn columns_follow_pipeline_order() {
        use crate::models::sales::SaleStatus;

        let records = vec![
            ("a", SaleStatus::PaymentDone),
            ("b", SaleStatus::Inspection),
            ("c", SaleStatus::PaymentDone),
        ];
        let cols = columns(records, |(_, status)| *status);
        let shape: Vec<(SaleStatus, usize)> = cols.iter().map(|(s, items)| (*s, items.len())).collect();
        assert_eq!(
            shape,
            vec![
                (SaleStatus::Inspection, 1),
                (SaleStatus::SendBills, 0),
                (SaleStatus::AwaitingPayment, 0),
                (SaleStatus::PaymentDone, 2),
            ]
        );
    }
}
