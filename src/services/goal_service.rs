// src/services/goal_service.rs

use crate::{
    common::{error::AppError, names::normalize_name},
    db::{GoalRepository, UserRepository},
    models::goals::{Goal, GoalBoard, GoalPayload},
    services::realtime::{ChangeHub, Collection},
};

#[derive(Clone)]
pub struct GoalService {
    repo: GoalRepository,
    user_repo: UserRepository,
    hub: ChangeHub,
    company_key: String,
}

impl GoalService {
    pub fn new(repo: GoalRepository, user_repo: UserRepository, hub: ChangeHub, company_key: String) -> Self {
        Self { repo, user_repo, hub, company_key }
    }

    pub async fn list(&self) -> Result<Vec<Goal>, AppError> {
        self.repo.list().await
    }

    /// Meta da empresa e uma por vendedor cadastrado, zeradas quando ainda não existem.
    pub async fn board(&self) -> Result<GoalBoard, AppError> {
        let goals = self.repo.list().await?;
        let sellers = self.user_repo.list_sellers().await?;
        Ok(assemble_board(goals, sellers.iter().map(|u| u.name.as_str()), &self.company_key))
    }

    /// Salvar de novo com o mesmo nome sobrescreve: a chave é o nome normalizado.
    pub async fn upsert(&self, payload: GoalPayload) -> Result<Goal, AppError> {
        let goal = self.repo.upsert(&payload).await?;
        tracing::info!("🎯 Meta de '{}' atualizada", goal.seller_key);
        self.hub.publish(Collection::Goals);
        Ok(goal)
    }
}

fn assemble_board<'a>(goals: Vec<Goal>, sellers: impl IntoIterator<Item = &'a str>, company_key: &str) -> GoalBoard {
    let find = |name: &str| {
        let key = normalize_name(name);
        goals
            .iter()
            .find(|g| g.seller_key == key)
            .cloned()
            .unwrap_or_else(|| Goal::unset(name))
    };

    let mut seen = Vec::new();
    let mut seller_goals = Vec::new();
    for name in sellers {
        let key = normalize_name(name);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        seller_goals.push(find(name));
    }

    GoalBoard {
        company: find(company_key),
        sellers: seller_goals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn goal(seller: &str, count: i32) -> Goal {
        Goal {
            seller_key: normalize_name(seller),
            seller: seller.into(),
            target_count: count,
            target_premium: Decimal::from(1000),
            target_commission: Decimal::from(100),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn board_zero_fills_sellers_without_goals() {
        let goals = vec![goal("EMPRESA_VM_SEGUROS", 50), goal("Igor Vicente", 12)];
        let board = assemble_board(goals, ["igor vicente", "Luana Viera", "LUANA  VIERA"], "EMPRESA_VM_SEGUROS");

        assert_eq!(board.company.target_count, 50);
        assert_eq!(board.sellers.len(), 2);
        assert_eq!(board.sellers[0].target_count, 12);
        assert_eq!(board.sellers[1].seller_key, "LUANA VIERA");
        assert_eq!(board.sellers[1].target_count, 0);
        assert_eq!(board.sellers[1].target_premium, Decimal::ZERO);
    }

    #[test]
    fn missing_company_goal_is_unset() {
        let board = assemble_board(vec![], std::iter::empty(), "EMPRESA_VM_SEGUROS");
        assert_eq!(board.company.seller_key, "EMPRESA_VM_SEGUROS");
        assert_eq!(board.company.target_count, 0);
    }
}
