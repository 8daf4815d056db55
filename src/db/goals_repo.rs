// src/db/goals_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::goals::{Goal, GoalPayload},
};

const GOAL_COLUMNS: &str = "seller_key, seller, target_count, target_premium, target_commission, updated_at";

// Tabela 'goals' (a coleção "metas"), chaveada pelo nome normalizado do vendedor
#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals ORDER BY seller_key ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(goals)
    }

    /// Grava a meta pela chave. Uma segunda gravação com a mesma chave sobrescreve a primeira.
    pub async fn upsert(&self, payload: &GoalPayload) -> Result<Goal, AppError> {
        let goal = sqlx::query_as::<_, Goal>(&format!(
            r#"
            INSERT INTO goals (seller_key, seller, target_count, target_premium, target_commission)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (seller_key) DO UPDATE
            SET seller = EXCLUDED.seller,
                target_count = EXCLUDED.target_count,
                target_premium = EXCLUDED.target_premium,
                target_commission = EXCLUDED.target_commission,
                updated_at = NOW()
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(payload.key())
        .bind(payload.seller.trim())
        .bind(payload.target_count)
        .bind(payload.target_premium)
        .bind(payload.target_commission)
        .fetch_one(&self.pool)
        .await?;
        Ok(goal)
    }
}
