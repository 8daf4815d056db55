// src/db/insurers_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::insurers::Insurer};

// Tabela 'insurers' (a coleção "empresas")
#[derive(Clone)]
pub struct InsurerRepository {
    pool: PgPool,
}

impl InsurerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Em ordem alfabética, como aparece no formulário de venda
    pub async fn list(&self) -> Result<Vec<Insurer>, AppError> {
        let insurers = sqlx::query_as::<_, Insurer>(
            "SELECT id, name, created_at FROM insurers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(insurers)
    }

    pub async fn create(&self, name: &str) -> Result<Insurer, AppError> {
        let insurer = sqlx::query_as::<_, Insurer>(
            "INSERT INTO insurers (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(insurer)
    }

    pub async fn update(&self, id: Uuid, name: &str) -> Result<Option<Insurer>, AppError> {
        let insurer = sqlx::query_as::<_, Insurer>(
            "UPDATE insurers SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(insurer)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM insurers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
