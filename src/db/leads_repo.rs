// src/db/leads_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::leads::{Lead, LeadInput, LeadStatus},
    services::bulk::RecordDeleter,
};

const LEAD_COLUMNS: &str = "id, client_name, phone, vehicle, seller, suhai, notes, status, created_at";

// Tabela 'leads' (a coleção "indicacoes")
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn create(&self, input: &LeadInput) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (client_name, phone, vehicle, seller, suhai, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(&input.client_name)
        .bind(&input.phone)
        .bind(&input.vehicle)
        .bind(&input.seller)
        .bind(input.suhai)
        .bind(&input.notes)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn update(&self, id: Uuid, input: &LeadInput) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET client_name = $2,
                phone = $3,
                vehicle = $4,
                seller = $5,
                suhai = $6,
                notes = $7,
                status = $8
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.client_name)
        .bind(&input.phone)
        .bind(&input.vehicle)
        .bind(&input.seller)
        .bind(input.suhai)
        .bind(&input.notes)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn update_status(&self, id: Uuid, status: LeadStatus) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "UPDATE leads SET status = $2 WHERE id = $1 RETURNING {LEAD_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RecordDeleter for LeadRepository {
    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete(id).await
    }
}
