// src/db/sales_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{Sale, SaleInput, SaleStatus},
    services::bulk::RecordDeleter,
};

const SALE_COLUMNS: &str = "id, client_name, phone, seller, insurer, premium, full_commission, \
                            seller_commission, suhai, status, created_at";

// Tabela 'sales' (a coleção "vendas")
#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todas as vendas, mais recentes primeiro
    pub async fn list(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn create(&self, input: &SaleInput) -> Result<Sale, AppError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales (
                client_name, phone, seller, insurer, premium,
                full_commission, seller_commission, suhai, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(&input.client_name)
        .bind(&input.phone)
        .bind(&input.seller)
        .bind(&input.insurer)
        .bind(input.premium)
        .bind(input.full_commission)
        .bind(input.seller_commission)
        .bind(input.suhai)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn update(&self, id: Uuid, input: &SaleInput) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE sales
            SET client_name = $2,
                phone = $3,
                seller = $4,
                insurer = $5,
                premium = $6,
                full_commission = $7,
                seller_commission = $8,
                suhai = $9,
                status = $10
            WHERE id = $1
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.client_name)
        .bind(&input.phone)
        .bind(&input.seller)
        .bind(&input.insurer)
        .bind(input.premium)
        .bind(input.full_commission)
        .bind(input.seller_commission)
        .bind(input.suhai)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn update_status(&self, id: Uuid, status: SaleStatus) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "UPDATE sales SET status = $2 WHERE id = $1 RETURNING {SALE_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RecordDeleter for SaleRepository {
    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete(id).await
    }
}
