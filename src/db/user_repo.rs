// src/db/user_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

const USER_COLUMNS: &str = "id, name, login, password_hash, role, commission_pct, created_at";

// Login duplicado vira um erro de domínio; o resto segue como erro de banco.
fn map_unique_login(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_login_key") {
            return AppError::LoginAlreadyExists;
        }
    }
    e.into()
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O login é guardado sempre em minúsculas
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE login = $1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Lista apenas os vendedores (a equipe comercial)
    pub async fn list_sellers(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY name ASC"
        ))
        .bind(Role::Seller)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn create(
        &self,
        name: &str,
        login: &str,
        password_hash: &str,
        role: Role,
        commission_pct: Decimal,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, login, password_hash, role, commission_pct)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(login)
        .bind(password_hash)
        .bind(role)
        .bind(commission_pct)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_login)?;

        Ok(user)
    }

    /// Atualiza o usuário. `password_hash = None` mantém a senha atual.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        login: &str,
        password_hash: Option<&str>,
        role: Role,
        commission_pct: Decimal,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2,
                login = $3,
                password_hash = COALESCE($4, password_hash),
                role = $5,
                commission_pct = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(login)
        .bind(password_hash)
        .bind(role)
        .bind(commission_pct)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_login)?;

        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
