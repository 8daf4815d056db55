// src/models/auth.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco (setor do usuário)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "VENDEDOR")]
    #[sqlx(rename = "VENDEDOR")]
    Seller,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "ANA BEATRIZ")]
    pub name: String,
    #[schema(example = "ana")]
    pub login: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    // Percentual de comissão do vendedor
    #[schema(example = "30.00")]
    pub commission_pct: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Quem está fazendo a requisição, montado a partir do token.
/// O admin mestre (credencial de configuração) não tem linha no banco: `user_id` é `None`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub login: String,
    pub role: Role,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<User> for Viewer {
    fn from(user: User) -> Self {
        Self {
            user_id: Some(user.id),
            name: user.name,
            login: user.login,
            role: user.role,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    #[schema(example = "ana")]
    pub username: String,
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: Viewer,
}

// Cadastro/edição de usuário pelo admin. Na edição, senha ausente mantém a atual.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub name: String,
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub login: String,
    #[validate(length(min = 4, message = "A senha deve ter no mínimo 4 caracteres."))]
    pub password: Option<String>,
    pub role: Role,
    #[serde(default)]
    #[validate(custom(function = "crate::common::validation::percentage"))]
    pub commission_pct: Decimal,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // ID do usuário (Uuid::nil() para o admin mestre)
    pub name: String,
    pub login: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_use_sector_names() {
        assert_eq!(serde_json::to_value(Role::Seller).unwrap(), json!("VENDEDOR"));
        assert_eq!(serde_json::from_value::<Role>(json!("ADMIN")).unwrap(), Role::Admin);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "ANA".into(),
            login: "ana".into(),
            password_hash: "$2b$secret".into(),
            role: Role::Seller,
            commission_pct: Decimal::new(30, 0),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["role"], "VENDEDOR");
    }

    #[test]
    fn commission_above_one_hundred_percent_is_invalid() {
        let payload = |pct: f64| -> UserPayload {
            serde_json::from_value(json!({
                "name": "Ana",
                "login": "ana",
                "role": "VENDEDOR",
                "commissionPct": pct
            }))
            .unwrap()
        };

        assert!(payload(30.0).validate().is_ok());
        let errors = payload(1000.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("commission_pct"));
    }
}
