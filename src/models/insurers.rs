// src/models/insurers.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Seguradora ("empresa"). As vendas guardam o nome, não o id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insurer {
    pub id: Uuid,
    #[schema(example = "PORTO SEGURO")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InsurerPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub name: String,
}
