// src/models/goals.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::names::normalize_name;

// Meta de um vendedor ou da empresa. A chave é o nome normalizado: nunca há duas metas por vendedor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[schema(example = "ANA BEATRIZ")]
    pub seller_key: String,
    #[schema(example = "Ana Beatriz")]
    pub seller: String,
    #[schema(example = 20)]
    pub target_count: i32,
    #[schema(example = "40000.00")]
    pub target_premium: Decimal,
    // Meta de comissão/salário
    #[schema(example = "3500.00")]
    pub target_commission: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Meta ainda não configurada: tudo zerado.
    pub fn unset(seller: &str) -> Self {
        Self {
            seller_key: normalize_name(seller),
            seller: seller.trim().to_string(),
            target_count: 0,
            target_premium: Decimal::ZERO,
            target_commission: Decimal::ZERO,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub seller: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "must_not_be_negative"))]
    pub target_count: i32,
    #[serde(default)]
    #[validate(custom(function = "crate::common::validation::non_negative"))]
    pub target_premium: Decimal,
    #[serde(default)]
    #[validate(custom(function = "crate::common::validation::non_negative"))]
    pub target_commission: Decimal,
}

impl GoalPayload {
    pub fn key(&self) -> String {
        normalize_name(&self.seller)
    }
}

// Resposta da tela de metas: meta da empresa + uma por vendedor
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalBoard {
    pub company: Goal,
    pub sellers: Vec<Goal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn key_is_the_normalized_seller_name() {
        let a: GoalPayload = serde_json::from_value(json!({ "seller": "ana  beatriz" })).unwrap();
        let b: GoalPayload = serde_json::from_value(json!({ "seller": " ANA BEATRIZ" })).unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn negative_targets_are_rejected() {
        let payload: GoalPayload = serde_json::from_value(json!({
            "seller": "ana",
            "targetCount": -1
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }
}
