// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{pipeline::PipelineStage, SellerRecord};

// --- ENUMS ---

// Mapeia o CREATE TYPE sale_status do banco. Os rótulos são os do funil de vendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status")]
pub enum SaleStatus {
    #[sqlx(rename = "Fazer Vistoria")]
    #[serde(rename = "Fazer Vistoria")]
    Inspection,
    #[sqlx(rename = "Mandar Boletos")]
    #[serde(rename = "Mandar Boletos")]
    SendBills,
    #[sqlx(rename = "Falta Pagamento")]
    #[serde(rename = "Falta Pagamento")]
    AwaitingPayment,
    #[sqlx(rename = "Pagamento Efetuado")]
    #[serde(rename = "Pagamento Efetuado")]
    PaymentDone,
}

impl PipelineStage for SaleStatus {
    const STAGES: &'static [Self] = &[
        SaleStatus::Inspection,
        SaleStatus::SendBills,
        SaleStatus::AwaitingPayment,
        SaleStatus::PaymentDone,
    ];
}

impl SaleStatus {
    pub fn is_paid(self) -> bool {
        self == SaleStatus::PaymentDone
    }
}

// --- VENDA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(example = "Carlos Andrade")]
    pub client_name: String,
    #[schema(example = "(11) 98888-7777")]
    pub phone: String,
    // Nome do vendedor (comparado de forma normalizada com os usuários)
    #[schema(example = "ANA BEATRIZ")]
    pub seller: String,
    // Nome da seguradora, não o id
    #[schema(example = "SUHAI SEGURADORA")]
    pub insurer: String,
    #[schema(example = "1800.00")]
    pub premium: Decimal,
    #[schema(example = "360.00")]
    pub full_commission: Decimal,
    #[schema(example = "108.00")]
    pub seller_commission: Decimal,
    pub suhai: bool,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
}

impl SellerRecord for Sale {
    fn seller(&self) -> &str {
        &self.seller
    }

    fn client_name(&self) -> &str {
        &self.client_name
    }
}

// --- PAYLOADS ---

// Usado tanto para lançar quanto para editar uma venda.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    #[schema(example = "Carlos Andrade")]
    pub client_name: String,

    #[serde(default)]
    pub phone: String,

    // Só o admin escolhe o vendedor; para o vendedor logado é sempre ele mesmo.
    pub seller: Option<String>,

    #[serde(default)]
    #[schema(example = "Porto Seguro")]
    pub insurer: String,

    #[serde(default)]
    #[validate(custom(function = "crate::common::validation::non_negative"))]
    pub premium: Decimal,

    #[serde(default)]
    #[validate(custom(function = "crate::common::validation::non_negative"))]
    pub full_commission: Decimal,

    #[serde(default)]
    #[validate(custom(function = "crate::common::validation::non_negative"))]
    pub seller_commission: Decimal,

    #[serde(default)]
    pub suhai: bool,

    pub status: Option<SaleStatus>,
}

// O que o repositório grava, já com vendedor e status resolvidos.
#[derive(Debug, Clone)]
pub struct SaleInput {
    pub client_name: String,
    pub phone: String,
    pub seller: String,
    pub insurer: String,
    pub premium: Decimal,
    pub full_commission: Decimal,
    pub seller_commission: Decimal,
    pub suhai: bool,
    pub status: SaleStatus,
}

impl SaleInput {
    pub fn from_payload(payload: SalePayload, seller: String, status: SaleStatus) -> Self {
        Self {
            client_name: payload.client_name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            seller,
            insurer: payload.insurer.trim().to_string(),
            premium: payload.premium,
            full_commission: payload.full_commission,
            seller_commission: payload.seller_commission,
            suhai: payload.suhai,
            status,
        }
    }
}

// Uma coluna do quadro (Kanban) de vendas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleColumn {
    pub status: SaleStatus,
    pub count: usize,
    pub items: Vec<Sale>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn status_uses_portuguese_labels_on_the_wire() {
        assert_eq!(serde_json::to_value(SaleStatus::PaymentDone).unwrap(), json!("Pagamento Efetuado"));
        let parsed: SaleStatus = serde_json::from_value(json!("Mandar Boletos")).unwrap();
        assert_eq!(parsed, SaleStatus::SendBills);
    }

    #[test]
    fn payload_defaults_amounts_to_zero() {
        let payload: SalePayload = serde_json::from_value(json!({ "clientName": "Maria" })).unwrap();
        assert!(payload.premium.is_zero());
        assert!(!payload.suhai);
        assert!(payload.status.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn payload_rejects_blank_client_and_negative_premium() {
        let payload: SalePayload = serde_json::from_value(json!({
            "clientName": "  ",
            "premium": -10.0
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("client_name"));
        assert!(fields.contains_key("premium"));
    }
}
