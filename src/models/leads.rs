// src/models/leads.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::names::normalize_name;
use crate::models::{pipeline::PipelineStage, SellerRecord};

// Mapeia o CREATE TYPE lead_status do banco (funil de qualificação de indicações)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status")]
pub enum LeadStatus {
    #[sqlx(rename = "NOVA INDICAÇÃO")]
    #[serde(rename = "NOVA INDICAÇÃO")]
    New,
    #[sqlx(rename = "WHATSAPP")]
    #[serde(rename = "WHATSAPP")]
    Whatsapp,
    #[sqlx(rename = "COTAÇÃO REALIZADA")]
    #[serde(rename = "COTAÇÃO REALIZADA")]
    Quoted,
    #[sqlx(rename = "COBRAR ATENÇÃO")]
    #[serde(rename = "COBRAR ATENÇÃO")]
    FollowUp,
}

impl PipelineStage for LeadStatus {
    const STAGES: &'static [Self] = &[
        LeadStatus::New,
        LeadStatus::Whatsapp,
        LeadStatus::Quoted,
        LeadStatus::FollowUp,
    ];
}

impl LeadStatus {
    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "NOVA INDICAÇÃO",
            LeadStatus::Whatsapp => "WHATSAPP",
            LeadStatus::Quoted => "COTAÇÃO REALIZADA",
            LeadStatus::FollowUp => "COBRAR ATENÇÃO",
        }
    }

    /// Reconhece um status em texto livre (resposta da IA), com ou sem acentos.
    pub fn parse_loose(text: &str) -> Option<Self> {
        let cleaned = normalize_name(
            &text
                .replace(['*', '"', '\'', '.', '`'], " ")
                .replace('Ç', "C")
                .replace('ç', "c")
                .replace(['Ã', 'ã'], "A"),
        );

        // O mais específico primeiro: "COTACAO REALIZADA" também contém outras palavras.
        let candidates = [
            (LeadStatus::Quoted, "COTACAO REALIZADA"),
            (LeadStatus::FollowUp, "COBRAR ATENCAO"),
            (LeadStatus::New, "NOVA INDICACAO"),
            (LeadStatus::Whatsapp, "WHATSAPP"),
        ];

        candidates
            .iter()
            .find(|(_, label)| cleaned.contains(label))
            .map(|(status, _)| *status)
    }
}

// --- INDICAÇÃO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(example = "Paula Souza")]
    pub client_name: String,
    pub phone: String,
    #[schema(example = "Onix 2021")]
    pub vehicle: String,
    pub seller: String,
    pub suhai: bool,
    // Observações livres
    pub notes: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl SellerRecord for Lead {
    fn seller(&self) -> &str {
        &self.seller
    }

    fn client_name(&self) -> &str {
        &self.client_name
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub client_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub vehicle: String,
    pub seller: Option<String>,
    #[serde(default)]
    pub suhai: bool,
    #[serde(default)]
    pub notes: String,
    pub status: Option<LeadStatus>,
}

// Distribuição de indicação pelo admin: cliente e vendedor são obrigatórios.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributeLeadPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub client_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub vehicle: String,
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    #[schema(example = "LUANA VIERA")]
    pub seller: String,
    #[serde(default)]
    pub suhai: bool,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct LeadInput {
    pub client_name: String,
    pub phone: String,
    pub vehicle: String,
    pub seller: String,
    pub suhai: bool,
    pub notes: String,
    pub status: LeadStatus,
}

impl LeadInput {
    pub fn from_payload(payload: LeadPayload, seller: String, status: LeadStatus) -> Self {
        Self {
            client_name: payload.client_name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            vehicle: payload.vehicle.trim().to_string(),
            seller,
            suhai: payload.suhai,
            notes: payload.notes,
            status,
        }
    }
}

impl From<DistributeLeadPayload> for LeadInput {
    fn from(payload: DistributeLeadPayload) -> Self {
        Self {
            client_name: payload.client_name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            vehicle: payload.vehicle.trim().to_string(),
            seller: payload.seller.trim().to_string(),
            suhai: payload.suhai,
            notes: payload.notes,
            status: LeadStatus::first(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadColumn {
    pub status: LeadStatus,
    pub count: usize,
    pub items: Vec<Lead>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_parsing_handles_accents_and_noise() {
        assert_eq!(LeadStatus::parse_loose("COTAÇÃO REALIZADA"), Some(LeadStatus::Quoted));
        assert_eq!(LeadStatus::parse_loose("**Cotacao realizada**."), Some(LeadStatus::Quoted));
        assert_eq!(LeadStatus::parse_loose("whatsapp"), Some(LeadStatus::Whatsapp));
        assert_eq!(LeadStatus::parse_loose(" Cobrar atenção\n"), Some(LeadStatus::FollowUp));
        assert_eq!(LeadStatus::parse_loose("não sei"), None);
    }

    #[test]
    fn labels_match_the_wire_format() {
        for status in LeadStatus::STAGES {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.label()));
        }
    }

    #[test]
    fn distributed_leads_start_at_the_first_stage() {
        let payload: DistributeLeadPayload = serde_json::from_value(json!({
            "clientName": " Paula ",
            "seller": " Luana Viera ",
            "suhai": true
        }))
        .unwrap();
        let input = LeadInput::from(payload);
        assert_eq!(input.status, LeadStatus::New);
        assert_eq!(input.client_name, "Paula");
        assert_eq!(input.seller, "Luana Viera");
        assert!(input.suhai);
    }
}
