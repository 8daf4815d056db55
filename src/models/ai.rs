// src/models/ai.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::leads::LeadStatus;

// Pitch avulso, sem indicação cadastrada
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PitchPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    #[schema(example = "Paula Souza")]
    pub client_name: String,
    #[serde(default)]
    #[schema(example = "Onix 2021")]
    pub vehicle: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PitchResponse {
    pub pitch: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestStatusPayload {
    #[schema(example = "Cliente pediu cotação pelo WhatsApp e ainda não respondeu.")]
    pub history: String,
}

// `status` nulo quando a IA falha ou responde algo fora do funil
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestStatusResponse {
    pub status: Option<LeadStatus>,
}
