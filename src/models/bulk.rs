// src/models/bulk.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeletePayload {
    pub ids: Vec<Uuid>,
}

// Resultado de uma exclusão em lote. Não há rollback: falhas parciais ficam listadas.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteReport {
    pub requested: usize,
    pub deleted: usize,
    pub failed: Vec<Uuid>,
}
