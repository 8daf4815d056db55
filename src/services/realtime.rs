// src/services/realtime.rs

//! Sincronização em tempo real das coleções.
//!
//! Toda escrita publica um [`ChangeEvent`] no [`ChangeHub`]. Quem assina recebe
//! primeiro a lista completa e, a cada mudança, só a diferença chaveada por id.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use crate::models::{auth::User, goals::Goal, insurers::Insurer, leads::Lead, sales::Sale};

const HUB_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Collection {
    #[serde(rename = "vendas")]
    Sales,
    #[serde(rename = "usuarios")]
    Users,
    #[serde(rename = "metas")]
    Goals,
    #[serde(rename = "indicacoes")]
    Leads,
    #[serde(rename = "empresas")]
    Insurers,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Sales => "vendas",
            Collection::Users => "usuarios",
            Collection::Goals => "metas",
            Collection::Leads => "indicacoes",
            Collection::Insurers => "empresas",
        }
    }

    // Usuários e metas só aparecem para o admin
    pub fn admin_only(self) -> bool {
        matches!(self, Collection::Users | Collection::Goals)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendas" | "sales" => Ok(Collection::Sales),
            "usuarios" | "users" => Ok(Collection::Users),
            "metas" | "goals" => Ok(Collection::Goals),
            "indicacoes" | "leads" => Ok(Collection::Leads),
            "empresas" | "insurers" => Ok(Collection::Insurers),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
}

#[derive(Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, collection: Collection) {
        // Sem assinantes o envio falha; ninguém perdeu nada.
        let _ = self.tx.send(ChangeEvent { collection });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

/// Registro com chave estável para o diff.
pub trait Keyed {
    fn key(&self) -> String;
}

impl Keyed for Sale {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for Lead {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for User {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for Insurer {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Keyed for Goal {
    fn key(&self) -> String {
        self.seller_key.clone()
    }
}

/// Serializa a lista preservando a ordem da coleção.
pub fn keyed_entries<T: Keyed + Serialize>(items: &[T]) -> Result<Vec<(String, Value)>, serde_json::Error> {
    items
        .iter()
        .map(|item| Ok((item.key(), serde_json::to_value(item)?)))
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct SnapshotDiff {
    /// Registros novos ou alterados, na ordem da coleção
    #[schema(value_type = Vec<Object>)]
    pub upserted: Vec<Value>,
    /// Chaves que sumiram
    pub removed: Vec<String>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.upserted.is_empty() && self.removed.is_empty()
    }
}

/// O que o assinante já viu, por chave.
#[derive(Debug, Default)]
pub struct SyncState {
    known: BTreeMap<String, Value>,
}

impl SyncState {
    /// Substitui tudo e devolve a lista completa (evento `snapshot`).
    pub fn reset(&mut self, entries: Vec<(String, Value)>) -> Vec<Value> {
        self.known.clear();
        let mut items = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            items.push(value.clone());
            self.known.insert(key, value);
        }
        items
    }

    /// Compara com o que já foi enviado e guarda o novo estado.
    pub fn diff(&mut self, entries: Vec<(String, Value)>) -> SnapshotDiff {
        let mut next = BTreeMap::new();
        let mut upserted = Vec::new();

        for (key, value) in entries {
            if self.known.get(&key) != Some(&value) {
                upserted.push(value.clone());
            }
            next.insert(key, value);
        }

        let removed = self
            .known
            .keys()
            .filter(|key| !next.contains_key(*key))
            .cloned()
            .collect();

        self.known = next;
        SnapshotDiff { upserted, removed }
    }
}
