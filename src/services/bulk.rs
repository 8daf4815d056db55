// src/services/bulk.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{common::error::AppError, models::bulk::BulkDeleteReport};

/// Uma coleção que sabe apagar um registro pelo id.
#[async_trait]
pub trait RecordDeleter: Send + Sync {
    /// `Ok(false)` quando o registro já não existia.
    async fn delete_record(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Ids marcados para exclusão, sem repetição e na ordem em que foram marcados.
///
/// Um id repetido no pedido vira uma única exclusão.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection(Vec<Uuid>);

impl Selection {
    pub fn from_ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let mut selected = Vec::new();
        for id in ids {
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        Self(selected)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mantém só os ids aceitos por `allowed` e devolve os recusados, na ordem.
    pub fn retain(&mut self, allowed: impl Fn(&Uuid) -> bool) -> Vec<Uuid> {
        let (kept, refused): (Vec<Uuid>, Vec<Uuid>) = self.take().into_iter().partition(|id| allowed(id));
        self.0 = kept;
        refused
    }

    fn take(&mut self) -> Vec<Uuid> {
        std::mem::take(&mut self.0)
    }
}

/// Apaga os selecionados um a um, esperando cada exclusão antes da próxima.
///
/// Não há rollback: uma falha no meio deixa as anteriores aplicadas. A seleção
/// termina vazia em qualquer caso.
pub async fn delete_selected<D>(deleter: &D, selection: &mut Selection) -> BulkDeleteReport
where
    D: RecordDeleter + ?Sized,
{
    let ids = selection.take();
    let mut report = BulkDeleteReport {
        requested: ids.len(),
        ..Default::default()
    };

    for id in ids {
        match deleter.delete_record(id).await {
            Ok(true) => report.deleted += 1,
            Ok(false) => report.failed.push(id),
            Err(e) => {
                tracing::warn!("Falha ao excluir {} na exclusão em lote: {}", id, e);
                report.failed.push(id);
            }
        }
    }

    if !report.failed.is_empty() {
        tracing::warn!(
            "Exclusão em lote parcial: {} de {} registros excluídos",
            report.deleted,
            report.requested
        );
    }

    report
}

/// Como [`delete_selected`], mas só apaga o que `allowed` aceita. Os recusados
/// entram em `failed` sem nenhuma chamada de exclusão.
pub async fn delete_allowed<D>(
    deleter: &D,
    selection: &mut Selection,
    allowed: impl Fn(&Uuid) -> bool,
) -> BulkDeleteReport
where
    D: RecordDeleter + ?Sized,
{
    let refused = selection.retain(allowed);
    if !refused.is_empty() {
        tracing::warn!("{} registro(s) fora do escopo ignorados na exclusão em lote", refused.len());
    }

    let mut report = delete_selected(deleter, selection).await;
    report.requested += refused.len();
    report.failed.extend(refused);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Registra cada chamada; falha nos ids listados.
    struct RecordingDeleter {
        calls: Mutex<Vec<Uuid>>,
        failing: Vec<Uuid>,
        missing: Vec<Uuid>,
    }

    impl RecordingDeleter {
        fn new(failing: Vec<Uuid>, missing: Vec<Uuid>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing,
                missing,
            }
        }
    }

    #[async_trait]
    impl RecordDeleter for RecordingDeleter {
        async fn delete_record(&self, id: Uuid) -> Result<bool, AppError> {
            self.calls.lock().unwrap().push(id);
            if self.failing.contains(&id) {
                return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
            }
            Ok(!self.missing.contains(&id))
        }
    }

    #[tokio::test]
    async fn issues_one_call_per_selected_id_in_order() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let deleter = RecordingDeleter::new(vec![], vec![]);
        let mut selection = Selection::from_ids(ids.clone());

        let report = delete_selected(&deleter, &mut selection).await;

        assert_eq!(*deleter.calls.lock().unwrap(), ids);
        assert_eq!(report.requested, 5);
        assert_eq!(report.deleted, 5);
        assert!(report.failed.is_empty());
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_batch_and_selection_is_cleared() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let deleter = RecordingDeleter::new(vec![ids[1]], vec![ids[3]]);
        let mut selection = Selection::from_ids(ids.clone());

        let report = delete_selected(&deleter, &mut selection).await;

        assert_eq!(deleter.calls.lock().unwrap().len(), 4);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.failed, vec![ids[1], ids[3]]);
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn duplicate_ids_are_deleted_once() {
        let id = Uuid::new_v4();
        let deleter = RecordingDeleter::new(vec![], vec![]);
        let mut selection = Selection::from_ids([id, id, id]);
        assert_eq!(selection.len(), 1);

        let report = delete_selected(&deleter, &mut selection).await;

        assert_eq!(deleter.calls.lock().unwrap().len(), 1);
        assert_eq!(report.requested, 1);
    }

    #[tokio::test]
    async fn only_allowed_ids_reach_the_deleter() {
        let own: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
        let foreign = Uuid::new_v4();
        let deleter = RecordingDeleter::new(vec![], vec![]);
        let mut selection = Selection::from_ids([own[0], foreign, own[1]]);

        let report = delete_allowed(&deleter, &mut selection, |id| own.contains(id)).await;

        assert_eq!(*deleter.calls.lock().unwrap(), own);
        assert_eq!(report.requested, 3);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.failed, vec![foreign]);
        assert!(selection.is_empty());
    }

    #[test]
    fn retain_splits_kept_and_refused_in_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut selection = Selection::from_ids(ids.clone());

        let refused = selection.retain(|id| *id == ids[0] || *id == ids[2]);

        assert_eq!(refused, vec![ids[1], ids[3]]);
        assert_eq!(selection, Selection::from_ids([ids[0], ids[2]]));
    }

    #[tokio::test]
    async fn empty_selection_makes_no_calls() {
        let deleter = RecordingDeleter::new(vec![], vec![]);
        let mut selection = Selection::default();

        let report = delete_selected(&deleter, &mut selection).await;

        assert!(deleter.calls.lock().unwrap().is_empty());
        assert_eq!(report.requested, 0);
    }
}
