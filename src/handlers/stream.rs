// src/handlers/stream.rs

//! `GET /api/stream/{collection}`: Server-Sent Events com a coleção ao vivo.
//!
//! O primeiro evento (`snapshot`) traz a lista inteira. Depois, a cada escrita
//! na coleção, vem um `diff` com o que mudou desde o último envio.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{stream, Stream};
use serde_json::Value;
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::{
    common::error::{ApiError, AppError, Resource},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Viewer,
    services::{
        filters::ListFilter,
        realtime::{keyed_entries, ChangeEvent, Collection, SnapshotDiff, SyncState},
    },
};

// GET /api/stream/{collection}
#[utoipa::path(
    get,
    path = "/api/stream/{collection}",
    tag = "Realtime",
    params(("collection" = Collection, Path, description = "vendas, indicacoes, empresas, usuarios ou metas")),
    responses(
        (status = 200, description = "Eventos `snapshot` e `diff`", content_type = "text/event-stream", body = SnapshotDiff),
        (status = 403, description = "usuarios e metas só para o admin"),
        (status = 404, description = "Coleção desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn stream_collection(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(viewer): AuthenticatedUser,
    Path(name): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let collection: Collection = name
        .parse()
        .map_err(|_| AppError::NotFound(Resource::Collection).to_api_error(&locale))?;

    if collection.admin_only() && !viewer.is_admin() {
        return Err(AppError::Forbidden.to_api_error(&locale));
    }

    tracing::info!("📡 '{}' assinou {}", viewer.login, collection);

    // Assina antes de ler, para não perder escrita entre a leitura e a assinatura
    let rx = app_state.hub.subscribe();
    let source = CollectionSource { app_state, viewer, collection };
    let entries = source.load().await.map_err(|e| e.to_api_error(&locale))?;

    let feed = Feed::new(source, collection, rx, entries);
    let events = stream::unfold(feed, |mut feed| async move {
        let item = feed.next_item().await?;
        Some((Ok::<_, Infallible>(item.into_event()), feed))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// De onde o feed relê a coleção a cada mudança.
#[async_trait]
trait SnapshotSource: Send + Sync {
    async fn load(&self) -> Result<Vec<(String, Value)>, AppError>;
}

struct CollectionSource {
    app_state: AppState,
    viewer: Viewer,
    collection: Collection,
}

#[async_trait]
impl SnapshotSource for CollectionSource {
    /// Lista a coleção na ordem dela, já no escopo de quem assina.
    async fn load(&self) -> Result<Vec<(String, Value)>, AppError> {
        let state = &self.app_state;
        let viewer = &self.viewer;
        let everything = ListFilter::default();
        let entries = match self.collection {
            Collection::Sales => keyed_entries(&state.sale_service.list(viewer, &everything).await?),
            Collection::Leads => keyed_entries(&state.lead_service.list(viewer, &everything).await?),
            Collection::Insurers => keyed_entries(&state.insurer_service.list().await?),
            Collection::Users => keyed_entries(&state.user_service.list().await?),
            Collection::Goals => keyed_entries(&state.goal_service.list().await?),
        };
        entries.map_err(|e| AppError::InternalServerError(e.into()))
    }
}

#[derive(Debug, PartialEq)]
enum FeedItem {
    Snapshot(Vec<Value>),
    Diff(SnapshotDiff),
}

impl FeedItem {
    fn into_event(self) -> Event {
        match self {
            FeedItem::Snapshot(items) => json_event("snapshot", &items),
            FeedItem::Diff(diff) => json_event("diff", &diff),
        }
    }
}

struct Feed<S> {
    source: S,
    collection: Collection,
    rx: Receiver<ChangeEvent>,
    sync: SyncState,
    pending: Option<FeedItem>,
}

impl<S: SnapshotSource> Feed<S> {
    fn new(source: S, collection: Collection, rx: Receiver<ChangeEvent>, entries: Vec<(String, Value)>) -> Self {
        let mut sync = SyncState::default();
        let first = FeedItem::Snapshot(sync.reset(entries));
        Self { source, collection, rx, sync, pending: Some(first) }
    }

    /// Próximo evento; `None` quando o hub fecha.
    async fn next_item(&mut self) -> Option<FeedItem> {
        if let Some(item) = self.pending.take() {
            return Some(item);
        }

        loop {
            match self.rx.recv().await {
                Ok(change) if change.collection != self.collection => continue,
                Ok(_) => {
                    let Some(entries) = self.reload().await else { continue };
                    let diff = self.sync.diff(entries);
                    if diff.is_empty() {
                        continue;
                    }
                    return Some(FeedItem::Diff(diff));
                }
                // Perdeu mensagens: manda tudo de novo
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Assinante de {} atrasou {} eventos; reenviando snapshot", self.collection, skipped);
                    let Some(entries) = self.reload().await else { continue };
                    return Some(FeedItem::Snapshot(self.sync.reset(entries)));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    // Falha na releitura não derruba a conexão: a próxima mudança tenta de novo.
    async fn reload(&self) -> Option<Vec<(String, Value)>> {
        match self.source.load().await {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::error!("Falha ao recarregar {}: {}", self.collection, e);
                None
            }
        }
    }
}

fn json_event<T: serde::Serialize>(name: &str, data: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(data)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{collections::VecDeque, sync::Mutex};
    use tokio::sync::broadcast::{self, Sender};

    // Devolve as leituras na ordem em que foram roteirizadas.
    struct ScriptedSource {
        loads: Mutex<VecDeque<Result<Vec<(String, Value)>, AppError>>>,
    }

    impl ScriptedSource {
        fn new(loads: Vec<Result<Vec<(String, Value)>, AppError>>) -> Self {
            Self { loads: Mutex::new(loads.into()) }
        }

        fn remaining(&self) -> usize {
            self.loads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        async fn load(&self) -> Result<Vec<(String, Value)>, AppError> {
            self.loads
                .lock()
                .unwrap()
                .pop_front()
                .expect("leitura não roteirizada")
        }
    }

    fn entry(id: &str, client: &str) -> (String, Value) {
        (id.to_string(), json!({ "id": id, "clientName": client }))
    }

    fn values(entries: &[(String, Value)]) -> Vec<Value> {
        entries.iter().map(|(_, v)| v.clone()).collect()
    }

    fn feed(
        capacity: usize,
        initial: Vec<(String, Value)>,
        loads: Vec<Result<Vec<(String, Value)>, AppError>>,
    ) -> (Sender<ChangeEvent>, Feed<ScriptedSource>) {
        let (tx, rx) = broadcast::channel(capacity);
        let feed = Feed::new(ScriptedSource::new(loads), Collection::Sales, rx, initial);
        (tx, feed)
    }

    fn change(tx: &Sender<ChangeEvent>, collection: Collection) {
        tx.send(ChangeEvent { collection }).unwrap();
    }

    #[tokio::test]
    async fn snapshot_comes_first_then_diffs() {
        let initial = vec![entry("1", "Ana")];
        let next = vec![entry("1", "Ana"), entry("2", "Bruno")];
        let (tx, mut feed) = feed(8, initial.clone(), vec![Ok(next)]);

        change(&tx, Collection::Sales);

        assert_eq!(feed.next_item().await, Some(FeedItem::Snapshot(values(&initial))));
        assert_eq!(
            feed.next_item().await,
            Some(FeedItem::Diff(SnapshotDiff {
                upserted: vec![json!({ "id": "2", "clientName": "Bruno" })],
                removed: vec![],
            }))
        );
    }

    #[tokio::test]
    async fn other_collections_and_empty_diffs_are_skipped() {
        let initial = vec![entry("1", "Ana")];
        let (tx, mut feed) = feed(8, initial.clone(), vec![Ok(initial.clone()), Ok(vec![])]);

        change(&tx, Collection::Leads);
        change(&tx, Collection::Sales); // releitura igual: nada a enviar
        change(&tx, Collection::Sales);

        feed.next_item().await;
        assert_eq!(
            feed.next_item().await,
            Some(FeedItem::Diff(SnapshotDiff { upserted: vec![], removed: vec!["1".into()] }))
        );
        assert_eq!(feed.source.remaining(), 0);
    }

    #[tokio::test]
    async fn lagged_subscriber_gets_a_fresh_snapshot() {
        let current = vec![entry("1", "Ana"), entry("3", "Carla")];
        let (tx, mut feed) = feed(1, vec![entry("1", "Ana")], vec![Ok(current.clone())]);

        for _ in 0..3 {
            change(&tx, Collection::Sales);
        }

        feed.next_item().await;
        assert_eq!(feed.next_item().await, Some(FeedItem::Snapshot(values(&current))));
    }

    #[tokio::test]
    async fn failed_reload_after_lag_keeps_the_stream_open() {
        let current = vec![entry("1", "Ana"), entry("3", "Carla")];
        let loads = vec![Err(AppError::NotFound(Resource::Sale)), Ok(current)];
        let (tx, mut feed) = feed(1, vec![entry("1", "Ana")], loads);

        for _ in 0..3 {
            change(&tx, Collection::Sales);
        }

        feed.next_item().await;
        assert_eq!(
            feed.next_item().await,
            Some(FeedItem::Diff(SnapshotDiff {
                upserted: vec![json!({ "id": "3", "clientName": "Carla" })],
                removed: vec![],
            }))
        );
    }

    #[tokio::test]
    async fn closed_hub_ends_the_stream() {
        let (tx, mut feed) = feed(8, vec![], vec![]);
        drop(tx);

        assert_eq!(feed.next_item().await, Some(FeedItem::Snapshot(vec![])));
        assert_eq!(feed.next_item().await, None);
    }
}
