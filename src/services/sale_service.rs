// src/services/sale_service.rs

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, Resource},
        names::same_person,
    },
    db::SaleRepository,
    models::{
        auth::Viewer,
        bulk::BulkDeleteReport,
        pipeline::{Direction, PipelineStage},
        sales::{Sale, SaleColumn, SaleInput, SalePayload, SaleStatus},
    },
    services::{
        bulk::{delete_allowed, delete_selected, Selection},
        filters::{self, columns, resolve_seller, visible_to, ListFilter},
        realtime::{ChangeHub, Collection},
    },
};

#[derive(Clone)]
pub struct SaleService {
    repo: SaleRepository,
    hub: ChangeHub,
}

impl SaleService {
    pub fn new(repo: SaleRepository, hub: ChangeHub) -> Self {
        Self { repo, hub }
    }

    pub async fn list(&self, viewer: &Viewer, filter: &ListFilter) -> Result<Vec<Sale>, AppError> {
        let sales = self.repo.list().await?;
        Ok(filters::apply(sales, viewer, filter))
    }

    pub async fn board(&self, viewer: &Viewer, filter: &ListFilter) -> Result<Vec<SaleColumn>, AppError> {
        let sales = self.list(viewer, filter).await?;
        Ok(columns(sales, |s: &Sale| s.status)
            .into_iter()
            .map(|(status, items)| SaleColumn { status, count: items.len(), items })
            .collect())
    }

    pub async fn create(&self, viewer: &Viewer, payload: SalePayload) -> Result<Sale, AppError> {
        let seller = resolve_seller(viewer, payload.seller.as_deref(), None);
        let status = payload.status.unwrap_or_else(SaleStatus::first);
        let input = SaleInput::from_payload(payload, seller, status);

        let sale = self.repo.create(&input).await?;
        tracing::info!("💰 Venda {} lançada para '{}'", sale.id, sale.seller);
        self.hub.publish(Collection::Sales);
        Ok(sale)
    }

    pub async fn update(&self, viewer: &Viewer, id: Uuid, payload: SalePayload) -> Result<Sale, AppError> {
        let current = self.find_visible(viewer, id).await?;
        let seller = resolve_seller(viewer, payload.seller.as_deref(), Some(&current.seller));
        let status = payload.status.unwrap_or(current.status);
        let input = SaleInput::from_payload(payload, seller, status);

        let sale = self
            .repo
            .update(id, &input)
            .await?
            .ok_or(AppError::NotFound(Resource::Sale))?;
        self.hub.publish(Collection::Sales);
        Ok(sale)
    }

    /// Anda uma coluna no funil. Nas pontas nada muda e nada é gravado.
    pub async fn move_status(&self, viewer: &Viewer, id: Uuid, direction: Direction) -> Result<Sale, AppError> {
        let current = self.find_visible(viewer, id).await?;
        let next = current.status.step(direction);
        if next == current.status {
            return Ok(current);
        }

        let sale = self
            .repo
            .update_status(id, next)
            .await?
            .ok_or(AppError::NotFound(Resource::Sale))?;
        self.hub.publish(Collection::Sales);
        Ok(sale)
    }

    /// O vendedor só apaga o que é dele; o resto responde como inexistente.
    pub async fn delete(&self, viewer: &Viewer, id: Uuid) -> Result<(), AppError> {
        self.find_visible(viewer, id).await?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(Resource::Sale));
        }
        self.hub.publish(Collection::Sales);
        Ok(())
    }

    /// Exclusão em lote no escopo de quem pede: ids de outros vendedores voltam em `failed`.
    pub async fn bulk_delete(&self, viewer: &Viewer, ids: Vec<Uuid>) -> Result<BulkDeleteReport, AppError> {
        let mut selection = Selection::from_ids(ids);
        let report = if viewer.is_admin() {
            delete_selected(&self.repo, &mut selection).await
        } else {
            let records = self.repo.list().await?;
            let own: HashSet<Uuid> = filters::scope(viewer, &records).into_iter().map(|r| r.id).collect();
            delete_allowed(&self.repo, &mut selection, |id| own.contains(id)).await
        };
        Ok(self.announce(report))
    }

    fn announce(&self, report: BulkDeleteReport) -> BulkDeleteReport {
        if report.deleted > 0 {
            self.hub.publish(Collection::Sales);
        }
        report
    }

    /// Apaga toda a produção de um vendedor, uma venda por vez.
    pub async fn purge_seller(&self, seller: &str) -> Result<BulkDeleteReport, AppError> {
        let sales = self.repo.list().await?;
        let ids = sales
            .into_iter()
            .filter(|s| same_person(&s.seller, seller))
            .map(|s| s.id);

        tracing::warn!("🧹 Zerando a produção de '{}'", seller.trim());
        let mut selection = Selection::from_ids(ids);
        let report = delete_selected(&self.repo, &mut selection).await;
        Ok(self.announce(report))
    }

    // Fora do escopo do vendedor é como se não existisse.
    async fn find_visible(&self, viewer: &Viewer, id: Uuid) -> Result<Sale, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|sale| visible_to(viewer, sale))
            .ok_or(AppError::NotFound(Resource::Sale))
    }
}
