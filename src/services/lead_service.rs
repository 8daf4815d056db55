// src/services/lead_service.rs

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::LeadRepository,
    models::{
        auth::Viewer,
        bulk::BulkDeleteReport,
        leads::{DistributeLeadPayload, Lead, LeadColumn, LeadInput, LeadPayload, LeadStatus},
        pipeline::{Direction, PipelineStage},
    },
    services::{
        bulk::{delete_allowed, delete_selected, Selection},
        filters::{self, columns, resolve_seller, visible_to, ListFilter},
        realtime::{ChangeHub, Collection},
    },
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    hub: ChangeHub,
}

impl LeadService {
    pub fn new(repo: LeadRepository, hub: ChangeHub) -> Self {
        Self { repo, hub }
    }

    pub async fn list(&self, viewer: &Viewer, filter: &ListFilter) -> Result<Vec<Lead>, AppError> {
        let leads = self.repo.list().await?;
        Ok(filters::apply(leads, viewer, filter))
    }

    pub async fn board(&self, viewer: &Viewer, filter: &ListFilter) -> Result<Vec<LeadColumn>, AppError> {
        let leads = self.list(viewer, filter).await?;
        Ok(columns(leads, |l: &Lead| l.status)
            .into_iter()
            .map(|(status, items)| LeadColumn { status, count: items.len(), items })
            .collect())
    }

    pub async fn get(&self, viewer: &Viewer, id: Uuid) -> Result<Lead, AppError> {
        self.find_visible(viewer, id).await
    }

    pub async fn create(&self, viewer: &Viewer, payload: LeadPayload) -> Result<Lead, AppError> {
        let seller = resolve_seller(viewer, payload.seller.as_deref(), None);
        let status = payload.status.unwrap_or_else(LeadStatus::first);
        self.insert(LeadInput::from_payload(payload, seller, status)).await
    }

    /// O admin entrega uma indicação para um vendedor; ela entra na primeira coluna.
    pub async fn distribute(&self, payload: DistributeLeadPayload) -> Result<Lead, AppError> {
        let lead = self.insert(LeadInput::from(payload)).await?;
        tracing::info!("📨 Indicação '{}' distribuída para '{}'", lead.client_name, lead.seller);
        Ok(lead)
    }

    pub async fn update(&self, viewer: &Viewer, id: Uuid, payload: LeadPayload) -> Result<Lead, AppError> {
        let current = self.find_visible(viewer, id).await?;
        let seller = resolve_seller(viewer, payload.seller.as_deref(), Some(&current.seller));
        let status = payload.status.unwrap_or(current.status);
        let input = LeadInput::from_payload(payload, seller, status);

        let lead = self
            .repo
            .update(id, &input)
            .await?
            .ok_or(AppError::NotFound(Resource::Lead))?;
        self.hub.publish(Collection::Leads);
        Ok(lead)
    }

    pub async fn move_status(&self, viewer: &Viewer, id: Uuid, direction: Direction) -> Result<Lead, AppError> {
        let current = self.find_visible(viewer, id).await?;
        let next = current.status.step(direction);
        if next == current.status {
            return Ok(current);
        }

        let lead = self
            .repo
            .update_status(id, next)
            .await?
            .ok_or(AppError::NotFound(Resource::Lead))?;
        self.hub.publish(Collection::Leads);
        Ok(lead)
    }

    /// O vendedor só apaga o que é dele; o resto responde como inexistente.
    pub async fn delete(&self, viewer: &Viewer, id: Uuid) -> Result<(), AppError> {
        self.find_visible(viewer, id).await?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(Resource::Lead));
        }
        self.hub.publish(Collection::Leads);
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
            self.hub.publish(Collection::Leads);
        }
        report
    }

    async fn insert(&self, input: LeadInput) -> Result<Lead, AppError> {
        let lead = self.repo.create(&input).await?;
        self.hub.publish(Collection::Leads);
        Ok(lead)
    }

    async fn find_visible(&self, viewer: &Viewer, id: Uuid) -> Result<Lead, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|lead| visible_to(viewer, lead))
            .ok_or(AppError::NotFound(Resource::Lead))
    }
}
