// src/services/insurer_service.rs

use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::InsurerRepository,
    models::insurers::{Insurer, InsurerPayload},
    services::realtime::{ChangeHub, Collection},
};

#[derive(Clone)]
pub struct InsurerService {
    repo: InsurerRepository,
    hub: ChangeHub,
}

impl InsurerService {
    pub fn new(repo: InsurerRepository, hub: ChangeHub) -> Self {
        Self { repo, hub }
    }

    pub async fn list(&self) -> Result<Vec<Insurer>, AppError> {
        self.repo.list().await
    }

    pub async fn create(&self, payload: InsurerPayload) -> Result<Insurer, AppError> {
        let insurer = self.repo.create(payload.name.trim()).await?;
        self.hub.publish(Collection::Insurers);
        Ok(insurer)
    }

    pub async fn update(&self, id: Uuid, payload: InsurerPayload) -> Result<Insurer, AppError> {
        let insurer = self
            .repo
            .update(id, payload.name.trim())
            .await?
            .ok_or(AppError::NotFound(Resource::Insurer))?;
        self.hub.publish(Collection::Insurers);
        Ok(insurer)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(Resource::Insurer));
        }
        self.hub.publish(Collection::Insurers);
        Ok(())
    }
}
