// src/services/user_service.rs

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::{AppError, Resource},
    db::UserRepository,
    models::auth::{User, UserPayload},
    services::{auth::hash_password, realtime::{ChangeHub, Collection}},
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    hub: ChangeHub,
}

impl UserService {
    pub fn new(repo: UserRepository, hub: ChangeHub) -> Self {
        Self { repo, hub }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    /// Nomes dos vendedores cadastrados (para filtros e distribuição de indicações)
    pub async fn seller_names(&self) -> Result<Vec<String>, AppError> {
        let sellers = self.repo.list_sellers().await?;
        Ok(sellers.into_iter().map(|u| u.name).collect())
    }

    pub async fn create(&self, payload: UserPayload) -> Result<User, AppError> {
        let password = payload
            .password
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add("password", ValidationError::new("blank").with_message("required".into()));
                AppError::ValidationError(errors)
            })?;

        let password_hash = hash_password(password).await?;
        let user = self
            .repo
            .create(
                payload.name.trim(),
                &payload.login.trim().to_lowercase(),
                &password_hash,
                payload.role,
                payload.commission_pct,
            )
            .await?;

        tracing::info!("👤 Usuário '{}' criado ({:?})", user.login, user.role);
        self.hub.publish(Collection::Users);
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, payload: UserPayload) -> Result<User, AppError> {
        let password_hash = match payload.password.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let user = self
            .repo
            .update(
                id,
                payload.name.trim(),
                &payload.login.trim().to_lowercase(),
                password_hash.as_deref(),
                payload.role,
                payload.commission_pct,
            )
            .await?
            .ok_or(AppError::NotFound(Resource::User))?;

        self.hub.publish(Collection::Users);
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(Resource::User));
        }
        self.hub.publish(Collection::Users);
        Ok(())
    }
}
