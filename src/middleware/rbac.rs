// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{Role, Viewer},
};

/// 1. O Trait que define quem passa
pub trait RoleRule: Send + Sync + 'static {
    fn allows(viewer: &Viewer) -> bool;
}

/// 2. O Extractor (Guardião). Carrega o usuário para o handler não extrair de novo.
pub struct RequireRole<T>(pub Viewer, PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn viewer(&self) -> &Viewer {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRule,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(viewer) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !T::allows(&viewer) {
            tracing::warn!("⛔ '{}' tentou uma operação restrita", viewer.login);
            return Err(AppError::Forbidden.to_api_error(&Locale::from_headers(&parts.headers)));
        }

        Ok(RequireRole(viewer, PhantomData))
    }
}

// ---
// REGRAS
// ---

pub struct AdminOnly;
impl RoleRule for AdminOnly {
    fn allows(viewer: &Viewer) -> bool {
        viewer.role == Role::Admin
    }
}

pub type Admin = RequireRole<AdminOnly>;
