// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, Role, Viewer},
};

const TOKEN_TTL_DAYS: i64 = 7;
const MASTER_ADMIN_NAME: &str = "ADMIN MASTER";

/// Credencial fixa de administrador, vinda da configuração.
#[derive(Debug, Clone)]
pub struct MasterCredentials {
    pub login: String,
    pub password: String,
}

impl MasterCredentials {
    fn matches(&self, login: &str, password: &str) -> bool {
        self.login.trim().to_lowercase() == login && self.password == password
    }

    fn viewer(&self) -> Viewer {
        Viewer {
            user_id: None,
            name: MASTER_ADMIN_NAME.to_string(),
            login: self.login.trim().to_lowercase(),
            role: Role::Admin,
        }
    }
}

/// Gera o hash bcrypt fora do executor async.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    master: Option<MasterCredentials>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, master: Option<MasterCredentials>) -> Self {
        Self { user_repo, jwt_secret, master }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let login = username.trim().to_lowercase();
        let password = password.trim();

        // 1. Admin mestre: não toca no banco
        if let Some(master) = self.master.as_ref().filter(|m| m.matches(&login, password)) {
            let viewer = master.viewer();
            tracing::info!("🔑 Login do admin mestre '{}'", viewer.login);
            return self.respond(viewer);
        }

        // 2. Usuário do banco
        let user = self
            .user_repo
            .find_by_login(&login)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.respond(Viewer::from(user))
    }

    /// Decodifica o token e devolve quem está logado.
    pub async fn validate_token(&self, token: &str) -> Result<Viewer, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        let claims = token_data.claims;

        if claims.sub.is_nil() {
            // Token do admin mestre só vale enquanto ele estiver configurado
            return match &self.master {
                Some(master) if claims.role == Role::Admin => Ok(master.viewer()),
                _ => Err(AppError::InvalidToken),
            };
        }

        // Usuário apagado ou alterado depois do login: vale o que está no banco
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .map(Viewer::from)
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, viewer: &Viewer) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: viewer.user_id.unwrap_or_else(Uuid::nil),
            name: viewer.name.clone(),
            login: viewer.login.clone(),
            role: viewer.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    fn respond(&self, user: Viewer) -> Result<AuthResponse, AppError> {
        let token = self.create_token(&user)?;
        Ok(AuthResponse { token, user })
    }
}
