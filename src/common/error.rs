use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::messages::translate;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio. Os handlers convertem para `ApiError` com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Login já existe")]
    LoginAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Registro não encontrado: {0}")]
    NotFound(Resource),

    #[error("Chave da API de IA ausente")]
    AiKeyMissing,

    #[error("Chave da API de IA inválida")]
    AiKeyInvalid,

    #[error("Falha na API de IA: {0}")]
    AiUnavailable(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Qual coleção não tinha o registro pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Sale,
    Lead,
    User,
    Insurer,
    Collection,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Sale => "venda",
            Resource::Lead => "indicação",
            Resource::User => "usuário",
            Resource::Insurer => "seguradora",
            Resource::Collection => "coleção",
        };
        f.write_str(name)
    }
}

// O corpo de erro que vai para o cliente
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let lang = locale.0.as_str();

        match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: translate("validation", lang),
                    details: Some(json!(details)),
                }
            }
            AppError::LoginAlreadyExists => {
                ApiError::new(StatusCode::CONFLICT, translate("login_exists", lang))
            }
            AppError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, translate("invalid_credentials", lang))
            }
            AppError::InvalidToken => {
                ApiError::new(StatusCode::UNAUTHORIZED, translate("invalid_token", lang))
            }
            AppError::Forbidden => ApiError::new(StatusCode::FORBIDDEN, translate("forbidden", lang)),
            AppError::NotFound(resource) => {
                let key = match resource {
                    Resource::Sale => "not_found.sale",
                    Resource::Lead => "not_found.lead",
                    Resource::User => "not_found.user",
                    Resource::Insurer => "not_found.insurer",
                    Resource::Collection => "not_found.collection",
                };
                ApiError::new(StatusCode::NOT_FOUND, translate(key, lang))
            }
            // Chave ausente ou inválida tem remediação: configurar a chave.
            AppError::AiKeyMissing => ai_key_error("ai_key_missing", lang),
            AppError::AiKeyInvalid => ai_key_error("ai_key_invalid", lang),
            AppError::AiUnavailable(reason) => {
                tracing::warn!("Falha na API de IA: {}", reason);
                ApiError::new(StatusCode::BAD_GATEWAY, translate("ai_unavailable", lang))
            }

            // Todos os outros erros viram 500. O `tracing` registra a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, translate("internal", lang))
            }
        }
    }
}

fn ai_key_error(key: &str, lang: &str) -> ApiError {
    ApiError {
        status: StatusCode::PRECONDITION_FAILED,
        error: translate(key, lang),
        details: Some(json!({
            "remediation": translate("ai_key_remediation", lang),
            "setting": "GEMINI_API_KEY",
        })),
    }
}

// Usado pelos extratores, que não conhecem o idioma da requisição.
impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(lang: &str) -> Locale {
        Locale(lang.to_string())
    }

    #[test]
    fn invalid_credentials_is_unauthorized() {
        let api = AppError::InvalidCredentials.to_api_error(&locale("pt"));
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.error, "Usuário ou senha inválidos.");
    }

    #[test]
    fn messages_follow_the_locale() {
        let api = AppError::NotFound(Resource::Sale).to_api_error(&locale("en"));
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Sale not found.");
    }

    #[test]
    fn missing_ai_key_carries_remediation() {
        let api = AppError::AiKeyMissing.to_api_error(&locale("pt"));
        assert_eq!(api.status, StatusCode::PRECONDITION_FAILED);
        let details = api.details.expect("remediation details");
        assert_eq!(details["setting"], "GEMINI_API_KEY");
        assert!(details["remediation"].as_str().is_some());
    }

    #[test]
    fn other_ai_failures_are_bad_gateway_without_remediation() {
        let api = AppError::AiUnavailable("timeout".into()).to_api_error(&locale("pt"));
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert!(api.details.is_none());
    }

    #[test]
    fn database_errors_are_generic() {
        let api = AppError::DatabaseError(sqlx::Error::RowNotFound).to_api_error(&locale("en"));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
    }

    #[test]
    fn validation_errors_list_fields() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("required".into());
        errors.add("clientName", err);

        let api = AppError::ValidationError(errors).to_api_error(&locale("pt"));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.expect("details")["clientName"][0], "required");
    }
}
