// src/services/pitch.rs

//! Assistente de vendas: pitch para WhatsApp e sugestão de status de indicação.
//!
//! O modelo fica atrás de [`TextGenerator`]; em produção é o Gemini via REST.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::{common::error::AppError, models::leads::LeadStatus};

pub const PITCH_FALLBACK: &str = "Não foi possível gerar o pitch no momento.";

/// Parâmetros de amostragem enviados ao modelo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

pub const PITCH_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
};

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Texto da primeira resposta do modelo (vazio se ele não respondeu nada).
    async fn generate(&self, prompt: &str, sampling: Option<Sampling>) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, sampling: Option<Sampling>) -> Result<String, AppError> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if let Some(s) = sampling {
            body["generationConfig"] = json!({
                "temperature": s.temperature,
                "topK": s.top_k,
                "topP": s.top_p,
            });
        }

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AiUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &error_text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::AiUnavailable(e.to_string()))?;
        Ok(extract_text(&payload))
    }
}

/// Resposta de erro do provedor: problema de chave vira 412, o resto 502.
pub fn classify_failure(status: StatusCode, body: &str) -> AppError {
    let mentions_key = body.to_lowercase().contains("key");
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if mentions_key => {
            AppError::AiKeyInvalid
        }
        _ => AppError::AiUnavailable(format!("status {}: {}", status.as_u16(), body.trim())),
    }
}

// candidates[0].content.parts[*].text, concatenado
fn extract_text(payload: &Value) -> String {
    payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

pub fn pitch_prompt(client_name: &str, vehicle: &str, context: &str) -> String {
    format!(
        "Analise este lead de seguro e crie um pitch de venda persuasivo e profissional para o WhatsApp.\n\
         Cliente: {}\n\
         Veículo: {}\n\
         Contexto: {}\n\
         Retorne o texto formatado com emojis adequados e foco em proteção e confiança.",
        client_name.trim(),
        vehicle.trim(),
        context.trim()
    )
}

pub fn suggest_status_prompt(history: &str) -> String {
    format!(
        "Com base no histórico: \"{}\", qual o status mais provável do funil? \
         Responda apenas com uma das opções: {}, {} ou {}.",
        history.trim(),
        LeadStatus::Whatsapp.label(),
        LeadStatus::Quoted.label(),
        LeadStatus::FollowUp.label()
    )
}

#[derive(Clone)]
pub struct PitchService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl PitchService {
    /// `None` quando não há chave configurada: toda chamada vira `AiKeyMissing`.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    fn generator(&self) -> Result<&Arc<dyn TextGenerator>, AppError> {
        self.generator.as_ref().ok_or(AppError::AiKeyMissing)
    }

    pub async fn pitch(&self, client_name: &str, vehicle: &str, context: &str) -> Result<String, AppError> {
        let prompt = pitch_prompt(client_name, vehicle, context);
        let text = self.generator()?.generate(&prompt, Some(PITCH_SAMPLING)).await?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(PITCH_FALLBACK.to_string());
        }
        Ok(text.to_string())
    }

    /// Sugestão de coluna para a indicação. Falha do modelo ou resposta fora
    /// do funil dão `None`; só a falta de chave é erro.
    pub async fn suggest_status(&self, history: &str) -> Result<Option<LeadStatus>, AppError> {
        let generator = self.generator()?;
        match generator.generate(&suggest_status_prompt(history), None).await {
            Ok(text) => Ok(LeadStatus::parse_loose(&text)),
            Err(e) => {
                tracing::warn!("Sugestão de status indisponível: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<(String, Option<Sampling>)>>,
    }

    impl Scripted {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(text.to_string()), prompts: Mutex::new(Vec::new()) })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self { reply: Err(status), prompts: Mutex::new(Vec::new()) })
        }
    }

    fn service(model: Arc<Scripted>) -> PitchService {
        let generator: Arc<dyn TextGenerator> = model;
        PitchService::new(Some(generator))
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, prompt: &str, sampling: Option<Sampling>) -> Result<String, AppError> {
            self.prompts.lock().unwrap().push((prompt.to_string(), sampling));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(code) => Err(classify_failure(StatusCode::from_u16(*code).unwrap(), "boom")),
            }
        }
    }

    #[tokio::test]
    async fn pitch_uses_lead_fields_and_sampling() {
        let model = Scripted::answering("  Olá Paula! 🚗🛡️  ");
        let pitch = service(model.clone())
            .pitch("Paula", "Onix 2021", "quer cotação").await.unwrap();
        assert_eq!(pitch, "Olá Paula! 🚗🛡️");

        let prompts = model.prompts.lock().unwrap();
        let (prompt, sampling) = &prompts[0];
        assert!(prompt.contains("Cliente: Paula"));
        assert!(prompt.contains("Veículo: Onix 2021"));
        assert!(prompt.contains("Contexto: quer cotação"));
        assert_eq!(*sampling, Some(PITCH_SAMPLING));
    }

    #[tokio::test]
    async fn empty_answer_falls_back_to_fixed_text() {
        let assistant = service(Scripted::answering("   "));
        assert_eq!(assistant.pitch("a", "b", "c").await.unwrap(), PITCH_FALLBACK);
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let service = PitchService::new(None);
        assert!(matches!(service.pitch("a", "b", "c").await, Err(AppError::AiKeyMissing)));
        assert!(matches!(service.suggest_status("x").await, Err(AppError::AiKeyMissing)));
    }

    #[tokio::test]
    async fn suggestion_is_parsed_or_null() {
        let ok = service(Scripted::answering("COTAÇÃO REALIZADA"));
        assert_eq!(ok.suggest_status("mandei a cotação").await.unwrap(), Some(LeadStatus::Quoted));

        let unknown = service(Scripted::answering("talvez amanhã"));
        assert_eq!(unknown.suggest_status("...").await.unwrap(), None);

        let broken = service(Scripted::failing(500));
        assert_eq!(broken.suggest_status("...").await.unwrap(), None);
    }

    #[test]
    fn status_prompt_offers_only_the_later_stages() {
        let prompt = suggest_status_prompt("  cliente pediu cotação  ");
        assert!(prompt.contains("\"cliente pediu cotação\""));
        assert!(prompt.contains("WHATSAPP, COTAÇÃO REALIZADA ou COBRAR ATENÇÃO"));
        assert!(!prompt.contains("NOVA INDICAÇÃO"));
    }

    #[test]
    fn key_problems_are_told_apart_from_outages() {
        let invalid = classify_failure(StatusCode::BAD_REQUEST, r#"{"error":{"message":"API key not valid."}}"#);
        assert!(matches!(invalid, AppError::AiKeyInvalid));
        assert!(matches!(classify_failure(StatusCode::FORBIDDEN, "API_KEY_INVALID"), AppError::AiKeyInvalid));
        assert!(matches!(classify_failure(StatusCode::BAD_REQUEST, "bad prompt"), AppError::AiUnavailable(_)));
        assert!(matches!(
            classify_failure(StatusCode::SERVICE_UNAVAILABLE, "key quota"),
            AppError::AiUnavailable(_)
        ));
    }

    #[test]
    fn text_is_read_from_first_candidate() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Olá" }, { "text": " mundo" }] } }]
        });
        assert_eq!(extract_text(&payload), "Olá mundo");
        assert_eq!(extract_text(&json!({ "candidates": [] })), "");
    }

    #[test]
    fn endpoint_drops_trailing_slash() {
        let client = GeminiClient::new("https://example.test/v1beta/", "gemini-1.5-flash", "k");
        assert_eq!(client.endpoint(), "https://example.test/v1beta/models/gemini-1.5-flash:generateContent");
    }
}
