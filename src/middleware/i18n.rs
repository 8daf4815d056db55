// src/middleware/i18n.rs

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

const SUPPORTED: &[&str] = &["pt", "en"];
const DEFAULT_LANG: &str = "pt";

// Idioma das mensagens de erro, vindo do Accept-Language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| {
                // "pt-BR" -> "pt"; o primeiro idioma suportado vence
                accept_language::parse(raw)
                    .into_iter()
                    .map(|tag| tag.split('-').next().unwrap_or_default().to_lowercase())
                    .find(|lang| SUPPORTED.contains(&lang.as_str()))
            })
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn portuguese_is_the_default() {
        assert_eq!(Locale::from_headers(&HeaderMap::new()), Locale("pt".into()));
        assert_eq!(Locale::from_headers(&with_header("fr-FR")), Locale("pt".into()));
    }

    #[test]
    fn region_is_dropped_and_quality_respected() {
        assert_eq!(Locale::from_headers(&with_header("en-US,en;q=0.9")).0, "en");
        assert_eq!(Locale::from_headers(&with_header("fr;q=0.9, en;q=0.8")).0, "en");
        assert_eq!(Locale::from_headers(&with_header("pt-BR")).0, "pt");
    }
}
