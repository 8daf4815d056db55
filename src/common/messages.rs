// src/common/messages.rs

// Tabela de mensagens por idioma: (chave, português, inglês).
// Português é o padrão; qualquer idioma desconhecido cai nele.
const MESSAGES: &[(&str, &str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos.", "One or more fields are invalid."),
    ("login_exists", "Este login já está em uso.", "This login is already taken."),
    ("invalid_credentials", "Usuário ou senha inválidos.", "Invalid username or password."),
    ("invalid_token", "Token de autenticação inválido ou ausente.", "Missing or invalid authentication token."),
    ("forbidden", "Você não tem permissão para esta ação.", "You are not allowed to perform this action."),
    ("not_found.sale", "Venda não encontrada.", "Sale not found."),
    ("not_found.lead", "Indicação não encontrada.", "Lead not found."),
    ("not_found.user", "Usuário não encontrado.", "User not found."),
    ("not_found.insurer", "Seguradora não encontrada.", "Insurer not found."),
    ("not_found.collection", "Coleção desconhecida.", "Unknown collection."),
    ("ai_key_missing", "A chave da API de IA não está configurada.", "The AI API key is not configured."),
    ("ai_key_invalid", "A chave da API de IA é inválida.", "The AI API key is invalid."),
    (
        "ai_key_remediation",
        "Configure uma chave válida em GEMINI_API_KEY e tente novamente.",
        "Set a valid key in GEMINI_API_KEY and try again.",
    ),
    ("ai_unavailable", "Erro ao conectar com a inteligência artificial.", "Could not reach the AI service."),
    ("internal", "Ocorreu um erro inesperado.", "An unexpected error occurred."),
];

pub fn translate(key: &str, lang: &str) -> String {
    MESSAGES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, pt, en)| if lang == "en" { *en } else { *pt })
        .unwrap_or(key)
        .to_string()
}
