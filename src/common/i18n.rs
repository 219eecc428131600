// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Mensagens exibíveis ao usuário, indexadas por idioma e depois por código.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

const PT: &[(&str, &str)] = &[
    ("unauthorized", "Não autorizado."),
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("invalid_body", "Corpo da requisição inválido ou com campos obrigatórios faltando."),
    ("visit_not_found", "Visita não encontrada."),
    ("consultant_not_found", "Consultor não encontrado."),
    ("agency_not_found", "Agência não encontrada."),
    (
        "last_consultant",
        "Não é possível excluir o último consultor do sistema. Crie outro consultor antes de excluir este.",
    ),
    ("internal_error", "Ocorreu um erro inesperado."),
    ("blank", "O campo é obrigatório."),
    ("too_long", "O campo excede o tamanho máximo."),
    ("invalid_date", "Data inválida. Use AAAA-MM-DD ou DD/MM/AAAA."),
    ("unknown_consultant", "O consultor informado não existe."),
];

const EN: &[(&str, &str)] = &[
    ("unauthorized", "Not authorized."),
    ("validation_failed", "One or more fields are invalid."),
    ("invalid_body", "Invalid request body or missing required fields."),
    ("visit_not_found", "Visit not found."),
    ("consultant_not_found", "Consultant not found."),
    ("agency_not_found", "Agency not found."),
    (
        "last_consultant",
        "Cannot delete the last consultant while visits depend on it. Create another consultant first.",
    ),
    ("internal_error", "An unexpected error occurred."),
    ("blank", "This field is required."),
    ("too_long", "This field exceeds the maximum length."),
    ("invalid_date", "Invalid date. Use YYYY-MM-DD or DD/MM/YYYY."),
    ("unknown_consultant", "The given consultant does not exist."),
];

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages }
    }

    /// Busca a mensagem no idioma pedido, cai para o português e, em último caso, devolve o próprio código.
    pub fn message(&self, lang: &str, code: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|table| table.get(code))
            .or_else(|| {
                self.messages
                    .get(DEFAULT_LANG)
                    .and_then(|table| table.get(code))
            })
            .map(|m| m.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
