// src/common/error.rs

use std::collections::HashMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// As quatro categorias de falha que o chamador enxerga (mais o erro interno).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Validation,
    InvariantViolation,
    Internal,
}

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Não autorizado")]
    Unauthorized,

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo ausente, JSON malformado ou campo obrigatório faltando
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Visita não encontrada")]
    VisitNotFound,

    #[error("Consultor não encontrado")]
    ConsultantNotFound,

    #[error("Agência não encontrada")]
    AgencyNotFound,

    // Excluir o último consultor deixaria visitas órfãs.
    #[error("Não é possível excluir o último consultor: {dependents} visita(s) dependem dele")]
    LastConsultant { dependents: usize },

    // Falha de infraestrutura. Erros de inicialização ficam no anyhow do main.
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    /// Monta um erro de validação para um único campo.
    pub fn field(field: &'static str, code: &'static str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, validator::ValidationError::new(code));
        AppError::ValidationError(errors)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::ValidationError(_) | AppError::InvalidBody(_) => ErrorKind::Validation,
            AppError::VisitNotFound | AppError::ConsultantNotFound | AppError::AgencyNotFound => {
                ErrorKind::NotFound
            }
            AppError::LastConsultant { .. } => ErrorKind::InvariantViolation,
            AppError::DatabaseError(_) => ErrorKind::Internal,
        }
    }

    /// Código estável usado como chave de tradução e exposto no JSON.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::ValidationError(_) => "validation_failed",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::VisitNotFound => "visit_not_found",
            AppError::ConsultantNotFound => "consultant_not_found",
            AppError::AgencyNotFound => "agency_not_found",
            AppError::LastConsultant { .. } => "last_consultant",
            AppError::DatabaseError(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::InvariantViolation => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro de domínio na resposta HTTP traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        if self.kind() == ErrorKind::Internal {
            // O detalhe fica no log, o cliente só recebe a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(message) => message.to_string(),
                            None => i18n.message(lang, &e.code),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(details)
            }
            AppError::InvalidBody(rejection) => {
                Some(HashMap::from([("body".to_string(), vec![rejection.body_text()])]))
            }
            _ => None,
        };

        ApiError {
            status: self.status(),
            code: self.code(),
            message: i18n.message(lang, self.code()),
            details,
        }
    }
}

// A forma do erro que vai para o fio.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self.details {
            Some(details) => json!({
                "error": self.message,
                "code": self.code,
                "details": details,
            }),
            None => json!({ "error": self.message, "code": self.code }),
        };
        (self.status, Json(body)).into_response()
    }
}
