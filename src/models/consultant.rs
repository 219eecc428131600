// src/models/consultant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// O membro da equipe que recebe o crédito por uma visita.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: Uuid,
    // Pode ser vazio: fica fora das listas de seleção, mas continua no banco.
    #[schema(example = "Ana Souza")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Consultant {
    pub fn is_selectable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultantPayload {
    #[validate(length(max = 255, code = "too_long"))]
    #[schema(example = "Ana Souza")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListConsultantsQuery {
    /// Quando `true`, omite consultores sem nome.
    pub selectable: Option<bool>,
}

// Resultado da exclusão de um consultor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantDeletion {
    pub reassigned_count: u64,
    // Ausente quando nenhuma visita precisou ser reatribuída.
    pub replacement_id: Option<Uuid>,
}
