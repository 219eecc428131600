// src/models/agency.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_blank;

// Agência solicitante. `code` é o identificador de negócio (é ele que as visitas
// guardam), distinto do `id` de armazenamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: Uuid,
    #[schema(example = "A1")]
    pub code: String,
    #[schema(example = "Agência Centro")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgencyPayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, code = "too_long")
    )]
    #[schema(example = "A1")]
    pub code: String,

    #[validate(length(max = 255, code = "too_long"))]
    #[schema(example = "Agência Centro")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDeletion {
    pub updated_count: u64,
}
