// src/models/visit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_visit_date};

// Substitui o nome quando o consultor referenciado não existe mais.
pub const UNKNOWN_CONSULTANT: &str = "Unknown";

// Uma visita de prospecção como está no banco.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Uuid,

    // Canônico YYYY-MM-DD, mas registros legados em DD/MM/YYYY continuam como estão.
    #[schema(example = "2025-05-15")]
    pub visit_date: String,
    pub consultant_id: Uuid,
    // Código da agência. Vazio quando a agência foi excluída.
    #[schema(example = "A1")]
    pub agency_code: String,
    #[schema(example = "Acme Ltda")]
    pub prospected_company: String,
    #[schema(example = "João Lima")]
    pub company_contact: String,
    pub company_phone: Option<String>,
    pub company_email: Option<String>,
    pub notes: Option<String>,
    // Texto livre, sem máquina de estados.
    #[schema(example = "negociacao")]
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem: a visita mais o nome do consultor vindo do LEFT JOIN.
#[derive(Debug, Clone, FromRow)]
pub struct VisitListRow {
    #[sqlx(flatten)]
    pub visit: Visit,
    pub consultant_name: Option<String>,
}

// Projeção de leitura. Nada aqui é gravado.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitWithConsultant {
    #[serde(flatten)]
    pub visit: Visit,
    #[schema(example = "Ana Souza")]
    pub consultant_name: String,
    #[schema(example = "Negociação")]
    pub status_label: String,
}

impl From<VisitListRow> for VisitWithConsultant {
    fn from(row: VisitListRow) -> Self {
        let consultant_name = row
            .consultant_name
            .unwrap_or_else(|| UNKNOWN_CONSULTANT.to_string());
        let status_label = status_label(&row.visit.status);
        Self {
            visit: row.visit,
            consultant_name,
            status_label,
        }
    }
}

/// Rótulo de exibição para as chaves de status conhecidas; qualquer outro valor volta como veio.
/// Espaços nas pontas são ignorados, como na agregação.
pub fn status_label(status: &str) -> String {
    let label = match status.trim().to_lowercase().as_str() {
        "negociacao" => "Negociação",
        "andamento" => "Andamento",
        "negado" => "Negado",
        "fechado" => "Fechado",
        "jacliente" => "Já é Cliente",
        _ => return status.to_string(),
    };
    label.to_string()
}

// Todos os campos mutáveis de uma visita. Serve para criar e para a
// substituição completa na edição.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    #[validate(custom(function = "validate_visit_date"))]
    #[schema(example = "2025-05-15")]
    pub visit_date: String,

    pub consultant_id: Uuid,

    #[validate(length(max = 255, code = "too_long"))]
    #[serde(default)]
    #[schema(example = "A1")]
    pub agency_code: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Acme Ltda")]
    pub prospected_company: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "João Lima")]
    pub company_contact: String,

    pub company_phone: Option<String>,
    pub company_email: Option<String>,
    pub notes: Option<String>,

    #[serde(default)]
    #[schema(example = "negociacao")]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> VisitPayload {
        VisitPayload {
            visit_date: "2025-05-15".to_string(),
            consultant_id: Uuid::new_v4(),
            agency_code: "A1".to_string(),
            prospected_company: "Acme Ltda".to_string(),
            company_contact: "João".to_string(),
            company_phone: None,
            company_email: Some("isto não é validado".to_string()),
            notes: None,
            status: "qualquer coisa".to_string(),
        }
    }

    fn visit(status: &str) -> Visit {
        let now = Utc::now();
        Visit {
            id: Uuid::new_v4(),
            visit_date: "2025-05-15".to_string(),
            consultant_id: Uuid::new_v4(),
            agency_code: String::new(),
            prospected_company: "Acme".to_string(),
            company_contact: "João".to_string(),
            company_phone: None,
            company_email: None,
            notes: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn payload_accepts_free_status_and_empty_agency() {
        let mut p = payload();
        p.agency_code = String::new();
        p.status = String::new();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn payload_rejects_missing_required_fields() {
        let mut p = payload();
        p.prospected_company = "  ".to_string();
        p.visit_date = "15-05-2025".to_string();

        let errors = p.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("prospected_company"));
        assert!(fields.contains_key("visit_date"));
        assert!(!fields.contains_key("company_contact"));
    }

    #[test]
    fn legacy_date_passes_validation() {
        let mut p = payload();
        p.visit_date = "15/05/2025".to_string();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn projection_uses_consultant_name_when_present() {
        let row = VisitListRow {
            visit: visit("negociacao"),
            consultant_name: Some("Ana".to_string()),
        };
        let listed = VisitWithConsultant::from(row);
        assert_eq!(listed.consultant_name, "Ana");
        assert_eq!(listed.status_label, "Negociação");
    }

    #[test]
    fn projection_falls_back_to_unknown() {
        let row = VisitListRow {
            visit: visit("Em andamento"),
            consultant_name: None,
        };
        let listed = VisitWithConsultant::from(row);
        assert_eq!(listed.consultant_name, UNKNOWN_CONSULTANT);
        assert_eq!(listed.status_label, "Em andamento");
    }

    #[test]
    fn label_ignores_case_and_surrounding_spaces() {
        assert_eq!(status_label("fechado "), "Fechado");
        assert_eq!(status_label("  NEGADO"), "Negado");
        assert_eq!(status_label(" outro "), " outro ");
        assert_eq!(status_label(""), "");
    }

    #[test]
    fn listed_visit_serializes_flat_camel_case() {
        let listed = VisitWithConsultant::from(VisitListRow {
            visit: visit("jacliente"),
            consultant_name: Some("Ana".to_string()),
        });
        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json["consultantName"], "Ana");
        assert_eq!(json["statusLabel"], "Já é Cliente");
        assert_eq!(json["visitDate"], "2025-05-15");
        assert!(json.get("visit").is_none());
    }
}
