// src/services/fixtures.rs

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{config::AppState, models::visit::VisitPayload, services::auth::Caller};

pub(crate) fn state(pool: PgPool) -> AppState {
    AppState::from_pool(pool, "segredo-de-teste")
}

pub(crate) fn caller() -> Caller {
    Caller {
        subject: "ana@empresa.com".to_string(),
    }
}

// Grava o consultor com created_at fixo para o substituto ser previsível.
pub(crate) async fn insert_consultant(pool: &PgPool, name: &str, day: u32) -> Uuid {
    let id = Uuid::new_v4();
    let created_at = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
    sqlx::query("INSERT INTO consultants (id, name, created_at) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    id
}

pub(crate) fn visit_payload(consultant_id: Uuid, agency_code: &str) -> VisitPayload {
    VisitPayload {
        visit_date: "2025-05-15".to_string(),
        consultant_id,
        agency_code: agency_code.to_string(),
        prospected_company: "Acme Ltda".to_string(),
        company_contact: "João".to_string(),
        company_phone: None,
        company_email: None,
        notes: None,
        status: "negociacao".to_string(),
    }
}

pub(crate) async fn consultant_of_visits(pool: &PgPool) -> Vec<Uuid> {
    sqlx::query_scalar::<_, Uuid>("SELECT consultant_id FROM visits ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}
