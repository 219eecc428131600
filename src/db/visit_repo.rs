// src/db/visit_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        statistics::VisitDateStatus,
        visit::{Visit, VisitListRow, VisitPayload},
    },
};

const VISIT_COLUMNS: &str = "id, visit_date, consultant_id, agency_code, prospected_company, \
     company_contact, company_phone, company_email, notes, status, created_at, updated_at";

#[derive(Clone)]
pub struct VisitRepository {
    pool: PgPool,
}

// A FK de consultant_id é quem garante que nenhuma visita aponta para consultor inexistente.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::field("consultant_id", "unknown_consultant");
        }
    }
    e.into()
}

impl VisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todas as visitas, mais recentes primeiro, com o nome do consultor (se ainda existir).
    /// A ordem é a do texto gravado: datas legadas DD/MM/YYYY ficam depois das ISO.
    pub async fn list_with_consultant(&self) -> Result<Vec<VisitListRow>, AppError> {
        let rows = sqlx::query_as::<_, VisitListRow>(
            r#"
            SELECT
                v.id, v.visit_date, v.consultant_id, v.agency_code,
                v.prospected_company, v.company_contact, v.company_phone,
                v.company_email, v.notes, v.status, v.created_at, v.updated_at,
                c.name AS consultant_name
            FROM visits v
            LEFT JOIN consultants c ON c.id = v.consultant_id
            ORDER BY v.visit_date DESC, v.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Varredura completa só com data e status, para a agregação.
    pub async fn list_dates_and_statuses(&self) -> Result<Vec<VisitDateStatus>, AppError> {
        let rows = sqlx::query_as::<_, VisitDateStatus>("SELECT visit_date, status FROM visits")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn create<'e, E>(&self, executor: E, id: Uuid, fields: &VisitPayload) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO visits (
                id, visit_date, consultant_id, agency_code, prospected_company,
                company_contact, company_phone, company_email, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {VISIT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Visit>(&sql)
            .bind(id)
            .bind(&fields.visit_date)
            .bind(fields.consultant_id)
            .bind(&fields.agency_code)
            .bind(&fields.prospected_company)
            .bind(&fields.company_contact)
            .bind(&fields.company_phone)
            .bind(&fields.company_email)
            .bind(&fields.notes)
            .bind(&fields.status)
            .fetch_one(executor)
            .await
            .map_err(map_write_error)
    }

    /// Substitui todos os campos mutáveis. `None` quando o id não existe.
    pub async fn replace<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        fields: &VisitPayload,
    ) -> Result<Option<Visit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE visits
            SET visit_date = $2,
                consultant_id = $3,
                agency_code = $4,
                prospected_company = $5,
                company_contact = $6,
                company_phone = $7,
                company_email = $8,
                notes = $9,
                status = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VISIT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Visit>(&sql)
            .bind(id)
            .bind(&fields.visit_date)
            .bind(fields.consultant_id)
            .bind(&fields.agency_code)
            .bind(&fields.prospected_company)
            .bind(&fields.company_contact)
            .bind(&fields.company_phone)
            .bind(&fields.company_email)
            .bind(&fields.notes)
            .bind(&fields.status)
            .fetch_optional(executor)
            .await
            .map_err(map_write_error)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Ids das visitas do consultor, travadas até o fim da transação.
    pub async fn lock_by_consultant<'e, E>(&self, executor: E, consultant_id: Uuid) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM visits WHERE consultant_id = $1 ORDER BY id FOR UPDATE",
        )
        .bind(consultant_id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    pub async fn reassign_consultant<'e, E>(
        &self,
        executor: E,
        from: Uuid,
        to: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE visits SET consultant_id = $2, updated_at = NOW() WHERE consultant_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Desvincula a agência: as visitas com esse código ficam com `agency_code` vazio.
    pub async fn clear_agency_code<'e, E>(&self, executor: E, code: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE visits SET agency_code = '', updated_at = NOW() WHERE agency_code = $1",
        )
        .bind(code)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
