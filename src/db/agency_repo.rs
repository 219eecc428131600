// src/db/agency_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::agency::Agency};

#[derive(Clone)]
pub struct AgencyRepository {
    pool: PgPool,
}

impl AgencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Agency>, AppError> {
        let agencies = sqlx::query_as::<_, Agency>(
            "SELECT id, code, name, created_at FROM agencies ORDER BY code ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(agencies)
    }

    // Códigos duplicados são aceitos: o índice em `code` não é único.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        code: &str,
        name: &str,
    ) -> Result<Agency, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agency = sqlx::query_as::<_, Agency>(
            r#"
            INSERT INTO agencies (id, code, name)
            VALUES ($1, $2, $3)
            RETURNING id, code, name, created_at
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(agency)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Agency>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agency = sqlx::query_as::<_, Agency>(
            "SELECT id, code, name, created_at FROM agencies WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(agency)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM agencies WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
