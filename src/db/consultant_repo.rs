// src/db/consultant_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::consultant::Consultant};

// Chave do advisory lock que serializa as exclusões de consultores.
// Duas exclusões simultâneas nunca escolhem uma à outra como substituta.
const CONSULTANT_DELETION_LOCK: i64 = 0x5649_5349_5441_0001;

#[derive(Clone)]
pub struct ConsultantRepository {
    pool: PgPool,
}

impl ConsultantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Lista todos, sem filtro, do mais antigo para o mais novo
    pub async fn list(&self) -> Result<Vec<Consultant>, AppError> {
        let consultants = sqlx::query_as::<_, Consultant>(
            "SELECT id, name, created_at FROM consultants ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(consultants)
    }

    pub async fn create<'e, E>(&self, executor: E, id: Uuid, name: &str) -> Result<Consultant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let consultant = sqlx::query_as::<_, Consultant>(
            r#"
            INSERT INTO consultants (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(consultant)
    }

    /// Serializa as exclusões de consultores até o fim da transação corrente.
    pub async fn lock_deletions<'e, E>(&self, executor: E) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CONSULTANT_DELETION_LOCK)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Busca o consultor travando a linha até o fim da transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Consultant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let consultant = sqlx::query_as::<_, Consultant>(
            "SELECT id, name, created_at FROM consultants WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(consultant)
    }

    /// Substituto determinístico: o consultor mais antigo (menor id no empate) diferente de `excluded`.
    pub async fn find_replacement<'e, E>(&self, executor: E, excluded: Uuid) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let replacement = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM consultants
            WHERE id <> $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            FOR KEY SHARE
            "#,
        )
        .bind(excluded)
        .fetch_optional(executor)
        .await?;

        Ok(replacement)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM consultants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
