// src/services/integrity_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AgencyRepository, ConsultantRepository, VisitRepository},
    models::{agency::AgencyDeletion, consultant::ConsultantDeletion},
    services::auth::Caller,
};

// O que fazer com as visitas de um consultor que vai ser excluído.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultantDeletionPlan {
    // Nenhuma visita depende dele.
    DeleteOnly,
    ReassignThenDelete { replacement: Uuid },
}

impl ConsultantDeletionPlan {
    /// Decide a exclusão a partir do número de dependentes e do substituto disponível.
    /// Sem substituto e com dependentes, a exclusão é recusada e nada muda.
    pub fn decide(dependents: usize, replacement: Option<Uuid>) -> Result<Self, AppError> {
        match (dependents, replacement) {
            (0, _) => Ok(Self::DeleteOnly),
            (_, Some(replacement)) => Ok(Self::ReassignThenDelete { replacement }),
            (dependents, None) => Err(AppError::LastConsultant { dependents }),
        }
    }
}

// Gerenciador de integridade referencial: roda nas exclusões de consultores e
// agências e repara (ou recusa) para que nenhuma visita fique apontando para o vazio.
#[derive(Clone)]
pub struct IntegrityService {
    pool: PgPool,
    consultant_repo: ConsultantRepository,
    agency_repo: AgencyRepository,
    visit_repo: VisitRepository,
}

impl IntegrityService {
    pub fn new(
        pool: PgPool,
        consultant_repo: ConsultantRepository,
        agency_repo: AgencyRepository,
        visit_repo: VisitRepository,
    ) -> Self {
        Self {
            pool,
            consultant_repo,
            agency_repo,
            visit_repo,
        }
    }

    pub async fn delete_consultant(&self, caller: &Caller, id: Uuid) -> Result<ConsultantDeletion, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        // Qualquer `?` abaixo faz rollback automático no drop de `tx`.
        let mut tx = self.pool.begin().await?;

        // 1. Uma exclusão de consultor por vez
        self.consultant_repo.lock_deletions(&mut *tx).await?;

        // 2. Trava o alvo. Se outra exclusão chegou antes, ele já não existe.
        self.consultant_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ConsultantNotFound)?;

        // 3. Dependentes (travados) e candidato a substituto
        let dependents = self.visit_repo.lock_by_consultant(&mut *tx, id).await?;
        let replacement = self.consultant_repo.find_replacement(&mut *tx, id).await?;

        // 4. Decide
        let plan = ConsultantDeletionPlan::decide(dependents.len(), replacement).inspect_err(|_| {
            tracing::warn!(
                consultant_id = %id,
                dependents = dependents.len(),
                "Exclusão recusada: último consultor com visitas"
            );
        })?;

        // 5. Reatribui e exclui
        let (reassigned_count, replacement_id) = match plan {
            ConsultantDeletionPlan::DeleteOnly => (0, None),
            ConsultantDeletionPlan::ReassignThenDelete { replacement } => {
                let count = self
                    .visit_repo
                    .reassign_consultant(&mut *tx, id, replacement)
                    .await?;
                (count, Some(replacement))
            }
        };

        self.consultant_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(
            consultant_id = %id,
            reassigned = reassigned_count,
            replacement = ?replacement_id,
            caller = %caller.subject,
            "Consultor excluído"
        );

        Ok(ConsultantDeletion {
            reassigned_count,
            replacement_id,
        })
    }

    pub async fn delete_agency(&self, caller: &Caller, id: Uuid) -> Result<AgencyDeletion, AppError> {
        let mut tx = self.pool.begin().await?;

        let agency = self
            .agency_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::AgencyNotFound)?;

        // As visitas guardam o código da agência, não o id.
        let updated_count = self
            .visit_repo
            .clear_agency_code(&mut *tx, &agency.code)
            .await?;

        self.agency_repo.delete(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            agency_id = %id,
            code = %agency.code,
            updated = updated_count,
            caller = %caller.subject,
            "Agência excluída"
        );

        Ok(AgencyDeletion { updated_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::models::agency::CreateAgencyPayload;
    use crate::services::fixtures::{
        caller, consultant_of_visits, insert_consultant, state, visit_payload,
    };
    use sqlx::PgPool;

    #[test]
    fn consultant_without_visits_is_simply_deleted() {
        assert_eq!(
            ConsultantDeletionPlan::decide(0, None).unwrap(),
            ConsultantDeletionPlan::DeleteOnly
        );
        assert_eq!(
            ConsultantDeletionPlan::decide(0, Some(Uuid::new_v4())).unwrap(),
            ConsultantDeletionPlan::DeleteOnly
        );
    }

    #[test]
    fn dependents_move_to_the_replacement() {
        let replacement = Uuid::new_v4();
        assert_eq!(
            ConsultantDeletionPlan::decide(3, Some(replacement)).unwrap(),
            ConsultantDeletionPlan::ReassignThenDelete { replacement }
        );
    }

    #[test]
    fn last_consultant_with_visits_cannot_be_deleted() {
        let err = ConsultantDeletionPlan::decide(2, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert!(matches!(err, AppError::LastConsultant { dependents: 2 }));
    }

    // --- Contra o banco (sqlx::test cria um banco novo e roda as migrações) ---

    #[sqlx::test]
    async fn deleting_consultant_moves_visits_to_oldest_remaining(pool: PgPool) {
        let app = state(pool.clone());
        let oldest = insert_consultant(&pool, "Ana", 1).await;
        let _newer = insert_consultant(&pool, "Bia", 2).await;
        let target = insert_consultant(&pool, "Caio", 3).await;

        for _ in 0..2 {
            app.visit_service
                .create_visit(&caller(), &visit_payload(target, "A1"))
                .await
                .unwrap();
        }

        let deletion = app
            .integrity_service
            .delete_consultant(&caller(), target)
            .await
            .unwrap();

        assert_eq!(deletion.reassigned_count, 2);
        assert_eq!(deletion.replacement_id, Some(oldest));
        assert_eq!(consultant_of_visits(&pool).await, vec![oldest, oldest]);

        let remaining = app.visit_service.list_consultants(false).await.unwrap();
        assert!(remaining.iter().all(|c| c.id != target));
    }

    #[sqlx::test]
    async fn consultant_without_visits_is_deleted_without_replacement(pool: PgPool) {
        let app = state(pool.clone());
        let only = insert_consultant(&pool, "Ana", 1).await;

        let deletion = app
            .integrity_service
            .delete_consultant(&caller(), only)
            .await
            .unwrap();

        assert_eq!(deletion.reassigned_count, 0);
        assert_eq!(deletion.replacement_id, None);
        assert!(app.visit_service.list_consultants(false).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn last_consultant_with_visits_is_kept_untouched(pool: PgPool) {
        let app = state(pool.clone());
        let only = insert_consultant(&pool, "Ana", 1).await;
        for _ in 0..3 {
            app.visit_service
                .create_visit(&caller(), &visit_payload(only, "A1"))
                .await
                .unwrap();
        }

        let err = app
            .integrity_service
            .delete_consultant(&caller(), only)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(consultant_of_visits(&pool).await, vec![only, only, only]);
        let consultants = app.visit_service.list_consultants(false).await.unwrap();
        assert_eq!(consultants.len(), 1);
    }

    #[sqlx::test]
    async fn unknown_consultant_is_not_found(pool: PgPool) {
        let app = state(pool.clone());
        insert_consultant(&pool, "Ana", 1).await;

        let err = app
            .integrity_service
            .delete_consultant(&caller(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConsultantNotFound));
    }

    #[sqlx::test]
    async fn concurrent_deletions_of_same_consultant_run_once(pool: PgPool) {
        let app = state(pool.clone());
        let keeper = insert_consultant(&pool, "Ana", 1).await;
        let target = insert_consultant(&pool, "Bia", 2).await;
        app.visit_service
            .create_visit(&caller(), &visit_payload(target, "A1"))
            .await
            .unwrap();

        let (caller_a, caller_b) = (caller(), caller());
        let (first, second) = tokio::join!(
            app.integrity_service.delete_consultant(&caller_a, target),
            app.integrity_service.delete_consultant(&caller_b, target),
        );

        let mut outcomes = vec![first, second];
        outcomes.sort_by_key(|r| r.is_err());
        let ok = outcomes.remove(0).unwrap();
        assert_eq!(ok.reassigned_count, 1);
        assert!(matches!(outcomes.remove(0), Err(AppError::ConsultantNotFound)));
        assert_eq!(consultant_of_visits(&pool).await, vec![keeper]);
    }

    #[sqlx::test]
    async fn deleting_agency_blanks_only_its_visits(pool: PgPool) {
        let app = state(pool.clone());
        let consultant = insert_consultant(&pool, "Ana", 1).await;
        let agency = app
            .visit_service
            .create_agency(
                &caller(),
                &CreateAgencyPayload {
                    code: "A1".to_string(),
                    name: "Centro".to_string(),
                },
            )
            .await
            .unwrap();

        for code in ["A1", "A1", "B2"] {
            app.visit_service
                .create_visit(&caller(), &visit_payload(consultant, code))
                .await
                .unwrap();
        }

        let deletion = app
            .integrity_service
            .delete_agency(&caller(), agency.id)
            .await
            .unwrap();
        assert_eq!(deletion.updated_count, 2);

        let mut codes: Vec<_> = app
            .visit_service
            .list_visits()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.visit.agency_code)
            .collect();
        codes.sort();
        assert_eq!(codes, vec!["", "", "B2"]);
        assert!(app.visit_service.list_agencies().await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn unknown_agency_is_not_found(pool: PgPool) {
        let app = state(pool);
        let err = app
            .integrity_service
            .delete_agency(&caller(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AgencyNotFound));
    }
}
