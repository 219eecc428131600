// src/services/visit_service.rs

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{AgencyRepository, ConsultantRepository, VisitRepository},
    models::{
        agency::{Agency, CreateAgencyPayload},
        consultant::{Consultant, CreateConsultantPayload},
        visit::{Visit, VisitPayload, VisitWithConsultant},
    },
    services::auth::Caller,
};

// CRUD de visitas e cadastros simples de consultores e agências.
// Toda operação de escrita exige um `Caller`, ou seja, um chamador já autenticado.
#[derive(Clone)]
pub struct VisitService {
    pool: PgPool,
    consultant_repo: ConsultantRepository,
    agency_repo: AgencyRepository,
    visit_repo: VisitRepository,
}

/// Mantém só os consultores que podem aparecer numa lista de seleção.
pub fn selectable_only(consultants: Vec<Consultant>) -> Vec<Consultant> {
    consultants.into_iter().filter(Consultant::is_selectable).collect()
}

impl VisitService {
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

    // =========================================================================
    //  CONSULTORES
    // =========================================================================

    pub async fn list_consultants(&self, selectable: bool) -> Result<Vec<Consultant>, AppError> {
        let consultants = self.consultant_repo.list().await?;
        if selectable {
            return Ok(selectable_only(consultants));
        }
        Ok(consultants)
    }

    pub async fn create_consultant(
        &self,
        caller: &Caller,
        payload: &CreateConsultantPayload,
    ) -> Result<Consultant, AppError> {
        payload.validate()?;

        let consultant = self
            .consultant_repo
            .create(&self.pool, Uuid::new_v4(), &payload.name)
            .await?;

        tracing::info!(consultant_id = %consultant.id, caller = %caller.subject, "Consultor criado");
        Ok(consultant)
    }

    // =========================================================================
    //  AGÊNCIAS
    // =========================================================================

    pub async fn list_agencies(&self) -> Result<Vec<Agency>, AppError> {
        self.agency_repo.list().await
    }

    pub async fn create_agency(
        &self,
        caller: &Caller,
        payload: &CreateAgencyPayload,
    ) -> Result<Agency, AppError> {
        payload.validate()?;

        let agency = self
            .agency_repo
            .create(&self.pool, Uuid::new_v4(), &payload.code, &payload.name)
            .await?;

        tracing::info!(agency_id = %agency.id, code = %agency.code, caller = %caller.subject, "Agência criada");
        Ok(agency)
    }

    // =========================================================================
    //  VISITAS
    // =========================================================================

    pub async fn list_visits(&self) -> Result<Vec<VisitWithConsultant>, AppError> {
        let rows = self.visit_repo.list_with_consultant().await?;
        Ok(rows.into_iter().map(VisitWithConsultant::from).collect())
    }

    pub async fn create_visit(&self, caller: &Caller, payload: &VisitPayload) -> Result<Visit, AppError> {
        // Nada vai para o banco se o payload for inválido.
        payload.validate()?;

        let visit = self
            .visit_repo
            .create(&self.pool, Uuid::new_v4(), payload)
            .await?;

        tracing::info!(visit_id = %visit.id, caller = %caller.subject, "Visita criada");
        Ok(visit)
    }

    pub async fn edit_visit(
        &self,
        caller: &Caller,
        id: Uuid,
        payload: &VisitPayload,
    ) -> Result<Visit, AppError> {
        payload.validate()?;

        let visit = self
            .visit_repo
            .replace(&self.pool, id, payload)
            .await?
            .ok_or(AppError::VisitNotFound)?;

        tracing::info!(visit_id = %visit.id, caller = %caller.subject, "Visita editada");
        Ok(visit)
    }

    pub async fn delete_visit(&self, caller: &Caller, id: Uuid) -> Result<(), AppError> {
        let deleted = self.visit_repo.delete(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::VisitNotFound);
        }

        tracing::info!(visit_id = %id, caller = %caller.subject, "Visita excluída");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use crate::services::fixtures::{caller, consultant_of_visits, insert_consultant, state, visit_payload};
    use chrono::Utc;

    fn consultant(name: &str) -> Consultant {
        Consultant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn selectable_list_drops_blank_names_only() {
        let all = vec![consultant("Ana"), consultant(""), consultant("   "), consultant("Bia")];
        let names: Vec<_> = selectable_only(all)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bia"]);
    }

    #[test]
    fn consultant_payload_allows_empty_name_but_not_huge_one() {
        let empty = CreateConsultantPayload { name: String::new() };
        assert!(empty.validate().is_ok());

        let huge = CreateConsultantPayload { name: "x".repeat(256) };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn agency_payload_requires_code() {
        let blank = CreateAgencyPayload {
            code: " ".to_string(),
            name: "Centro".to_string(),
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }

    // --- Contra o banco ---

    #[sqlx::test]
    async fn created_visit_is_listed_with_consultant_name(pool: PgPool) {
        let app = state(pool.clone());
        let ana = insert_consultant(&pool, "Ana Souza", 1).await;

        let created = app
            .visit_service
            .create_visit(&caller(), &visit_payload(ana, "A1"))
            .await
            .unwrap();

        let listed = app.visit_service.list_visits().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].visit.id, created.id);
        assert_eq!(listed[0].consultant_name, "Ana Souza");
        assert_eq!(listed[0].status_label, "Negociação");
    }

    #[sqlx::test]
    async fn listing_follows_stored_date_text(pool: PgPool) {
        let app = state(pool.clone());
        let ana = insert_consultant(&pool, "Ana", 1).await;
        for date in ["2025-04-01", "15/05/2025", "2025-05-15"] {
            let mut payload = visit_payload(ana, "A1");
            payload.visit_date = date.to_string();
            app.visit_service.create_visit(&caller(), &payload).await.unwrap();
        }

        let dates: Vec<_> = app
            .visit_service
            .list_visits()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.visit.visit_date)
            .collect();
        assert_eq!(dates, vec!["2025-05-15", "2025-04-01", "15/05/2025"]);
    }

    #[sqlx::test]
    async fn edit_replaces_every_mutable_field(pool: PgPool) {
        let app = state(pool.clone());
        let ana = insert_consultant(&pool, "Ana", 1).await;
        let bia = insert_consultant(&pool, "Bia", 2).await;
        let created = app
            .visit_service
            .create_visit(&caller(), &visit_payload(ana, "A1"))
            .await
            .unwrap();

        let mut changes = visit_payload(bia, "");
        changes.visit_date = "15/05/2025".to_string();
        changes.status = "fechado".to_string();
        let edited = app
            .visit_service
            .edit_visit(&caller(), created.id, &changes)
            .await
            .unwrap();

        assert_eq!(edited.id, created.id);
        assert_eq!(edited.consultant_id, bia);
        assert_eq!(edited.visit_date, "15/05/2025");
        assert_eq!(edited.agency_code, "");
        assert_eq!(edited.status, "fechado");
        assert_eq!(edited.created_at, created.created_at);
    }

    #[sqlx::test]
    async fn edit_and_delete_of_unknown_visit_are_not_found(pool: PgPool) {
        let app = state(pool.clone());
        let ana = insert_consultant(&pool, "Ana", 1).await;
        let missing = Uuid::new_v4();

        let edit = app
            .visit_service
            .edit_visit(&caller(), missing, &visit_payload(ana, "A1"))
            .await;
        assert!(matches!(edit, Err(AppError::VisitNotFound)));

        let delete = app.visit_service.delete_visit(&caller(), missing).await;
        assert!(matches!(delete, Err(AppError::VisitNotFound)));
    }

    #[sqlx::test]
    async fn deleted_visit_leaves_the_listing(pool: PgPool) {
        let app = state(pool.clone());
        let ana = insert_consultant(&pool, "Ana", 1).await;
        let created = app
            .visit_service
            .create_visit(&caller(), &visit_payload(ana, "A1"))
            .await
            .unwrap();

        app.visit_service
            .delete_visit(&caller(), created.id)
            .await
            .unwrap();

        assert!(app.visit_service.list_visits().await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn visit_for_unknown_consultant_is_a_validation_error(pool: PgPool) {
        let app = state(pool.clone());

        let err = app
            .visit_service
            .create_visit(&caller(), &visit_payload(Uuid::new_v4(), "A1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("consultant_id"));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        assert!(consultant_of_visits(&pool).await.is_empty());
    }

    #[sqlx::test]
    async fn selectable_listing_hides_blank_names(pool: PgPool) {
        let app = state(pool.clone());
        insert_consultant(&pool, "Ana", 1).await;
        insert_consultant(&pool, "  ", 2).await;

        assert_eq!(app.visit_service.list_consultants(false).await.unwrap().len(), 2);
        let selectable = app.visit_service.list_consultants(true).await.unwrap();
        assert_eq!(selectable.len(), 1);
        assert_eq!(selectable[0].name, "Ana");
    }
}
