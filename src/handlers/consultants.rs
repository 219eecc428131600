// src/handlers/consultants.rs

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedCaller, i18n::Locale},
    models::consultant::{Consultant, ConsultantDeletion, CreateConsultantPayload, ListConsultantsQuery},
};

// GET /api/consultants
#[utoipa::path(
    get,
    path = "/api/consultants",
    tag = "Consultants",
    params(ListConsultantsQuery),
    responses(
        (status = 200, description = "Lista de consultores", body = Vec<Consultant>)
    )
)]
pub async fn list_consultants(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListConsultantsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let consultants = app_state
        .visit_service
        .list_consultants(query.selectable.unwrap_or(false))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(consultants)))
}

// POST /api/consultants
#[utoipa::path(
    post,
    path = "/api/consultants",
    tag = "Consultants",
    request_body = CreateConsultantPayload,
    responses(
        (status = 201, description = "Consultor criado", body = Consultant),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_consultant(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<CreateConsultantPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| AppError::from(rejection).to_api_error(&locale, &app_state.i18n_store))?;

    let consultant = app_state
        .visit_service
        .create_consultant(&caller, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(consultant)))
}

// DELETE /api/consultants/{id}
#[utoipa::path(
    delete,
    path = "/api/consultants/{id}",
    tag = "Consultants",
    params(
        ("id" = Uuid, Path, description = "ID do consultor")
    ),
    responses(
        (status = 200, description = "Consultor excluído e visitas reatribuídas", body = ConsultantDeletion),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Consultor não encontrado"),
        (status = 409, description = "Último consultor com visitas dependentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_consultant(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = app_state
        .integrity_service
        .delete_consultant(&caller, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(outcome)))
}
