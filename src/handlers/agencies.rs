// src/handlers/agencies.rs

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedCaller, i18n::Locale},
    models::agency::{Agency, AgencyDeletion, CreateAgencyPayload},
};

// GET /api/agencies
#[utoipa::path(
    get,
    path = "/api/agencies",
    tag = "Agencies",
    responses(
        (status = 200, description = "Lista de agências", body = Vec<Agency>)
    )
)]
pub async fn list_agencies(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let agencies = app_state
        .visit_service
        .list_agencies()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(agencies)))
}

// POST /api/agencies
#[utoipa::path(
    post,
    path = "/api/agencies",
    tag = "Agencies",
    request_body = CreateAgencyPayload,
    responses(
        (status = 201, description = "Agência criada", body = Agency),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<CreateAgencyPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| AppError::from(rejection).to_api_error(&locale, &app_state.i18n_store))?;

    let agency = app_state
        .visit_service
        .create_agency(&caller, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(agency)))
}

// DELETE /api/agencies/{id}
#[utoipa::path(
    delete,
    path = "/api/agencies/{id}",
    tag = "Agencies",
    params(
        ("id" = Uuid, Path, description = "ID de armazenamento da agência (não o código)")
    ),
    responses(
        (status = 200, description = "Agência excluída e visitas desvinculadas", body = AgencyDeletion),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = app_state
        .integrity_service
        .delete_agency(&caller, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(outcome)))
}
