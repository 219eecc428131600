// src/handlers/visits.rs

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedCaller, i18n::Locale},
    models::{
        statistics::{Period, StatisticsQuery, StatusBreakdown},
        visit::{Visit, VisitPayload, VisitWithConsultant},
    },
};

// GET /api/visits
#[utoipa::path(
    get,
    path = "/api/visits",
    tag = "Visits",
    responses(
        (status = 200, description = "Visitas da mais recente para a mais antiga, com o nome do consultor", body = Vec<VisitWithConsultant>)
    )
)]
pub async fn list_visits(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let visits = app_state
        .visit_service
        .list_visits()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(visits)))
}

// POST /api/visits
#[utoipa::path(
    post,
    path = "/api/visits",
    tag = "Visits",
    request_body = VisitPayload,
    responses(
        (status = 201, description = "Visita registrada", body = Visit),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    payload: Result<Json<VisitPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| AppError::from(rejection).to_api_error(&locale, &app_state.i18n_store))?;

    let visit = app_state
        .visit_service
        .create_visit(&caller, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(visit)))
}

// PUT /api/visits/{id}
#[utoipa::path(
    put,
    path = "/api/visits/{id}",
    tag = "Visits",
    request_body = VisitPayload,
    params(
        ("id" = Uuid, Path, description = "ID da visita")
    ),
    responses(
        (status = 200, description = "Visita substituída", body = Visit),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Visita não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<Uuid>,
    payload: Result<Json<VisitPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| AppError::from(rejection).to_api_error(&locale, &app_state.i18n_store))?;

    let visit = app_state
        .visit_service
        .edit_visit(&caller, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(visit)))
}

// DELETE /api/visits/{id}
#[utoipa::path(
    delete,
    path = "/api/visits/{id}",
    tag = "Visits",
    params(
        ("id" = Uuid, Path, description = "ID da visita")
    ),
    responses(
        (status = 204, description = "Visita excluída"),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Visita não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .visit_service
        .delete_visit(&caller, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/visits/statistics?year=2025&month=5
#[utoipa::path(
    get,
    path = "/api/visits/statistics",
    tag = "Visits",
    params(StatisticsQuery),
    responses(
        (status = 200, description = "Contagem por categoria de status no mês", body = StatusBreakdown)
    )
)]
pub async fn get_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = Period::from_query(query, Utc::now().date_naive());

    let breakdown = app_state
        .statistics_service
        .get_statistics(&period)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(breakdown)))
}
