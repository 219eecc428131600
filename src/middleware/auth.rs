// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::auth::Caller,
};

// O middleware em si: sem token válido a requisição para aqui, antes do handler
// e de qualquer acesso ao banco.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let caller = token
        .ok_or(AppError::Unauthorized)
        .and_then(|token| app_state.auth_service.validate_token(token))
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Insere o chamador nos "extensions" da requisição
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

// Extrator para obter o chamador autenticado diretamente nos handlers
pub struct AuthenticatedCaller(pub Caller);

impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(caller) = parts.extensions.get::<Caller>() {
            return Ok(AuthenticatedCaller(caller.clone()));
        }

        let locale = Locale::from_parts(parts);
        Err(AppError::Unauthorized.to_api_error(&locale, &state.i18n_store))
    }
}
