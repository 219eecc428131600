//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; o padrão é info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", config.server_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

fn build_router(app_state: AppState) -> Router {
    // Leituras são públicas
    let public_routes = Router::new()
        .route("/consultants", get(handlers::consultants::list_consultants))
        .route("/agencies", get(handlers::agencies::list_agencies))
        .route("/visits", get(handlers::visits::list_visits))
        .route("/visits/statistics", get(handlers::visits::get_statistics));

    // Toda escrita passa pelo auth_guard
    let protected_routes = Router::new()
        .route("/consultants", post(handlers::consultants::create_consultant))
        .route("/consultants/{id}", delete(handlers::consultants::delete_consultant))
        .route("/agencies", post(handlers::agencies::create_agency))
        .route("/agencies/{id}", delete(handlers::agencies::delete_agency))
        .route("/visits", post(handlers::visits::create_visit))
        .route(
            "/visits/{id}",
            put(handlers::visits::edit_visit).delete(handlers::visits::delete_visit),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(app_state)
}
