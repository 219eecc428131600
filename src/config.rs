// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{AgencyRepository, ConsultantRepository, VisitRepository},
    services::{AuthService, IntegrityService, StatisticsService, VisitService},
};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Configuração lida do ambiente (e do .env, se existir)
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr,
            max_connections,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub visit_service: VisitService,
    pub integrity_service: IntegrityService,
    pub statistics_service: StatisticsService,
    pub i18n_store: I18nStore,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, &config.jwt_secret))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, jwt_secret: &str) -> Self {
        let consultant_repo = ConsultantRepository::new(db_pool.clone());
        let agency_repo = AgencyRepository::new(db_pool.clone());
        let visit_repo = VisitRepository::new(db_pool.clone());

        let visit_service = VisitService::new(
            db_pool.clone(),
            consultant_repo.clone(),
            agency_repo.clone(),
            visit_repo.clone(),
        );
        let integrity_service = IntegrityService::new(
            db_pool.clone(),
            consultant_repo,
            agency_repo,
            visit_repo.clone(),
        );
        let statistics_service = StatisticsService::new(visit_repo);

        Self {
            db_pool,
            auth_service: AuthService::new(jwt_secret),
            visit_service,
            integrity_service,
            statistics_service,
            i18n_store: I18nStore::new(),
        }
    }
}
