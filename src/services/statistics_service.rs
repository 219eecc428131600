// src/services/statistics_service.rs

use crate::{
    common::error::AppError,
    db::VisitRepository,
    models::statistics::{Period, StatusBreakdown, StatusCategory, VisitDateStatus},
};

/// Classifica um status (já em minúsculas e sem espaços nas pontas).
/// A ordem importa: a primeira substring encontrada vence.
/// Acentos não são removidos, por isso as duas grafias de "negociação" são testadas.
pub fn classify_status(status: &str) -> Option<StatusCategory> {
    if status.contains("fechado") {
        Some(StatusCategory::Closed)
    } else if status.contains("negociacao") || status.contains("negociação") {
        Some(StatusCategory::Negotiating)
    } else if status.contains("andamento") {
        Some(StatusCategory::InProgress)
    } else if status.contains("negado") {
        Some(StatusCategory::Denied)
    } else if status.contains("cliente") {
        Some(StatusCategory::ExistingClient)
    } else {
        None
    }
}

/// Converte `DD/MM/YYYY` em `YYYY-MM-DD`. Qualquer outra coisa volta intacta.
pub fn normalize_visit_date(date: &str) -> String {
    if date.contains('/') {
        let parts: Vec<&str> = date.split('/').collect();
        if let [day, month, year] = parts.as_slice() {
            return format!("{year}-{month}-{day}");
        }
    }
    date.to_string()
}

/// A visita pertence ao período se a data normalizada começa com `YYYY-MM`
/// ou se a data original termina com `/MM/YYYY` (mês como veio na consulta).
pub fn matches_period(visit_date: &str, period: &Period) -> bool {
    if visit_date.is_empty() {
        return false;
    }

    let year_month = format!("{}-{:0>2}", period.year, period.month);
    let legacy_suffix = format!("/{}/{}", period.month, period.year);

    normalize_visit_date(visit_date).starts_with(&year_month) || visit_date.ends_with(&legacy_suffix)
}

/// Agrega as visitas do período nas cinco categorias.
pub fn tally<'a, I>(visits: I, period: &Period) -> StatusBreakdown
where
    I: IntoIterator<Item = &'a VisitDateStatus>,
{
    let mut breakdown = StatusBreakdown::default();

    for visit in visits {
        let status = match visit.status.as_deref() {
            Some(s) if !s.is_empty() => s.trim().to_lowercase(),
            _ => {
                tracing::trace!("Visita sem status, ignorando");
                continue;
            }
        };

        let date = visit.visit_date.as_deref().unwrap_or_default();
        if !matches_period(date, period) {
            tracing::trace!(date, "Fora do período");
            continue;
        }

        match classify_status(&status) {
            Some(category) => breakdown.record(category),
            None => tracing::trace!(%status, "Status não reconhecido, fora de todas as categorias"),
        }
    }

    breakdown
}

// Consulta de leitura pura: varre todas as visitas, sem travas.
#[derive(Clone)]
pub struct StatisticsService {
    visit_repo: VisitRepository,
}

impl StatisticsService {
    pub fn new(visit_repo: VisitRepository) -> Self {
        Self { visit_repo }
    }

    #[tracing::instrument(name = "statistics", skip(self, period), fields(year = %period.year, month = %period.month))]
    pub async fn get_statistics(&self, period: &Period) -> Result<StatusBreakdown, AppError> {
        let visits = self.visit_repo.list_dates_and_statuses().await?;
        tracing::debug!(visits = visits.len(), "Visitas carregadas");

        let breakdown = tally(&visits, period);
        tracing::debug!(?breakdown, total = breakdown.total(), "Estatísticas calculadas");

        Ok(breakdown)
    }
}
