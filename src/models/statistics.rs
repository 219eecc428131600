// src/models/statistics.rs

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

// As cinco categorias do painel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Negotiating,
    InProgress,
    Denied,
    Closed,
    ExistingClient,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    /// Ano com 4 dígitos. Padrão: ano corrente.
    pub year: Option<String>,
    /// Mês com 1 ou 2 dígitos. Padrão: mês corrente.
    pub month: Option<String>,
}

// O período (ano, mês) pedido, mantido como texto para reproduzir a comparação por prefixo/sufixo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub year: String,
    pub month: String,
}

impl Period {
    pub fn new(year: impl Into<String>, month: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
        }
    }

    /// Completa o que faltar na consulta com o mês de `today`.
    pub fn from_query(query: StatisticsQuery, today: NaiveDate) -> Self {
        Self::new(
            query.year.unwrap_or_else(|| today.year().to_string()),
            query
                .month
                .unwrap_or_else(|| format!("{:02}", today.month())),
        )
    }
}

// Só o que a agregação precisa de cada visita.
#[derive(Debug, Clone, FromRow)]
pub struct VisitDateStatus {
    pub visit_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub negotiating: u64,
    pub in_progress: u64,
    pub denied: u64,
    pub closed: u64,
    pub existing_client: u64,
}

impl StatusBreakdown {
    pub fn record(&mut self, category: StatusCategory) {
        let slot = match category {
            StatusCategory::Negotiating => &mut self.negotiating,
            StatusCategory::InProgress => &mut self.in_progress,
            StatusCategory::Denied => &mut self.denied,
            StatusCategory::Closed => &mut self.closed,
            StatusCategory::ExistingClient => &mut self.existing_client,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.negotiating + self.in_progress + self.denied + self.closed + self.existing_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_query_fields_default_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let period = Period::from_query(
            StatisticsQuery {
                year: None,
                month: None,
            },
            today,
        );
        assert_eq!(period, Period::new("2025", "03"));

        let period = Period::from_query(
            StatisticsQuery {
                year: Some("2024".into()),
                month: None,
            },
            today,
        );
        assert_eq!(period, Period::new("2024", "03"));
    }

    #[test]
    fn breakdown_serializes_in_camel_case() {
        let mut breakdown = StatusBreakdown::default();
        breakdown.record(StatusCategory::InProgress);
        breakdown.record(StatusCategory::ExistingClient);

        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["inProgress"], 1);
        assert_eq!(json["existingClient"], 1);
        assert_eq!(json["negotiating"], 0);
        assert_eq!(breakdown.total(), 2);
    }
}
