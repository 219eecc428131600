pub mod auth;
pub mod integrity_service;
pub mod statistics_service;
pub mod visit_service;

pub use auth::AuthService;
pub use integrity_service::IntegrityService;
pub use statistics_service::StatisticsService;
pub use visit_service::VisitService;

#[cfg(test)]
pub(crate) mod fixtures;
