pub mod agency_repo;
pub use agency_repo::AgencyRepository;
pub mod consultant_repo;
pub use consultant_repo::ConsultantRepository;
pub mod visit_repo;
pub use visit_repo::VisitRepository;
