// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Consultores ---
        handlers::consultants::list_consultants,
        handlers::consultants::create_consultant,
        handlers::consultants::delete_consultant,

        // --- Agências ---
        handlers::agencies::list_agencies,
        handlers::agencies::create_agency,
        handlers::agencies::delete_agency,

        // --- Visitas ---
        handlers::visits::list_visits,
        handlers::visits::create_visit,
        handlers::visits::edit_visit,
        handlers::visits::delete_visit,
        handlers::visits::get_statistics,
    ),
    components(
        schemas(
            models::consultant::Consultant,
            models::consultant::CreateConsultantPayload,
            models::consultant::ConsultantDeletion,

            models::agency::Agency,
            models::agency::CreateAgencyPayload,
            models::agency::AgencyDeletion,

            models::visit::Visit,
            models::visit::VisitPayload,
            models::visit::VisitWithConsultant,

            models::statistics::StatusBreakdown,
        )
    ),
    tags(
        (name = "Consultants", description = "Consultores e exclusão com reatribuição de visitas"),
        (name = "Agencies", description = "Agências solicitantes"),
        (name = "Visits", description = "Registro de visitas e estatísticas mensais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/api/consultants",
            "/api/consultants/{id}",
            "/api/agencies",
            "/api/agencies/{id}",
            "/api/visits",
            "/api/visits/{id}",
            "/api/visits/statistics",
        ] {
            assert!(paths.iter().any(|p| p == expected), "faltando {expected}");
        }
    }
}
