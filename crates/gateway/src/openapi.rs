//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, StoreHealth};
use crate::handlers::registration_handler::{MessageResponse, UpdateRegistrationRequest};
use domain::{NewRegistration, Registration, RegistrationStats};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::registration_handler::list_registrations,
        crate::handlers::registration_handler::create_registration,
        crate::handlers::registration_handler::get_registration,
        crate::handlers::registration_handler::update_registration,
        crate::handlers::registration_handler::delete_registration,
        crate::handlers::registration_handler::toggle_check_in,
        crate::handlers::report_handler::registration_stats,
        crate::handlers::report_handler::export_csv,
        crate::handlers::report_handler::print_list,
        crate::handlers::report_handler::name_tags,
    ),
    components(
        schemas(
            Registration,
            NewRegistration,
            UpdateRegistrationRequest,
            MessageResponse,
            RegistrationStats,
            HealthResponse,
            StoreHealth,
        )
    ),
    tags(
        (name = "Registrations", description = "Family registration and check-in"),
        (name = "Reports", description = "Admin exports and printable pages"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;
