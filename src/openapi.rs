//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates the handler path annotations and wire schemas into a single
//! document served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blood Bank Core API",
        version = "0.1.0",
        description = "Donors, blood inventory and blood requests",
        contact(name = "Blood Bank Team")
    ),
    tags(
        (name = "Health", description = "Liveness and readiness checks"),
        (name = "Identity", description = "Registration, login, logout and token refresh"),
        (name = "Blood Types", description = "Blood type catalogue"),
        (name = "Donors", description = "Donor records"),
        (name = "Inventory", description = "Units in stock per blood type"),
        (name = "Blood Requests", description = "Requests filed by users and approved by admins"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::token_refresh,
        crate::api::blood_type::add,
        crate::api::blood_type::list,
        crate::api::donor::list,
        crate::api::donor::create,
        crate::api::donor::update,
        crate::api::donor::delete,
        crate::api::inventory::list,
        crate::api::inventory::create,
        crate::api::inventory::update,
        crate::api::blood_request::create,
        crate::api::blood_request::list,
        crate::api::blood_request::approve,
    ),
    components(
        schemas(
            crate::api::MessageResponse,
            crate::api::health::HealthResponse,
            crate::api::auth::RegisterResponse,
            crate::api::auth::LoginResponse,
            crate::api::auth::RefreshResponse,
            crate::api::blood_type::BloodTypeCreatedResponse,
            crate::api::blood_type::BloodTypeListResponse,
            crate::api::donor::DonorResponse,
            crate::api::inventory::InventoryResponse,
            crate::api::blood_request::BloodRequestResponse,
            crate::domain::BloodGroup,
            crate::domain::BloodType,
            crate::domain::AddBloodTypeInput,
            crate::domain::Donor,
            crate::domain::AddDonorInput,
            crate::domain::UpdateDonorInput,
            crate::domain::Inventory,
            crate::domain::AddInventoryInput,
            crate::domain::UpdateInventoryInput,
            crate::domain::BloodRequest,
            crate::domain::RequestBloodInput,
            crate::domain::UserProfile,
            crate::domain::RegisterInput,
            crate::domain::LoginInput,
            crate::domain::RefreshTokenInput,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The generated document plus the bearer JWT security scheme
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
        doc
    }
}
