//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Certificate Registry API",
        version = "0.1.0",
        description = "Institution authorization, signature-bound certificate issuance, verification, revocation, recipient history, and the registry event feed.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Institutions
        crate::routes::institutions::get_owner,
        crate::routes::institutions::authorize_institution,
        crate::routes::institutions::revoke_institution,
        crate::routes::institutions::get_institution,
        crate::routes::institutions::issuer_certificates,
        // Certificates
        crate::routes::certificates::issue_certificate,
        crate::routes::certificates::get_certificate,
        crate::routes::certificates::verify_certificate,
        crate::routes::certificates::revoke_certificate,
        // Users
        crate::routes::users::certificate_count,
        crate::routes::users::certificate_at_index,
        crate::routes::users::certificates_in_range,
        // Events
        crate::routes::events::list_events,
        crate::routes::events::chain_integrity,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::institutions::OwnerResponse,
        crate::routes::institutions::InstitutionStatusResponse,
        crate::routes::institutions::IssuerCertificatesResponse,
        crate::routes::certificates::IssueCertificateRequest,
        crate::routes::certificates::VerifyCertificateRequest,
        crate::routes::certificates::VerificationResponse,
        crate::routes::certificates::CertificateResponse,
        crate::routes::users::CertificateCountResponse,
        crate::routes::users::CertificateAtIndexResponse,
        crate::routes::users::CertificatePageResponse,
        crate::routes::events::EventResponse,
        crate::routes::events::EventsResponse,
        crate::routes::events::IntegrityResponse,
    )),
    tags(
        (name = "institutions", description = "Owner-managed institution whitelist"),
        (name = "certificates", description = "Issuance, verification, and revocation"),
        (name = "users", description = "Per-recipient certificate history"),
        (name = "events", description = "Hash-chained registry event feed"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
