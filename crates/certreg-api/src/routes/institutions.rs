//! # Institutions
//!
//! ## Endpoints
//!
//! - `GET    /v1/owner` — The registry owner.
//! - `POST   /v1/institutions/{address}` — Authorize (owner only).
//! - `DELETE /v1/institutions/{address}` — Revoke authorization (owner only).
//! - `GET    /v1/institutions/{address}` — Authorization status.
//! - `GET    /v1/issuers/{address}/certificates` — Everything an issuer issued.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use certreg_core::{Address, CertHash};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::parse_address;
use crate::routes::events::EventResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Response for `GET /v1/owner`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerResponse {
    #[schema(value_type = String, example = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf")]
    pub owner: Address,
}

/// Response for `GET /v1/institutions/{address}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InstitutionStatusResponse {
    #[schema(value_type = String)]
    pub institution: Address,
    pub authorized: bool,
}

/// Response for `GET /v1/issuers/{address}/certificates`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssuerCertificatesResponse {
    #[schema(value_type = String)]
    pub issuer: Address,
    pub count: usize,
    /// In issuance order, revoked certificates included.
    #[schema(value_type = Vec<String>)]
    pub cert_hashes: Vec<CertHash>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the institutions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/owner", get(get_owner))
        .route(
            "/v1/institutions/{address}",
            get(get_institution)
                .post(authorize_institution)
                .delete(revoke_institution),
        )
        .route("/v1/issuers/{address}/certificates", get(issuer_certificates))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/owner — The registry owner.
#[utoipa::path(
    get,
    path = "/v1/owner",
    responses((status = 200, description = "Registry owner", body = OwnerResponse)),
    tag = "institutions"
)]
pub async fn get_owner(State(state): State<AppState>) -> Json<OwnerResponse> {
    Json(OwnerResponse {
        owner: *state.registry.read().owner(),
    })
}

/// POST /v1/institutions/{address} — Authorize an institution.
#[utoipa::path(
    post,
    path = "/v1/institutions/{address}",
    params(
        ("address" = String, Path, description = "Institution address"),
        ("X-Caller-Address" = String, Header, description = "Calling account"),
    ),
    responses(
        (status = 201, description = "Institution authorized", body = EventResponse),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 409, description = "Already authorized", body = crate::error::ErrorBody),
        (status = 422, description = "Null address", body = crate::error::ErrorBody),
    ),
    tag = "institutions"
)]
pub async fn authorize_institution(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(address): Path<String>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let institution = parse_address(&address)?;
    let entry = state
        .registry
        .write()
        .authorize_institution(&caller, institution)?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(&entry))))
}

/// DELETE /v1/institutions/{address} — Revoke an institution's authorization.
#[utoipa::path(
    delete,
    path = "/v1/institutions/{address}",
    params(
        ("address" = String, Path, description = "Institution address"),
        ("X-Caller-Address" = String, Header, description = "Calling account"),
    ),
    responses(
        (status = 200, description = "Institution revoked", body = EventResponse),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 409, description = "Not authorized", body = crate::error::ErrorBody),
    ),
    tag = "institutions"
)]
pub async fn revoke_institution(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(address): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let institution = parse_address(&address)?;
    let entry = state
        .registry
        .write()
        .revoke_institution(&caller, institution)?;
    Ok(Json(EventResponse::from(&entry)))
}

/// GET /v1/institutions/{address} — Whether an institution is authorized.
#[utoipa::path(
    get,
    path = "/v1/institutions/{address}",
    params(("address" = String, Path, description = "Institution address")),
    responses(
        (status = 200, description = "Authorization status", body = InstitutionStatusResponse),
        (status = 422, description = "Malformed address", body = crate::error::ErrorBody),
    ),
    tag = "institutions"
)]
pub async fn get_institution(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<InstitutionStatusResponse>, AppError> {
    let institution = parse_address(&address)?;
    let authorized = state.registry.read().is_authorized(&institution);
    Ok(Json(InstitutionStatusResponse {
        institution,
        authorized,
    }))
}

/// GET /v1/issuers/{address}/certificates — Certificates an institution issued.
#[utoipa::path(
    get,
    path = "/v1/issuers/{address}/certificates",
    params(("address" = String, Path, description = "Issuer address")),
    responses(
        (status = 200, description = "Issued certificates", body = IssuerCertificatesResponse),
        (status = 422, description = "Malformed address", body = crate::error::ErrorBody),
    ),
    tag = "institutions"
)]
pub async fn issuer_certificates(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<IssuerCertificatesResponse>, AppError> {
    let issuer = parse_address(&address)?;
    let cert_hashes = state.registry.read().get_certificates_by_issuer(&issuer).to_vec();
    Ok(Json(IssuerCertificatesResponse {
        issuer,
        count: cert_hashes.len(),
        cert_hashes,
    }))
}
