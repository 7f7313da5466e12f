//! # Recipient History
//!
//! ## Endpoints
//!
//! - `GET /v1/users/{address}/certificates/count`
//! - `GET /v1/users/{address}/certificates/{index}`
//! - `GET /v1/users/{address}/certificates?start=&end=` — inclusive range.
//!
//! Histories are append-only and include revoked certificates, so indexes
//! stay stable.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use certreg_core::{Address, CertHash};

use crate::error::AppError;
use crate::extractors::{extract_query, parse_address};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Response for the count endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateCountResponse {
    #[schema(value_type = String)]
    pub holder: Address,
    pub count: usize,
}

/// Response for the by-index endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateAtIndexResponse {
    #[schema(value_type = String)]
    pub holder: Address,
    pub index: usize,
    #[schema(value_type = String)]
    pub cert_hash: CertHash,
}

/// Inclusive range query.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// First index, inclusive.
    pub start: usize,
    /// Last index, inclusive.
    pub end: usize,
}

/// Response for the range endpoint. The two lists are index-aligned.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificatePageResponse {
    #[schema(value_type = String)]
    pub holder: Address,
    pub start: usize,
    pub end: usize,
    #[schema(value_type = Vec<String>)]
    pub cert_hashes: Vec<CertHash>,
    pub ipfs_hashes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/users/{address}/certificates", get(certificates_in_range))
        .route("/v1/users/{address}/certificates/count", get(certificate_count))
        .route(
            "/v1/users/{address}/certificates/{index}",
            get(certificate_at_index),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/users/{address}/certificates/count
#[utoipa::path(
    get,
    path = "/v1/users/{address}/certificates/count",
    params(("address" = String, Path, description = "Recipient address")),
    responses(
        (status = 200, description = "Number of certificates ever issued to the recipient",
            body = CertificateCountResponse),
        (status = 422, description = "Malformed address", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn certificate_count(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CertificateCountResponse>, AppError> {
    let holder = parse_address(&address)?;
    let count = state.registry.read().get_user_certificate_count(&holder);
    Ok(Json(CertificateCountResponse { holder, count }))
}

/// GET /v1/users/{address}/certificates/{index}
#[utoipa::path(
    get,
    path = "/v1/users/{address}/certificates/{index}",
    params(
        ("address" = String, Path, description = "Recipient address"),
        ("index" = usize, Path, description = "Zero-based position in issuance order"),
    ),
    responses(
        (status = 200, description = "Certificate hash at the index", body = CertificateAtIndexResponse),
        (status = 400, description = "Index out of range", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn certificate_at_index(
    State(state): State<AppState>,
    Path((address, index)): Path<(String, String)>,
) -> Result<Json<CertificateAtIndexResponse>, AppError> {
    let holder = parse_address(&address)?;
    let index: usize = index
        .parse()
        .map_err(|_| AppError::BadRequest(format!("index must be a non-negative integer, got '{index}'")))?;
    let cert_hash = state
        .registry
        .read()
        .get_user_certificate_at_index(&holder, index)?;
    Ok(Json(CertificateAtIndexResponse {
        holder,
        index,
        cert_hash,
    }))
}

/// GET /v1/users/{address}/certificates?start=&end=
#[utoipa::path(
    get,
    path = "/v1/users/{address}/certificates",
    params(
        ("address" = String, Path, description = "Recipient address"),
        RangeQuery,
    ),
    responses(
        (status = 200, description = "Certificates in the inclusive range", body = CertificatePageResponse),
        (status = 400, description = "Range invalid or out of bounds", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn certificates_in_range(
    State(state): State<AppState>,
    Path(address): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<CertificatePageResponse>, AppError> {
    let holder = parse_address(&address)?;
    let RangeQuery { start, end } = extract_query(query)?;
    let page = state
        .registry
        .read()
        .get_certificates_for_user(&holder, start, end)?;
    Ok(Json(CertificatePageResponse {
        holder,
        start,
        end,
        cert_hashes: page.cert_hashes,
        ipfs_hashes: page.ipfs_hashes,
    }))
}
