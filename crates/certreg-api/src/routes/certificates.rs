//! # Certificates
//!
//! ## Endpoints
//!
//! - `POST /v1/certificates` — Issue (authorized institutions, signature-bound).
//! - `GET  /v1/certificates/{hash}` — Stored record, revoked ones included.
//! - `POST /v1/certificates/{hash}/verify` — Verify (public).
//! - `POST /v1/certificates/{hash}/revoke` — Revoke (issuer only).
//!
//! The issuance signature travels as hex and is handed to the registry as
//! raw bytes. Any malformed signature, non-hex text included, surfaces as
//! the registry's `INVALID_SIGNATURE` rejection in its usual place in the
//! check order.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use certreg_core::{hex, Address, CertHash};
use certreg_state::{Certificate, RegistryError};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, parse_cert_hash, Validate};
use crate::routes::events::EventResponse;
use crate::state::AppState;

/// Upper bound on the stored content reference.
pub const MAX_IPFS_HASH_LEN: usize = 256;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for certificate issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCertificateRequest {
    /// Credential holder.
    #[schema(value_type = String)]
    pub recipient: Address,
    /// Certificate content fingerprint.
    #[schema(value_type = String)]
    pub cert_hash: CertHash,
    /// 65-byte `r ‖ s ‖ v` signature by the caller over the issuance message, hex.
    pub signature: String,
    /// Off-registry content reference.
    pub ipfs_hash: String,
}

impl Validate for IssueCertificateRequest {
    fn validate(&self) -> Result<(), String> {
        if self.ipfs_hash.len() > MAX_IPFS_HASH_LEN {
            return Err(format!(
                "ipfs_hash must not exceed {MAX_IPFS_HASH_LEN} bytes"
            ));
        }
        Ok(())
    }
}

/// Request body for verification.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyCertificateRequest {
    /// Presented recipient.
    #[schema(value_type = String)]
    pub recipient: Address,
}

/// Successful verification.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerificationResponse {
    pub valid: bool,
    pub ipfs_hash: String,
}

/// A stored certificate.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateResponse {
    #[schema(value_type = String)]
    pub cert_hash: CertHash,
    #[schema(value_type = String)]
    pub issuer: Address,
    #[schema(value_type = String)]
    pub recipient: Address,
    pub ipfs_hash: String,
    pub issued_at: String,
    pub revoked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<String>,
    /// `ISSUED` or `REVOKED`.
    pub status: String,
}

impl From<&Certificate> for CertificateResponse {
    fn from(cert: &Certificate) -> Self {
        Self {
            cert_hash: cert.cert_hash,
            issuer: cert.issuer,
            recipient: cert.recipient,
            ipfs_hash: cert.ipfs_hash.clone(),
            issued_at: cert.issued_at.to_iso8601(),
            revoked: cert.revoked,
            revoked_at: cert.revoked_at.as_ref().map(|t| t.to_iso8601()),
            status: cert.status().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the certificates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/certificates", post(issue_certificate))
        .route("/v1/certificates/{hash}", get(get_certificate))
        .route("/v1/certificates/{hash}/verify", post(verify_certificate))
        .route("/v1/certificates/{hash}/revoke", post(revoke_certificate))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/certificates — Issue a certificate.
#[utoipa::path(
    post,
    path = "/v1/certificates",
    params(("X-Caller-Address" = String, Header, description = "Issuing institution")),
    request_body = IssueCertificateRequest,
    responses(
        (status = 201, description = "Certificate issued", body = EventResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 403, description = "Caller not authorized or not the signer", body = crate::error::ErrorBody),
        (status = 409, description = "Certificate already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Null recipient, invalid signature, or oversized ipfs_hash", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn issue_certificate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<IssueCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let req = extract_validated_json(body)?;
    // Undecodable hex becomes an empty signature; the registry rejects it
    // at its signature step, after every earlier check.
    let signature = hex::decode(&req.signature).unwrap_or_default();

    let entry = state.registry.write().issue_certificate(
        &caller,
        req.recipient,
        req.cert_hash,
        &signature,
        req.ipfs_hash,
    )?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(&entry))))
}

/// GET /v1/certificates/{hash} — The stored record.
#[utoipa::path(
    get,
    path = "/v1/certificates/{hash}",
    params(("hash" = String, Path, description = "Certificate hash")),
    responses(
        (status = 200, description = "Certificate record", body = CertificateResponse),
        (status = 404, description = "No such certificate", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<CertificateResponse>, AppError> {
    let cert_hash = parse_cert_hash(&hash)?;
    let registry = state.registry.read();
    let cert = registry
        .get_certificate(&cert_hash)
        .ok_or(RegistryError::CertificateNotFound { cert_hash })?;
    Ok(Json(CertificateResponse::from(cert)))
}

/// POST /v1/certificates/{hash}/verify — Verify a certificate.
#[utoipa::path(
    post,
    path = "/v1/certificates/{hash}/verify",
    params(("hash" = String, Path, description = "Certificate hash")),
    request_body = VerifyCertificateRequest,
    responses(
        (status = 200, description = "Certificate is valid", body = VerificationResponse),
        (status = 404, description = "No such certificate", body = crate::error::ErrorBody),
        (status = 409, description = "Certificate revoked", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(hash): Path<String>,
    body: Result<Json<VerifyCertificateRequest>, JsonRejection>,
) -> Result<Json<VerificationResponse>, AppError> {
    let cert_hash = parse_cert_hash(&hash)?;
    let req = extract_json(body)?;
    let verification = state
        .registry
        .read()
        .verify_certificate(&cert_hash, &req.recipient)?;
    Ok(Json(VerificationResponse {
        valid: verification.valid,
        ipfs_hash: verification.ipfs_hash,
    }))
}

/// POST /v1/certificates/{hash}/revoke — Revoke a certificate.
#[utoipa::path(
    post,
    path = "/v1/certificates/{hash}/revoke",
    params(
        ("hash" = String, Path, description = "Certificate hash"),
        ("X-Caller-Address" = String, Header, description = "Issuing institution"),
    ),
    responses(
        (status = 200, description = "Certificate revoked", body = EventResponse),
        (status = 403, description = "Caller is not the issuer", body = crate::error::ErrorBody),
        (status = 404, description = "No such certificate", body = crate::error::ErrorBody),
        (status = 409, description = "Already revoked", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn revoke_certificate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(hash): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let cert_hash = parse_cert_hash(&hash)?;
    let entry = state
        .registry
        .write()
        .revoke_certificate(&caller, &cert_hash)?;
    Ok(Json(EventResponse::from(&entry)))
}
