//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Registry rejections keep their own error kind as the response code so
//! clients can branch on `NOT_AUTHORIZED_INSTITUTION` rather than on a
//! bare status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use certreg_core::{CryptoError, ValidationError};
use certreg_state::RegistryError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "CERTIFICATE_NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Registry(err) => (registry_status(err), err.code()),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        }
    }
}

fn registry_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::Unauthorized { .. } | RegistryError::NotAuthorizedInstitution { .. } => {
            StatusCode::FORBIDDEN
        }
        RegistryError::InvalidAddress { .. }
        | RegistryError::InvalidRecipient { .. }
        | RegistryError::InvalidSignature { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::CertificateNotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
        RegistryError::AlreadyAuthorized { .. }
        | RegistryError::NotAuthorized { .. }
        | RegistryError::CertificateExists { .. }
        | RegistryError::AlreadyRevoked { .. }
        | RegistryError::CertificateRevoked { .. } => StatusCode::CONFLICT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certreg_core::{Address, CertHash};
    use http_body_util::BodyExt;

    #[test]
    fn owner_rejection_is_forbidden() {
        let err = AppError::from(RegistryError::Unauthorized {
            caller: Address([1; 20]),
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::from(RegistryError::CertificateNotFound {
            cert_hash: CertHash([2; 32]),
        });
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn state_preconditions_are_conflicts() {
        let hash = CertHash([3; 32]);
        for err in [
            RegistryError::CertificateExists { cert_hash: hash },
            RegistryError::AlreadyRevoked { cert_hash: hash },
            RegistryError::CertificateRevoked { cert_hash: hash },
            RegistryError::AlreadyAuthorized {
                institution: Address([4; 20]),
            },
        ] {
            assert_eq!(registry_status(&err), StatusCode::CONFLICT, "{err}");
        }
    }

    #[test]
    fn range_error_is_bad_request() {
        let err = AppError::from(RegistryError::IndexOutOfRange {
            holder: Address([5; 20]),
            index: 9,
            count: 1,
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INDEX_OUT_OF_RANGE");
    }

    #[test]
    fn validation_error_converts() {
        let err: AppError = ValidationError::InvalidAddress("0x12".into()).into();
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn response_body_carries_code_and_message() {
        let response = AppError::from(RegistryError::CertificateRevoked {
            cert_hash: CertHash([6; 32]),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error.code, "CERTIFICATE_REVOKED");
        assert!(err.error.message.contains(&"06".repeat(32)));
    }
}
