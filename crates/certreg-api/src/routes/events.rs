//! # Event Feed
//!
//! Listeners poll `GET /v1/events?since=N` with the last sequence number
//! they processed and receive every later entry in order.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use certreg_state::{ChainIntegrity, JournalEntry};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// One journal entry as returned by the API.
///
/// Every state-changing endpoint responds with the entry it appended.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    /// Position in the journal, starting at 1.
    pub sequence: u64,
    /// When the event was recorded (ISO 8601, UTC).
    pub timestamp: String,
    /// Event name, e.g. `CertificateIssued`.
    pub event_type: String,
    /// Event payload, tagged with `type`.
    pub event: serde_json::Value,
    /// Hash of the previous entry.
    pub previous_hash: String,
    /// Hash of this entry.
    pub entry_hash: String,
}

impl From<&JournalEntry> for EventResponse {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            sequence: entry.sequence,
            timestamp: entry.timestamp.to_iso8601(),
            event_type: entry.event.name().to_string(),
            // Serializing a plain enum of hex newtypes cannot fail.
            event: serde_json::to_value(&entry.event).unwrap_or(serde_json::Value::Null),
            previous_hash: entry.previous_hash.clone(),
            entry_hash: entry.entry_hash.clone(),
        }
    }
}

/// Query for `GET /v1/events`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Return entries after this sequence number. Defaults to 0 (everything).
    #[serde(default)]
    pub since: u64,
}

/// Response for `GET /v1/events`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsResponse {
    /// Sequence number of the latest entry.
    pub head: u64,
    /// Entries after the requested sequence.
    pub events: Vec<EventResponse>,
}

/// Response for `GET /v1/events/integrity`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IntegrityResponse {
    pub total_entries: usize,
    pub broken_links: usize,
    pub chain_valid: bool,
}

impl From<ChainIntegrity> for IntegrityResponse {
    fn from(c: ChainIntegrity) -> Self {
        Self {
            total_entries: c.total_entries,
            broken_links: c.broken_links,
            chain_valid: c.chain_valid,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the events router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/events", get(list_events))
        .route("/v1/events/integrity", get(chain_integrity))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/events — Journal entries after `since`.
#[utoipa::path(
    get,
    path = "/v1/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Entries after the given sequence", body = EventsResponse),
        (status = 400, description = "Malformed query", body = crate::error::ErrorBody),
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, AppError> {
    let query = extract_query(query)?;
    let registry = state.registry.read();
    Ok(Json(EventsResponse {
        head: registry.journal().head(),
        events: registry
            .events_since(query.since)
            .iter()
            .map(EventResponse::from)
            .collect(),
    }))
}

/// GET /v1/events/integrity — Re-verify the journal hash chain.
#[utoipa::path(
    get,
    path = "/v1/events/integrity",
    responses(
        (status = 200, description = "Chain verification result", body = IntegrityResponse),
    ),
    tag = "events"
)]
pub async fn chain_integrity(State(state): State<AppState>) -> Json<IntegrityResponse> {
    Json(state.registry.read().journal().verify_chain().into())
}
