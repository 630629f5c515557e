use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelsAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CancelsEditRequest {
    pub action: CancelsAction,
    pub ids: Vec<String>,
}

/// Per-ID partition of a cancels batch edit, reported by the backend.
/// All three buckets are surfaced to the operator, never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CancelsEditOutcome {
    /// IDs whose flag was changed.
    pub success: Vec<String>,
    /// IDs already in the requested state.
    pub skipped: Vec<String>,
    /// IDs not present in the participant list.
    pub nonexistent_ids: Vec<String>,
}

/// One cancels entry joined with its participant record. A cancel referencing
/// an unknown participant is kept and flagged, not hidden.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CancelRow {
    pub registration_id: String,
    pub participant: Option<Participant>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScanCancelRequest {
    pub code: String,
}

/// Barcode-scan staging area for the cancels editor. Scanned codes that match
/// a participant accumulate in `staged`; unknown codes go to `rejected`.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CancelsDraft {
    pub staged: Vec<String>,
    pub rejected: Vec<String>,
}
