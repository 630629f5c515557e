use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Participant, Prize};

/// Prize-to-winner association. One mapping exists per prize; `winner_id`
/// stays `None` until a draw commits a winner for it.
///
/// Mappings are processed strictly in list order: the next prize to draw is
/// the first mapping with no winner. There is no separate priority field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mapping {
    pub prize_id: String,
    pub winner_id: Option<String>,
}

/// Mutation kind for manual winner edits. The backend validates each kind
/// differently (e.g. `Set` is refused for an already-won prize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingAction {
    Set,
    Overwrite,
    Delete,
}

/// Mapping joined with its prize and winner records for display.
///
/// A dangling reference (winner set but absent from the participant list, or
/// a mapping whose prize no longer exists) keeps the raw IDs and gains a
/// warning instead of being dropped.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MappingRow {
    pub mapping: Mapping,
    pub prize: Option<Prize>,
    pub winner: Option<Participant>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BeginMappingEditRequest {
    pub prize_id: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChooseWinnerRequest {
    pub registration_id: String,
}

/// Current position in the guarded edit flow, for the operator UI.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MappingEditorStatus {
    pub phase: String,
    pub prize: Option<Prize>,
    pub current_winner: Option<Participant>,
    pub candidate: Option<Participant>,
    pub last_error: Option<String>,
}
