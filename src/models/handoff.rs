use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Participant, Prize};

/// Two-step pickup-desk flow: scan the winner's badge, then visually confirm
/// the prize before handing it over.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind")]
pub enum HandoffPhase {
    AwaitingWinnerBarcode,
    AwaitingPrizeConfirmation {
        participant_id: String,
        /// Every prize this participant won, in mapping order. A winner can
        /// hold several mappings; all of them stay navigable here.
        prize_ids: Vec<String>,
        /// Index into `prize_ids` currently shown for confirmation.
        selected: usize,
    },
}

/// One prize pending confirmation, joined for side-by-side display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HandoffPrizeRow {
    pub prize_id: String,
    pub prize: Option<Prize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HandoffStatus {
    pub phase: HandoffPhase,
    pub winner: Option<Participant>,
    pub prizes: Vec<HandoffPrizeRow>,
    /// Non-blocking lookup warnings, shown 5 seconds per line.
    pub warnings: Vec<String>,
    pub warning_display_secs: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HandoffScanRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HandoffSelectRequest {
    pub index: usize,
}

/// Completion request. `prize_barcode` is the re-scan check; omitting it is
/// the explicit escape hatch for unlabeled prizes.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HandoffCompleteRequest {
    pub prize_barcode: Option<String>,
}

/// Record of a completed handoff, echoed back to the desk operator.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HandoffReceipt {
    pub participant_id: String,
    pub prize_id: String,
    pub barcode_verified: bool,
}
