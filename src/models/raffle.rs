use serde::Serialize;
use utoipa::ToSchema;

use super::{Participant, Prize};

/// Position of the live draw ceremony.
///
/// `Pending*` phases exist while a state-committing mutation (or the list
/// refresh that follows it) is in flight; every operator control except
/// status polling is refused while one is held.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind")]
pub enum RafflePhase {
    Initializing,
    /// The next undrawn prize is shown large on stage.
    PrizeIntroduction,
    /// The participant pool is shuffling on screen, waiting for a draw.
    Rolling,
    /// A candidate was drawn but not yet committed. The operator either
    /// confirms (write winner) or discards (mark no-show, re-draw).
    PossibleWinnerChosen {
        prize_id: String,
        tentative: Participant,
    },
    PendingWinnerWrite,
    PendingQueriesRefreshToPrizeIntroduction,
    PendingWinnerDiscard,
    PendingQueriesRefreshToRolling,
    /// Every prize has a winner, or nobody eligible is left.
    RafflingComplete,
}

impl RafflePhase {
    pub fn kind(&self) -> &'static str {
        match self {
            RafflePhase::Initializing => "Initializing",
            RafflePhase::PrizeIntroduction => "PrizeIntroduction",
            RafflePhase::Rolling => "Rolling",
            RafflePhase::PossibleWinnerChosen { .. } => "PossibleWinnerChosen",
            RafflePhase::PendingWinnerWrite => "PendingWinnerWrite",
            RafflePhase::PendingQueriesRefreshToPrizeIntroduction => {
                "PendingQueriesRefreshToPrizeIntroduction"
            }
            RafflePhase::PendingWinnerDiscard => "PendingWinnerDiscard",
            RafflePhase::PendingQueriesRefreshToRolling => "PendingQueriesRefreshToRolling",
            RafflePhase::RafflingComplete => "RafflingComplete",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            RafflePhase::PendingWinnerWrite
                | RafflePhase::PendingQueriesRefreshToPrizeIntroduction
                | RafflePhase::PendingWinnerDiscard
                | RafflePhase::PendingQueriesRefreshToRolling
        )
    }
}

/// Everything the stage view needs to render one poll of the session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RaffleStatus {
    pub phase: RafflePhase,
    /// First mapping in list order with no winner, joined with its prize.
    pub next_prize: Option<Prize>,
    /// IDs of prizes identical to `next_prize` (same name and provider),
    /// when the next prize belongs to such a group.
    pub prize_group_ids: Option<Vec<String>>,
    /// Participants currently eligible to win the next prize.
    pub pool_size: usize,
    pub undrawn_prizes: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}
