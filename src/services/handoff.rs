use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{HandoffPhase, HandoffPrizeRow, HandoffReceipt, HandoffStatus};
use crate::services::cache::DataCache;

/// Seconds each warning line stays on screen at the pickup desk.
const WARNING_SECS_PER_LINE: u64 = 5;

struct HandoffSession {
    phase: HandoffPhase,
    warnings: Vec<String>,
}

/// Pickup-desk flow: scan the winner's badge, review their prizes, confirm
/// the physical prize, hand it over.
pub struct HandoffService {
    cache: Arc<DataCache>,
    session: Mutex<HandoffSession>,
}

impl HandoffService {
    pub fn new(cache: Arc<DataCache>) -> Self {
        Self {
            cache,
            session: Mutex::new(HandoffSession {
                phase: HandoffPhase::AwaitingWinnerBarcode,
                warnings: Vec::new(),
            }),
        }
    }

    async fn build_status(&self, session: &HandoffSession) -> AppResult<HandoffStatus> {
        let (winner, prizes) = match &session.phase {
            HandoffPhase::AwaitingWinnerBarcode => (None, Vec::new()),
            HandoffPhase::AwaitingPrizeConfirmation {
                participant_id,
                prize_ids,
                ..
            } => {
                let participants = self.cache.participants().await?;
                let all_prizes = self.cache.prizes().await?;
                // A dangling winner or prize ID still renders (raw ID only);
                // the integrity warning is the operator's cue, not a failure.
                let winner = participants
                    .iter()
                    .find(|p| &p.registration_id == participant_id)
                    .cloned();
                let rows = prize_ids
                    .iter()
                    .map(|prize_id| HandoffPrizeRow {
                        prize_id: prize_id.clone(),
                        prize: all_prizes.iter().find(|p| &p.id == prize_id).cloned(),
                    })
                    .collect();
                (winner, rows)
            }
        };

        Ok(HandoffStatus {
            phase: session.phase.clone(),
            winner,
            prizes,
            warnings: session.warnings.clone(),
            warning_display_secs: session.warnings.len() as u64 * WARNING_SECS_PER_LINE,
        })
    }

    pub async fn status(&self) -> AppResult<HandoffStatus> {
        let session = self.session.lock().await;
        self.build_status(&session).await
    }

    /// Step 1: a badge barcode was scanned (or typed). Collects every mapping
    /// won by that ID; with no match the desk stays on step 1 and shows a
    /// non-blocking, auto-expiring warning.
    pub async fn scan(&self, code: &str) -> AppResult<HandoffStatus> {
        let mut session = self.session.lock().await;
        if !matches!(session.phase, HandoffPhase::AwaitingWinnerBarcode) {
            return Err(AppError::ValidationError(
                "A handoff is already in progress; complete or reset it first".to_string(),
            ));
        }

        let mappings = self.cache.mappings().await?;
        let prize_ids: Vec<String> = mappings
            .iter()
            .filter(|m| m.winner_id.as_deref() == Some(code))
            .map(|m| m.prize_id.clone())
            .collect();

        if prize_ids.is_empty() {
            let mut warnings = vec![format!(
                "No winning record found for participant \"{code}\""
            )];
            let participants = self.cache.participants().await?;
            if !participants.iter().any(|p| p.registration_id == code) {
                warnings.push(format!(
                    "No participant with registration ID \"{code}\" was found either"
                ));
            }
            log::warn!("Handoff lookup failed for \"{code}\"");
            session.warnings = warnings;
            return self.build_status(&session).await;
        }

        session.warnings.clear();
        session.phase = HandoffPhase::AwaitingPrizeConfirmation {
            participant_id: code.to_string(),
            prize_ids,
            selected: 0,
        };
        self.build_status(&session).await
    }

    /// Switch which of the winner's prizes is up for confirmation.
    pub async fn select(&self, index: usize) -> AppResult<HandoffStatus> {
        let mut session = self.session.lock().await;
        match &mut session.phase {
            HandoffPhase::AwaitingPrizeConfirmation {
                prize_ids,
                selected,
                ..
            } => {
                if index >= prize_ids.len() {
                    return Err(AppError::ValidationError(format!(
                        "Prize index {index} out of range ({} won)",
                        prize_ids.len()
                    )));
                }
                *selected = index;
            }
            HandoffPhase::AwaitingWinnerBarcode => {
                return Err(AppError::ValidationError(
                    "No winner scanned yet".to_string(),
                ));
            }
        }
        self.build_status(&session).await
    }

    /// Step 2: hand the prize over. With a barcode the scanned prize must be
    /// the one on screen; without one this is the explicit escape hatch.
    pub async fn complete(&self, prize_barcode: Option<&str>) -> AppResult<HandoffReceipt> {
        let mut session = self.session.lock().await;
        let (participant_id, prize_id) = match &session.phase {
            HandoffPhase::AwaitingPrizeConfirmation {
                participant_id,
                prize_ids,
                selected,
            } => (participant_id.clone(), prize_ids[*selected].clone()),
            HandoffPhase::AwaitingWinnerBarcode => {
                return Err(AppError::ValidationError(
                    "No winner scanned yet".to_string(),
                ));
            }
        };

        if let Some(scanned) = prize_barcode {
            if scanned != prize_id {
                return Err(AppError::ValidationError(format!(
                    "Scanned prize \"{scanned}\" does not match the selected prize \"{prize_id}\""
                )));
            }
        }

        log::info!(
            "Handoff complete: prize {} to participant {} (barcode check: {})",
            prize_id,
            participant_id,
            prize_barcode.is_some()
        );
        session.phase = HandoffPhase::AwaitingWinnerBarcode;
        session.warnings.clear();
        Ok(HandoffReceipt {
            participant_id,
            prize_id,
            barcode_verified: prize_barcode.is_some(),
        })
    }

    pub async fn reset(&self) -> AppResult<HandoffStatus> {
        let mut session = self.session.lock().await;
        session.phase = HandoffPhase::AwaitingWinnerBarcode;
        session.warnings.clear();
        self.build_status(&session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockBackend;

    fn desk() -> (HandoffService, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::with_data(
            vec![
                MockBackend::participant("A", "Alice", true),
                MockBackend::participant("B", "Bob", true),
            ],
            vec![
                MockBackend::prize("p1", "Mug", "Acme"),
                MockBackend::prize("p2", "Shirt", "Acme"),
                MockBackend::prize("p3", "Sticker", "Other"),
            ],
        ));
        backend.force_winner("p1", "A");
        backend.force_winner("p3", "A");
        let cache = Arc::new(DataCache::new(backend.clone()));
        (HandoffService::new(cache), backend)
    }

    #[tokio::test]
    async fn multi_winner_surfaces_every_prize() {
        let (svc, _) = desk();

        let status = svc.scan("A").await.unwrap();
        match &status.phase {
            HandoffPhase::AwaitingPrizeConfirmation {
                participant_id,
                prize_ids,
                selected,
            } => {
                assert_eq!(participant_id, "A");
                assert_eq!(prize_ids, &vec!["p1".to_string(), "p3".to_string()]);
                assert_eq!(*selected, 0);
            }
            other => panic!("expected AwaitingPrizeConfirmation, got {other:?}"),
        }
        assert_eq!(status.prizes.len(), 2);
        assert_eq!(status.winner.as_ref().unwrap().display_name, "Alice");

        let status = svc.select(1).await.unwrap();
        match &status.phase {
            HandoffPhase::AwaitingPrizeConfirmation { selected, .. } => assert_eq!(*selected, 1),
            other => panic!("unexpected phase {other:?}"),
        }
        assert!(svc.select(2).await.is_err());
    }

    #[tokio::test]
    async fn unknown_id_warns_without_advancing() {
        let (svc, _) = desk();

        // B exists but has not won anything: one warning line.
        let status = svc.scan("B").await.unwrap();
        assert!(matches!(status.phase, HandoffPhase::AwaitingWinnerBarcode));
        assert_eq!(status.warnings.len(), 1);
        assert_eq!(status.warning_display_secs, 5);

        // Completely unknown ID: two lines, twice the display time.
        let status = svc.scan("zzz").await.unwrap();
        assert!(matches!(status.phase, HandoffPhase::AwaitingWinnerBarcode));
        assert_eq!(status.warnings.len(), 2);
        assert_eq!(status.warning_display_secs, 10);
    }

    #[tokio::test]
    async fn barcode_check_and_escape_hatch() {
        let (svc, _) = desk();

        svc.scan("A").await.unwrap();
        assert!(svc.complete(Some("p3")).await.is_err());

        let receipt = svc.complete(Some("p1")).await.unwrap();
        assert!(receipt.barcode_verified);
        assert_eq!(receipt.prize_id, "p1");

        // Desk is back on step 1 and can serve the escape hatch next.
        svc.scan("A").await.unwrap();
        svc.select(1).await.unwrap();
        let receipt = svc.complete(None).await.unwrap();
        assert!(!receipt.barcode_verified);
        assert_eq!(receipt.prize_id, "p3");
    }

    #[tokio::test]
    async fn scan_during_confirmation_is_rejected() {
        let (svc, _) = desk();
        svc.scan("A").await.unwrap();
        assert!(svc.scan("B").await.is_err());
        svc.reset().await.unwrap();
        assert!(svc.scan("B").await.is_ok());
    }
}
