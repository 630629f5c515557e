use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::external::BackendApi;
use crate::models::{CancelRow, CancelsAction, CancelsDraft, CancelsEditOutcome};
use crate::services::cache::DataCache;

/// Maintains the cancel flags and a barcode-scan draft used to stage batch
/// edits before they are submitted.
pub struct CancelsEditorService {
    backend: Arc<dyn BackendApi>,
    cache: Arc<DataCache>,
    draft: Mutex<CancelsDraft>,
}

impl CancelsEditorService {
    pub fn new(backend: Arc<dyn BackendApi>, cache: Arc<DataCache>) -> Self {
        Self {
            backend,
            cache,
            draft: Mutex::new(CancelsDraft::default()),
        }
    }

    /// Cancel list joined with participant records. Unknown IDs keep their
    /// row with no participant attached.
    pub async fn list(&self) -> AppResult<Vec<CancelRow>> {
        let cancels = self.cache.cancels().await?;
        let participants = self.cache.participants().await?;
        Ok(cancels
            .iter()
            .map(|id| CancelRow {
                registration_id: id.clone(),
                participant: participants
                    .iter()
                    .find(|p| &p.registration_id == id)
                    .cloned(),
            })
            .collect())
    }

    pub async fn draft(&self) -> CancelsDraft {
        self.draft.lock().await.clone()
    }

    /// Stage a scanned code. Codes that match a participant land in the
    /// draft, unknown codes are kept on a rejected list so the operator can
    /// see what the scanner produced. Duplicates are ignored.
    pub async fn scan(&self, code: &str) -> AppResult<CancelsDraft> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::ValidationError("Empty barcode".to_string()));
        }
        let participants = self.cache.participants().await?;
        let mut draft = self.draft.lock().await;
        if participants.iter().any(|p| p.registration_id == code) {
            if !draft.staged.iter().any(|c| c == code) {
                draft.staged.push(code.to_string());
            }
        } else if !draft.rejected.iter().any(|c| c == code) {
            draft.rejected.push(code.to_string());
        }
        Ok(draft.clone())
    }

    pub async fn clear_draft(&self) -> CancelsDraft {
        let mut draft = self.draft.lock().await;
        *draft = CancelsDraft::default();
        draft.clone()
    }

    /// Submit one batch edit. The backend partitions the IDs per outcome;
    /// the whole partition is returned for display.
    pub async fn apply(
        &self,
        action: CancelsAction,
        ids: &[String],
    ) -> AppResult<CancelsEditOutcome> {
        if ids.is_empty() {
            return Err(AppError::ValidationError(
                "No registration IDs given".to_string(),
            ));
        }
        log::info!("Cancels edit: {action:?} {} IDs", ids.len());
        let outcome = self.backend.edit_cancels(action, ids).await?;
        self.cache.refresh_cancels().await?;
        Ok(outcome)
    }

    /// Submit the staged draft, clearing it on success.
    pub async fn apply_draft(&self, action: CancelsAction) -> AppResult<CancelsEditOutcome> {
        let staged = self.draft.lock().await.staged.clone();
        let outcome = self.apply(action, &staged).await?;
        let mut draft = self.draft.lock().await;
        *draft = CancelsDraft::default();
        Ok(outcome)
    }

    pub async fn wipe(&self) -> AppResult<Vec<CancelRow>> {
        self.backend.delete_all_cancels().await?;
        self.cache.refresh_cancels().await?;
        log::info!("All cancel flags wiped");
        self.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockBackend;

    fn editor() -> (CancelsEditorService, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::with_data(
            vec![
                MockBackend::participant("A", "Alice", true),
                MockBackend::participant("B", "Bob", true),
                MockBackend::participant("C", "Carol", false),
            ],
            vec![MockBackend::prize("p1", "Mug", "Acme")],
        ));
        let cache = Arc::new(DataCache::new(backend.clone()));
        (CancelsEditorService::new(backend.clone(), cache), backend)
    }

    #[tokio::test]
    async fn batch_edit_partitions_ids_per_outcome() {
        let (svc, backend) = editor();
        backend
            .edit_cancels(CancelsAction::Add, &["B".to_string()])
            .await
            .unwrap();

        let ids = vec!["A".to_string(), "B".to_string(), "ghost".to_string()];
        let outcome = svc.apply(CancelsAction::Add, &ids).await.unwrap();

        assert_eq!(outcome.success, vec!["A"]);
        assert_eq!(outcome.skipped, vec!["B"]);
        assert_eq!(outcome.nonexistent_ids, vec!["ghost"]);
        assert_eq!(backend.cancels(), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_before_submission() {
        let (svc, backend) = editor();
        assert!(svc.apply(CancelsAction::Add, &[]).await.is_err());
        assert!(backend.cancels().is_empty());
    }

    #[tokio::test]
    async fn scan_stages_known_ids_and_rejects_unknown_codes() {
        let (svc, _) = editor();

        svc.scan("A").await.unwrap();
        svc.scan("A").await.unwrap();
        svc.scan("nope").await.unwrap();
        let draft = svc.scan("C").await.unwrap();

        assert_eq!(draft.staged, vec!["A", "C"]);
        assert_eq!(draft.rejected, vec!["nope"]);
    }

    #[tokio::test]
    async fn apply_draft_submits_staged_ids_and_clears() {
        let (svc, backend) = editor();
        svc.scan("A").await.unwrap();
        svc.scan("C").await.unwrap();

        let outcome = svc.apply_draft(CancelsAction::Add).await.unwrap();
        assert_eq!(outcome.success, vec!["A", "C"]);
        assert_eq!(backend.cancels(), vec!["A", "C"]);
        assert!(svc.draft().await.staged.is_empty());
    }

    #[tokio::test]
    async fn removing_unflagged_id_is_skipped_not_failed() {
        let (svc, backend) = editor();
        let outcome = svc
            .apply(CancelsAction::Remove, &["A".to_string()])
            .await
            .unwrap();
        assert_eq!(outcome.skipped, vec!["A"]);
        assert!(backend.cancels().is_empty());
    }

    #[tokio::test]
    async fn list_keeps_dangling_cancel_entries() {
        let (svc, backend) = editor();
        backend
            .edit_cancels(CancelsAction::Add, &["A".to_string()])
            .await
            .unwrap();
        backend.delete_all_participants().await.unwrap();

        let rows = svc.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].registration_id, "A");
        assert!(rows[0].participant.is_none());
    }
}
