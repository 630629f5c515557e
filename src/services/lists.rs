use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::external::BackendApi;
use crate::models::{Participant, Prize, UploadOutcome};
use crate::services::cache::DataCache;

/// CSV upload and wipe operations over the participant and prize lists.
pub struct ListAdminService {
    backend: Arc<dyn BackendApi>,
    cache: Arc<DataCache>,
}

impl ListAdminService {
    pub fn new(backend: Arc<dyn BackendApi>, cache: Arc<DataCache>) -> Self {
        Self { backend, cache }
    }

    pub async fn participants(&self) -> AppResult<Vec<Participant>> {
        Ok(self.cache.participants().await?.as_ref().clone())
    }

    pub async fn prizes(&self) -> AppResult<Vec<Prize>> {
        Ok(self.cache.prizes().await?.as_ref().clone())
    }

    /// Replace the participant list with an uploaded CSV. The backend
    /// validates the file; a rejected upload leaves the list untouched.
    pub async fn upload_participants(&self, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        if csv.is_empty() {
            return Err(AppError::ValidationError("Empty CSV upload".to_string()));
        }
        let outcome = self.backend.replace_participants(csv).await?;
        self.cache.refresh_participants().await?;
        log::info!(
            "Participant CSV upload: {} rows, error={:?}",
            outcome.count,
            outcome.error
        );
        Ok(outcome)
    }

    /// Replace the prize list. Prizes carry the mappings with them, so the
    /// mapping cache is refetched too.
    pub async fn upload_prizes(&self, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        if csv.is_empty() {
            return Err(AppError::ValidationError("Empty CSV upload".to_string()));
        }
        let outcome = self.backend.replace_prizes(csv).await?;
        self.cache.refresh_prizes().await?;
        self.cache.refresh_mappings().await?;
        log::info!(
            "Prize CSV upload: {} rows, error={:?}",
            outcome.count,
            outcome.error
        );
        Ok(outcome)
    }

    pub async fn wipe_participants(&self) -> AppResult<()> {
        self.backend.delete_all_participants().await?;
        self.cache.refresh_participants().await?;
        log::info!("Participant list wiped");
        Ok(())
    }

    pub async fn wipe_prizes(&self) -> AppResult<()> {
        self.backend.delete_all_prizes().await?;
        self.cache.refresh_prizes().await?;
        self.cache.refresh_mappings().await?;
        log::info!("Prize list wiped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockBackend;
    use std::sync::atomic::Ordering;

    fn admin() -> (ListAdminService, Arc<MockBackend>, Arc<DataCache>) {
        let backend = Arc::new(MockBackend::with_data(
            vec![MockBackend::participant("A", "Alice", true)],
            vec![MockBackend::prize("p1", "Mug", "Acme")],
        ));
        let cache = Arc::new(DataCache::new(backend.clone()));
        (
            ListAdminService::new(backend.clone(), cache.clone()),
            backend,
            cache,
        )
    }

    #[tokio::test]
    async fn upload_refreshes_the_cached_list() {
        let (svc, backend, _) = admin();
        svc.participants().await.unwrap();

        let csv = b"registration_id,username\nX,user_x\nY,user_y\n".to_vec();
        let outcome = svc.upload_participants(csv).await.unwrap();
        assert_eq!(outcome.count, 2);
        // Both the initial read and the post-upload refetch hit the backend.
        assert_eq!(backend.list_participants_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_csv_is_rejected_without_touching_the_backend() {
        let (svc, backend, _) = admin();
        assert!(svc.upload_participants(Vec::new()).await.is_err());
        assert_eq!(backend.list_participants_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wiping_prizes_also_drops_mappings() {
        let (svc, backend, cache) = admin();
        backend.force_winner("p1", "A");

        svc.wipe_prizes().await.unwrap();
        assert!(cache.prizes().await.unwrap().is_empty());
        assert!(cache.mappings().await.unwrap().is_empty());
    }
}
