use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::external::BackendApi;
use crate::models::{Mapping, Participant, Prize};

/// Read-through cache over the backend's four lists.
///
/// The backend owns the data; the console never patches cached entries in
/// place. After every mutation the affected list is invalidated and fetched
/// again, so the operator's view converges on the authoritative state instead
/// of drifting through local merges.
pub struct DataCache {
    backend: Arc<dyn BackendApi>,
    participants: RwLock<Option<Arc<Vec<Participant>>>>,
    prizes: RwLock<Option<Arc<Vec<Prize>>>>,
    mappings: RwLock<Option<Arc<Vec<Mapping>>>>,
    cancels: RwLock<Option<Arc<Vec<String>>>>,
}

impl DataCache {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self {
            backend,
            participants: RwLock::new(None),
            prizes: RwLock::new(None),
            mappings: RwLock::new(None),
            cancels: RwLock::new(None),
        }
    }

    pub async fn participants(&self) -> AppResult<Arc<Vec<Participant>>> {
        if let Some(cached) = self.participants.read().await.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.backend.list_participants().await?);
        *self.participants.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn prizes(&self) -> AppResult<Arc<Vec<Prize>>> {
        if let Some(cached) = self.prizes.read().await.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.backend.list_prizes().await?);
        *self.prizes.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn mappings(&self) -> AppResult<Arc<Vec<Mapping>>> {
        if let Some(cached) = self.mappings.read().await.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.backend.list_mappings().await?);
        *self.mappings.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn cancels(&self) -> AppResult<Arc<Vec<String>>> {
        if let Some(cached) = self.cancels.read().await.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.backend.list_cancels().await?);
        *self.cancels.write().await = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn invalidate_participants(&self) {
        *self.participants.write().await = None;
    }

    pub async fn invalidate_prizes(&self) {
        *self.prizes.write().await = None;
    }

    pub async fn invalidate_mappings(&self) {
        *self.mappings.write().await = None;
    }

    pub async fn invalidate_cancels(&self) {
        *self.cancels.write().await = None;
    }

    pub async fn invalidate_all(&self) {
        self.invalidate_participants().await;
        self.invalidate_prizes().await;
        self.invalidate_mappings().await;
        self.invalidate_cancels().await;
    }

    /// Invalidate-then-refetch, the required sequence after a mapping
    /// mutation resolves.
    pub async fn refresh_mappings(&self) -> AppResult<Arc<Vec<Mapping>>> {
        self.invalidate_mappings().await;
        self.mappings().await
    }

    pub async fn refresh_cancels(&self) -> AppResult<Arc<Vec<String>>> {
        self.invalidate_cancels().await;
        self.cancels().await
    }

    pub async fn refresh_participants(&self) -> AppResult<Arc<Vec<Participant>>> {
        self.invalidate_participants().await;
        self.participants().await
    }

    pub async fn refresh_prizes(&self) -> AppResult<Arc<Vec<Prize>>> {
        self.invalidate_prizes().await;
        self.prizes().await
    }
}

/// Cross-checks between loaded lists. Violations are surfaced as warnings and
/// the row keeps rendering with raw IDs; they are never silently dropped.
pub fn integrity_warnings(
    participants: &[Participant],
    mappings: &[Mapping],
    cancels: &[String],
) -> Vec<String> {
    let mut warnings = Vec::new();
    for mapping in mappings {
        if let Some(winner_id) = &mapping.winner_id {
            if !participants
                .iter()
                .any(|p| &p.registration_id == winner_id)
            {
                warnings.push(format!(
                    "Mapping for prize \"{}\" references unknown participant \"{}\"",
                    mapping.prize_id, winner_id
                ));
            }
        }
    }
    for cancel_id in cancels {
        if !participants
            .iter()
            .any(|p| &p.registration_id == cancel_id)
        {
            warnings.push(format!(
                "Cancels list contains unknown registration ID \"{cancel_id}\""
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockBackend;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn read_through_fetches_once() {
        let backend = Arc::new(MockBackend::with_data(
            vec![MockBackend::participant("1", "Alice", true)],
            vec![],
        ));
        let cache = DataCache::new(backend.clone());

        cache.participants().await.unwrap();
        cache.participants().await.unwrap();
        assert_eq!(backend.list_participants_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let backend = Arc::new(MockBackend::with_data(
            vec![],
            vec![MockBackend::prize("p1", "Mug", "Acme")],
        ));
        let cache = DataCache::new(backend.clone());

        cache.mappings().await.unwrap();
        cache.refresh_mappings().await.unwrap();
        assert_eq!(backend.list_mappings_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn integrity_cross_checks_flag_dangling_references() {
        let participants = vec![MockBackend::participant("1", "Alice", true)];
        let mappings = vec![
            Mapping {
                prize_id: "p1".into(),
                winner_id: Some("1".into()),
            },
            Mapping {
                prize_id: "p2".into(),
                winner_id: Some("ghost".into()),
            },
        ];
        let cancels = vec!["1".to_string(), "nobody".to_string()];

        let warnings = integrity_warnings(&participants, &mappings, &cancels);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("ghost"));
        assert!(warnings[1].contains("nobody"));
    }
}
