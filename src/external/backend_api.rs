use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    CancelsAction, CancelsEditOutcome, Mapping, MappingAction, Participant, Prize, UploadOutcome,
};

/// Operations of the raffle data backend, the single owner of the four
/// authoritative lists. The console never patches list contents locally;
/// after every mutation the affected list is invalidated and refetched.
///
/// The wire format belongs to the backend; implementations translate it to
/// and from the console's own types.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn list_participants(&self) -> AppResult<Vec<Participant>>;
    async fn replace_participants(&self, csv: Vec<u8>) -> AppResult<UploadOutcome>;
    async fn delete_all_participants(&self) -> AppResult<()>;

    async fn list_prizes(&self) -> AppResult<Vec<Prize>>;
    async fn replace_prizes(&self, csv: Vec<u8>) -> AppResult<UploadOutcome>;
    async fn delete_all_prizes(&self) -> AppResult<()>;

    async fn list_mappings(&self) -> AppResult<Vec<Mapping>>;
    async fn delete_all_mappings(&self) -> AppResult<()>;
    /// Manual winner edit. `winner_id` is required for `Set` and `Overwrite`
    /// and ignored for `Delete`.
    async fn edit_mapping(
        &self,
        action: MappingAction,
        prize_id: &str,
        winner_id: Option<&str>,
    ) -> AppResult<()>;
    /// Live-draw commit; semantically a `Set` on the prize being drawn.
    async fn submit_winner(&self, prize_id: &str, winner_id: &str) -> AppResult<()>;

    async fn list_cancels(&self) -> AppResult<Vec<String>>;
    async fn delete_all_cancels(&self) -> AppResult<()>;
    async fn edit_cancels(
        &self,
        action: CancelsAction,
        ids: &[String],
    ) -> AppResult<CancelsEditOutcome>;
}
