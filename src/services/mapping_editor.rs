use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::external::BackendApi;
use crate::models::{
    Mapping, MappingAction, MappingEditorStatus, MappingRow, Participant,
};
use crate::services::cache::DataCache;

/// Guarded edit flow over the winner list, used outside the live draw.
/// Every mutating path goes through an explicit confirmation step first.
#[derive(Debug, Clone)]
enum EditorPhase {
    DisplayList,
    SelectWinner {
        prize_id: String,
        overwrite: bool,
    },
    ConfirmSelectWinner {
        prize_id: String,
        overwrite: bool,
        candidate: Participant,
    },
    ConfirmRemoveMapping {
        prize_id: String,
    },
    Processing,
}

impl EditorPhase {
    fn kind(&self) -> &'static str {
        match self {
            EditorPhase::DisplayList => "DisplayList",
            EditorPhase::SelectWinner { .. } => "SelectWinner",
            EditorPhase::ConfirmSelectWinner { .. } => "ConfirmSelectWinner",
            EditorPhase::ConfirmRemoveMapping { .. } => "ConfirmRemoveMapping",
            EditorPhase::Processing => "Processing",
        }
    }

    fn prize_id(&self) -> Option<&str> {
        match self {
            EditorPhase::SelectWinner { prize_id, .. }
            | EditorPhase::ConfirmSelectWinner { prize_id, .. }
            | EditorPhase::ConfirmRemoveMapping { prize_id } => Some(prize_id),
            _ => None,
        }
    }
}

struct EditorSession {
    phase: EditorPhase,
    last_error: Option<String>,
}

pub struct MappingEditorService {
    backend: Arc<dyn BackendApi>,
    cache: Arc<DataCache>,
    session: Mutex<EditorSession>,
}

impl MappingEditorService {
    pub fn new(backend: Arc<dyn BackendApi>, cache: Arc<DataCache>) -> Self {
        Self {
            backend,
            cache,
            session: Mutex::new(EditorSession {
                phase: EditorPhase::DisplayList,
                last_error: None,
            }),
        }
    }

    /// Mapping list joined with prize and winner records. Dangling
    /// references keep their row and gain a warning.
    pub async fn list(&self) -> AppResult<Vec<MappingRow>> {
        let participants = self.cache.participants().await?;
        let prizes = self.cache.prizes().await?;
        let mappings = self.cache.mappings().await?;

        Ok(mappings
            .iter()
            .map(|mapping| {
                let prize = prizes.iter().find(|p| p.id == mapping.prize_id).cloned();
                let winner = mapping.winner_id.as_ref().and_then(|winner_id| {
                    participants
                        .iter()
                        .find(|p| &p.registration_id == winner_id)
                        .cloned()
                });
                let mut warnings = Vec::new();
                if prize.is_none() {
                    warnings.push(format!("Prize \"{}\" not found", mapping.prize_id));
                }
                if let Some(winner_id) = &mapping.winner_id {
                    if winner.is_none() {
                        warnings.push(format!("Winner \"{winner_id}\" not found"));
                    }
                }
                MappingRow {
                    mapping: mapping.clone(),
                    prize,
                    winner,
                    warnings,
                }
            })
            .collect())
    }

    pub async fn status(&self) -> AppResult<MappingEditorStatus> {
        let session = self.session.lock().await;
        self.build_status(&session).await
    }

    async fn build_status(&self, session: &EditorSession) -> AppResult<MappingEditorStatus> {
        let (prize, current_winner) = match session.phase.prize_id() {
            Some(prize_id) => {
                let prizes = self.cache.prizes().await?;
                let prize = prizes.iter().find(|p| p.id == prize_id).cloned();
                let current_winner = self.current_winner(prize_id).await?;
                (prize, current_winner)
            }
            None => (None, None),
        };
        let candidate = match &session.phase {
            EditorPhase::ConfirmSelectWinner { candidate, .. } => Some(candidate.clone()),
            _ => None,
        };
        Ok(MappingEditorStatus {
            phase: session.phase.kind().to_string(),
            prize,
            current_winner,
            candidate,
            last_error: session.last_error.clone(),
        })
    }

    async fn current_winner(&self, prize_id: &str) -> AppResult<Option<Participant>> {
        let mappings = self.cache.mappings().await?;
        let participants = self.cache.participants().await?;
        Ok(mappings
            .iter()
            .find(|m| m.prize_id == prize_id)
            .and_then(|m| m.winner_id.as_ref())
            .and_then(|winner_id| {
                participants
                    .iter()
                    .find(|p| &p.registration_id == winner_id)
                    .cloned()
            }))
    }

    async fn find_mapping(&self, prize_id: &str) -> AppResult<Mapping> {
        let mappings = self.cache.mappings().await?;
        mappings
            .iter()
            .find(|m| m.prize_id == prize_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No mapping for prize \"{prize_id}\"")))
    }

    /// Start editing a prize row. Rows with a winner get `OVERWRITE`
    /// semantics, unset rows get `SET`.
    pub async fn begin_edit(&self, prize_id: &str) -> AppResult<MappingEditorStatus> {
        let mut session = self.session.lock().await;
        if !matches!(session.phase, EditorPhase::DisplayList) {
            return Err(AppError::ValidationError(format!(
                "An edit is already in progress ({})",
                session.phase.kind()
            )));
        }
        let mapping = self.find_mapping(prize_id).await?;
        session.phase = EditorPhase::SelectWinner {
            prize_id: prize_id.to_string(),
            overwrite: mapping.winner_id.is_some(),
        };
        session.last_error = None;
        self.build_status(&session).await
    }

    pub async fn begin_remove(&self, prize_id: &str) -> AppResult<MappingEditorStatus> {
        let mut session = self.session.lock().await;
        if !matches!(session.phase, EditorPhase::DisplayList) {
            return Err(AppError::ValidationError(format!(
                "An edit is already in progress ({})",
                session.phase.kind()
            )));
        }
        let mapping = self.find_mapping(prize_id).await?;
        if mapping.winner_id.is_none() {
            return Err(AppError::ValidationError(format!(
                "Prize \"{prize_id}\" has no winner to remove"
            )));
        }
        session.phase = EditorPhase::ConfirmRemoveMapping {
            prize_id: prize_id.to_string(),
        };
        session.last_error = None;
        self.build_status(&session).await
    }

    /// Pick the replacement winner. The currently assigned winner is not a
    /// valid candidate.
    pub async fn choose_winner(&self, registration_id: &str) -> AppResult<MappingEditorStatus> {
        let mut session = self.session.lock().await;
        let (prize_id, overwrite) = match &session.phase {
            EditorPhase::SelectWinner { prize_id, overwrite } => (prize_id.clone(), *overwrite),
            other => {
                return Err(AppError::ValidationError(format!(
                    "Not selecting a winner ({})",
                    other.kind()
                )));
            }
        };

        let participants = self.cache.participants().await?;
        let candidate = participants
            .iter()
            .find(|p| p.registration_id == registration_id)
            .cloned()
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "No participant with registration ID \"{registration_id}\""
                ))
            })?;

        let mapping = self.find_mapping(&prize_id).await?;
        if mapping.winner_id.as_deref() == Some(registration_id) {
            return Err(AppError::ValidationError(format!(
                "\"{registration_id}\" is already the winner of this prize"
            )));
        }

        session.phase = EditorPhase::ConfirmSelectWinner {
            prize_id,
            overwrite,
            candidate,
        };
        self.build_status(&session).await
    }

    /// Execute the confirmed mutation. On failure the confirmation step is
    /// restored with the raw backend message inline, so the operator can
    /// retry or cancel.
    pub async fn confirm(&self) -> AppResult<MappingEditorStatus> {
        let mut session = self.session.lock().await;
        let confirmed = std::mem::replace(&mut session.phase, EditorPhase::Processing);
        let (action, prize_id, winner_id) = match &confirmed {
            EditorPhase::ConfirmSelectWinner {
                prize_id,
                overwrite,
                candidate,
            } => {
                let action = if *overwrite {
                    MappingAction::Overwrite
                } else {
                    MappingAction::Set
                };
                (action, prize_id.clone(), Some(candidate.registration_id.clone()))
            }
            EditorPhase::ConfirmRemoveMapping { prize_id } => {
                (MappingAction::Delete, prize_id.clone(), None)
            }
            _ => {
                session.phase = confirmed;
                return Err(AppError::ValidationError(
                    "Nothing is awaiting confirmation".to_string(),
                ));
            }
        };

        log::info!("Mapping edit: {action:?} prize {prize_id} winner {winner_id:?}");
        let result = self
            .backend
            .edit_mapping(action, &prize_id, winner_id.as_deref())
            .await;

        match result {
            Ok(()) => {
                self.cache.refresh_mappings().await?;
                session.phase = EditorPhase::DisplayList;
                session.last_error = None;
                self.build_status(&session).await
            }
            Err(err) => {
                session.phase = confirmed;
                session.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn cancel(&self) -> AppResult<MappingEditorStatus> {
        let mut session = self.session.lock().await;
        session.phase = EditorPhase::DisplayList;
        session.last_error = None;
        self.build_status(&session).await
    }

    /// Wipe every winner, keeping the mappings themselves.
    pub async fn wipe_all(&self) -> AppResult<Vec<MappingRow>> {
        self.backend.delete_all_mappings().await?;
        self.cache.refresh_mappings().await?;
        log::info!("All winner mappings wiped");
        self.list().await
    }
}
