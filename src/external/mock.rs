//! In-memory stand-in for the raffle data backend, used by unit tests.
//! Mirrors the backend's validation rules (SET refuses an already-won prize,
//! cancels edits partition per ID) and supports scripted transient failures.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::external::BackendApi;
use crate::models::{
    CancelsAction, CancelsEditOutcome, Mapping, MappingAction, Participant, Prize, UploadOutcome,
};

#[derive(Default)]
struct MockState {
    participants: Vec<Participant>,
    prizes: Vec<Prize>,
    mappings: Vec<Mapping>,
    cancels: Vec<String>,
}

#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
    /// Remaining injected failures per mutation kind; each failing call
    /// decrements its counter.
    pub fail_submit_winner: AtomicU32,
    pub fail_edit_cancels: AtomicU32,
    pub fail_edit_mapping: AtomicU32,
    pub list_participants_calls: AtomicU32,
    pub list_mappings_calls: AtomicU32,
}

impl MockBackend {
    /// Backend preloaded with participants and prizes; one unset mapping is
    /// created per prize, in prize-list order.
    pub fn with_data(participants: Vec<Participant>, prizes: Vec<Prize>) -> Self {
        let mappings = prizes
            .iter()
            .map(|p| Mapping {
                prize_id: p.id.clone(),
                winner_id: None,
            })
            .collect();
        Self {
            state: Mutex::new(MockState {
                participants,
                prizes,
                mappings,
                cancels: Vec::new(),
            }),
            ..Default::default()
        }
    }

    pub fn participant(id: &str, name: &str, attending: bool) -> Participant {
        Participant {
            registration_id: id.to_string(),
            username: format!("user_{id}"),
            display_name: name.to_string(),
            attending,
        }
    }

    pub fn prize(id: &str, name: &str, provider: &str) -> Prize {
        Prize {
            id: id.to_string(),
            display_name: name.to_string(),
            provider: provider.to_string(),
        }
    }

    pub fn cancels(&self) -> Vec<String> {
        self.state.lock().unwrap().cancels.clone()
    }

    pub fn mappings(&self) -> Vec<Mapping> {
        self.state.lock().unwrap().mappings.clone()
    }

    /// Pre-set a winner without going through SET validation.
    pub fn force_winner(&self, prize_id: &str, winner_id: &str) {
        let mut state = self.state.lock().unwrap();
        let mapping = state
            .mappings
            .iter_mut()
            .find(|m| m.prize_id == prize_id)
            .expect("unknown prize in test setup");
        mapping.winner_id = Some(winner_id.to_string());
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn list_participants(&self) -> AppResult<Vec<Participant>> {
        self.list_participants_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().participants.clone())
    }

    async fn replace_participants(&self, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        // The real backend parses CSV; the mock only counts lines past the
        // header so upload plumbing can be exercised.
        let text = String::from_utf8_lossy(&csv).to_string();
        let count = text.lines().skip(1).filter(|l| !l.trim().is_empty()).count() as u64;
        Ok(UploadOutcome::ok(count))
    }

    async fn delete_all_participants(&self) -> AppResult<()> {
        self.state.lock().unwrap().participants.clear();
        Ok(())
    }

    async fn list_prizes(&self) -> AppResult<Vec<Prize>> {
        Ok(self.state.lock().unwrap().prizes.clone())
    }

    async fn replace_prizes(&self, csv: Vec<u8>) -> AppResult<UploadOutcome> {
        let text = String::from_utf8_lossy(&csv).to_string();
        let count = text.lines().skip(1).filter(|l| !l.trim().is_empty()).count() as u64;
        Ok(UploadOutcome::ok(count))
    }

    async fn delete_all_prizes(&self) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.prizes.clear();
        state.mappings.clear();
        Ok(())
    }

    async fn list_mappings(&self) -> AppResult<Vec<Mapping>> {
        self.list_mappings_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().mappings.clone())
    }

    async fn delete_all_mappings(&self) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        for mapping in &mut state.mappings {
            mapping.winner_id = None;
        }
        Ok(())
    }

    async fn edit_mapping(
        &self,
        action: MappingAction,
        prize_id: &str,
        winner_id: Option<&str>,
    ) -> AppResult<()> {
        if Self::take_failure(&self.fail_edit_mapping) {
            return Err(AppError::BackendApiError("injected failure".into()));
        }
        let mut state = self.state.lock().unwrap();
        if !state.prizes.iter().any(|p| p.id == prize_id) {
            return Err(AppError::BackendApiError(format!(
                "400: prize {prize_id} does not exist"
            )));
        }
        if let Some(winner) = winner_id {
            if !state.participants.iter().any(|p| p.registration_id == winner) {
                return Err(AppError::BackendApiError(format!(
                    "400: participant {winner} does not exist"
                )));
            }
        }
        let mapping = state
            .mappings
            .iter_mut()
            .find(|m| m.prize_id == prize_id)
            .expect("mapping exists for every prize");
        match action {
            MappingAction::Set => {
                if mapping.winner_id.is_some() {
                    return Err(AppError::BackendApiError(format!(
                        "400: prize {prize_id} already has a winner"
                    )));
                }
                mapping.winner_id = winner_id.map(String::from);
            }
            MappingAction::Overwrite => {
                mapping.winner_id = winner_id.map(String::from);
            }
            MappingAction::Delete => {
                if mapping.winner_id.is_none() {
                    return Err(AppError::BackendApiError(format!(
                        "400: prize {prize_id} has not been raffled"
                    )));
                }
                mapping.winner_id = None;
            }
        }
        Ok(())
    }

    async fn submit_winner(&self, prize_id: &str, winner_id: &str) -> AppResult<()> {
        if Self::take_failure(&self.fail_submit_winner) {
            return Err(AppError::BackendApiError("injected failure".into()));
        }
        self.edit_mapping(MappingAction::Set, prize_id, Some(winner_id))
            .await
    }

    async fn list_cancels(&self) -> AppResult<Vec<String>> {
        Ok(self.state.lock().unwrap().cancels.clone())
    }

    async fn delete_all_cancels(&self) -> AppResult<()> {
        self.state.lock().unwrap().cancels.clear();
        Ok(())
    }

    async fn edit_cancels(
        &self,
        action: CancelsAction,
        ids: &[String],
    ) -> AppResult<CancelsEditOutcome> {
        if Self::take_failure(&self.fail_edit_cancels) {
            return Err(AppError::BackendApiError("injected failure".into()));
        }
        let mut state = self.state.lock().unwrap();
        let mut outcome = CancelsEditOutcome::default();
        for id in ids {
            if !state.participants.iter().any(|p| &p.registration_id == id) {
                outcome.nonexistent_ids.push(id.clone());
                continue;
            }
            let flagged = state.cancels.contains(id);
            match action {
                CancelsAction::Add => {
                    if flagged {
                        outcome.skipped.push(id.clone());
                    } else {
                        state.cancels.push(id.clone());
                        outcome.success.push(id.clone());
                    }
                }
                CancelsAction::Remove => {
                    if flagged {
                        state.cancels.retain(|c| c != id);
                        outcome.success.push(id.clone());
                    } else {
                        outcome.skipped.push(id.clone());
                    }
                }
            }
        }
        Ok(outcome)
    }
}
