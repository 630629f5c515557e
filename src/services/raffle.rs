use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::external::BackendApi;
use crate::models::{
    CancelsAction, Mapping, Participant, Prize, RafflePhase, RaffleStatus,
};
use crate::services::cache::{DataCache, integrity_warnings};
use crate::services::pool::{DrawRng, generate_pool, next_undrawn_prize, prize_group};
use crate::utils::RetryPolicy;

struct Snapshot {
    participants: Arc<Vec<Participant>>,
    prizes: Arc<Vec<Prize>>,
    mappings: Arc<Vec<Mapping>>,
    cancels: Arc<Vec<String>>,
}

struct RaffleSession {
    phase: RafflePhase,
    rng: Box<dyn DrawRng>,
}

/// Drives the on-stage draw ceremony for one prize at a time.
///
/// The session lock is held across commit/discard mutations, so operator
/// actions arriving while one is in flight wait and then observe the cleared
/// tentative winner: per draw cycle exactly one of confirm/discard can take
/// effect, and the other is a no-op.
pub struct RaffleService {
    backend: Arc<dyn BackendApi>,
    cache: Arc<DataCache>,
    retry: RetryPolicy,
    session: Mutex<RaffleSession>,
}

impl RaffleService {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        cache: Arc<DataCache>,
        retry: RetryPolicy,
        rng: Box<dyn DrawRng>,
    ) -> Self {
        Self {
            backend,
            cache,
            retry,
            session: Mutex::new(RaffleSession {
                phase: RafflePhase::Initializing,
                rng,
            }),
        }
    }

    async fn snapshot(&self) -> AppResult<Snapshot> {
        Ok(Snapshot {
            participants: self.cache.participants().await?,
            prizes: self.cache.prizes().await?,
            mappings: self.cache.mappings().await?,
            cancels: self.cache.cancels().await?,
        })
    }

    /// Reactive transitions driven purely by list data: completion whenever
    /// no undrawn prize remains or nobody is eligible, and revival out of
    /// `RafflingComplete` once both reappear. `Initializing` resolves
    /// immediately.
    fn sync_phase(phase: &mut RafflePhase, snap: &Snapshot) {
        let pool_empty =
            generate_pool(&snap.participants, &snap.cancels, &snap.mappings).is_empty();
        let exhausted = next_undrawn_prize(&snap.mappings).is_none() || pool_empty;

        match phase {
            RafflePhase::Initializing => {
                *phase = if exhausted {
                    RafflePhase::RafflingComplete
                } else {
                    RafflePhase::PrizeIntroduction
                };
            }
            RafflePhase::PrizeIntroduction | RafflePhase::Rolling if exhausted => {
                *phase = RafflePhase::RafflingComplete;
            }
            RafflePhase::RafflingComplete if !exhausted => {
                *phase = RafflePhase::PrizeIntroduction;
            }
            _ => {}
        }
    }

    fn build_status(phase: &RafflePhase, snap: &Snapshot) -> RaffleStatus {
        let pool = generate_pool(&snap.participants, &snap.cancels, &snap.mappings);
        let next = next_undrawn_prize(&snap.mappings);
        let next_prize = next.and_then(|m| snap.prizes.iter().find(|p| p.id == m.prize_id).cloned());
        let prize_group_ids = next
            .and_then(|m| prize_group(&snap.prizes, &m.prize_id))
            .filter(|group| group.len() > 1);

        RaffleStatus {
            phase: phase.clone(),
            next_prize,
            prize_group_ids,
            pool_size: pool.len(),
            undrawn_prizes: snap
                .mappings
                .iter()
                .filter(|m| m.winner_id.is_none())
                .count(),
            warnings: integrity_warnings(&snap.participants, &snap.mappings, &snap.cancels),
        }
    }

    /// Clear the tentative winner and move to `pending`, or `None` when no
    /// candidate is held. Clearing first is what makes confirm and discard
    /// mutually exclusive per draw cycle.
    fn take_tentative(
        phase: &mut RafflePhase,
        pending: RafflePhase,
    ) -> Option<(String, Participant)> {
        match std::mem::replace(phase, RafflePhase::Initializing) {
            RafflePhase::PossibleWinnerChosen { prize_id, tentative } => {
                *phase = pending;
                Some((prize_id, tentative))
            }
            other => {
                *phase = other;
                None
            }
        }
    }

    async fn force_reset(&self, session: &mut RaffleSession) {
        log::error!("Raffle session forced back to Initializing after a failed mutation");
        session.phase = RafflePhase::Initializing;
        self.cache.invalidate_all().await;
    }

    pub async fn status(&self) -> AppResult<RaffleStatus> {
        let snap = self.snapshot().await?;
        let mut session = self.session.lock().await;
        Self::sync_phase(&mut session.phase, &snap);
        Ok(Self::build_status(&session.phase, &snap))
    }

    /// Operator "advance": stop introducing the prize and start rolling.
    pub async fn advance(&self) -> AppResult<RaffleStatus> {
        let snap = self.snapshot().await?;
        let mut session = self.session.lock().await;
        Self::sync_phase(&mut session.phase, &snap);
        if !matches!(session.phase, RafflePhase::PrizeIntroduction) {
            return Err(AppError::ValidationError(format!(
                "Cannot advance while in state {}",
                session.phase.kind()
            )));
        }
        session.phase = RafflePhase::Rolling;
        Ok(Self::build_status(&session.phase, &snap))
    }

    /// Back out of rolling to show the prize again (no draw happened yet).
    pub async fn back(&self) -> AppResult<RaffleStatus> {
        let snap = self.snapshot().await?;
        let mut session = self.session.lock().await;
        Self::sync_phase(&mut session.phase, &snap);
        if !matches!(session.phase, RafflePhase::Rolling) {
            return Err(AppError::ValidationError(format!(
                "Cannot go back while in state {}",
                session.phase.kind()
            )));
        }
        session.phase = RafflePhase::PrizeIntroduction;
        Ok(Self::build_status(&session.phase, &snap))
    }

    /// Pick one participant uniformly at random from the current pool. The
    /// selection is tentative; nothing is persisted until confirm.
    pub async fn draw(&self) -> AppResult<RaffleStatus> {
        let snap = self.snapshot().await?;
        let mut session = self.session.lock().await;
        Self::sync_phase(&mut session.phase, &snap);
        if !matches!(session.phase, RafflePhase::Rolling) {
            return Err(AppError::ValidationError(format!(
                "Cannot draw while in state {}",
                session.phase.kind()
            )));
        }

        // Rolling implies a non-empty pool and an undrawn prize after sync.
        let pool = generate_pool(&snap.participants, &snap.cancels, &snap.mappings);
        let mapping = next_undrawn_prize(&snap.mappings).ok_or_else(|| {
            AppError::InternalError("no undrawn prize while Rolling".to_string())
        })?;
        if pool.is_empty() {
            return Err(AppError::InternalError(
                "empty pool while Rolling".to_string(),
            ));
        }

        let index = session.rng.pick(pool.len());
        let tentative = pool[index].clone();
        log::info!(
            "Drew tentative winner {} ({}) for prize {}",
            tentative.registration_id,
            tentative.display_name,
            mapping.prize_id
        );
        session.phase = RafflePhase::PossibleWinnerChosen {
            prize_id: mapping.prize_id.clone(),
            tentative,
        };
        Ok(Self::build_status(&session.phase, &snap))
    }

    /// Commit the tentative winner. No-op when no candidate is held.
    ///
    /// The audience has already seen the name on stage, so the write is
    /// retried within the policy's budget; exhaustion resets the session to a
    /// safe re-entry point and surfaces the error.
    pub async fn confirm(&self) -> AppResult<RaffleStatus> {
        let mut session = self.session.lock().await;
        let Some((prize_id, winner)) =
            Self::take_tentative(&mut session.phase, RafflePhase::PendingWinnerWrite)
        else {
            let snap = self.snapshot().await?;
            Self::sync_phase(&mut session.phase, &snap);
            return Ok(Self::build_status(&session.phase, &snap));
        };

        log::info!(
            "Committing winner {} for prize {}",
            winner.registration_id,
            prize_id
        );
        let backend = self.backend.clone();
        let commit = self
            .retry
            .run("winner commit", || {
                let backend = backend.clone();
                let prize_id = prize_id.clone();
                let winner_id = winner.registration_id.clone();
                async move { backend.submit_winner(&prize_id, &winner_id).await }
            })
            .await;

        if let Err(err) = commit {
            self.force_reset(&mut session).await;
            return Err(err);
        }

        session.phase = RafflePhase::PendingQueriesRefreshToPrizeIntroduction;
        if let Err(err) = self.cache.refresh_mappings().await {
            self.force_reset(&mut session).await;
            return Err(err);
        }

        // The refreshed mappings now carry the committed winner, so the
        // next-undrawn-prize computation advances by itself.
        session.phase = RafflePhase::PrizeIntroduction;
        let snap = self.snapshot().await?;
        Self::sync_phase(&mut session.phase, &snap);
        Ok(Self::build_status(&session.phase, &snap))
    }

    /// Reject the tentative winner as not present: flag them in the cancels
    /// list so future pools exclude them, then return to Rolling for a
    /// re-draw of the same prize. No-op when no candidate is held.
    pub async fn discard(&self) -> AppResult<RaffleStatus> {
        let mut session = self.session.lock().await;
        let Some((prize_id, winner)) =
            Self::take_tentative(&mut session.phase, RafflePhase::PendingWinnerDiscard)
        else {
            let snap = self.snapshot().await?;
            Self::sync_phase(&mut session.phase, &snap);
            return Ok(Self::build_status(&session.phase, &snap));
        };

        log::info!(
            "Discarding tentative winner {} for prize {} (not present)",
            winner.registration_id,
            prize_id
        );
        let backend = self.backend.clone();
        let discard = self
            .retry
            .run("winner discard", || {
                let backend = backend.clone();
                let winner_id = winner.registration_id.clone();
                async move {
                    backend
                        .edit_cancels(CancelsAction::Add, &[winner_id])
                        .await
                }
            })
            .await;

        match discard {
            Ok(outcome) => {
                if !outcome.success.contains(&winner.registration_id) {
                    log::warn!(
                        "Discarded winner {} was not newly flagged (skipped: {:?}, nonexistent: {:?})",
                        winner.registration_id,
                        outcome.skipped,
                        outcome.nonexistent_ids
                    );
                }
            }
            Err(err) => {
                self.force_reset(&mut session).await;
                return Err(err);
            }
        }

        session.phase = RafflePhase::PendingQueriesRefreshToRolling;
        if let Err(err) = self.cache.refresh_cancels().await {
            self.force_reset(&mut session).await;
            return Err(err);
        }

        // Same prize stays up; only the pool changes.
        session.phase = RafflePhase::Rolling;
        let snap = self.snapshot().await?;
        Self::sync_phase(&mut session.phase, &snap);
        Ok(Self::build_status(&session.phase, &snap))
    }

    /// Drop all session state and refetch everything: the safe re-entry
    /// point after an inconsistency.
    pub async fn reset(&self) -> AppResult<RaffleStatus> {
        let mut session = self.session.lock().await;
        session.phase = RafflePhase::Initializing;
        self.cache.invalidate_all().await;
        drop(session);
        self.status().await
    }
}
