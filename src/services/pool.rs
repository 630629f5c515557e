use rand::Rng;

use crate::models::{Mapping, Participant, Prize};

/// Random source for the live draw, injected so tests can script the
/// sequence. Selection is the only non-deterministic step in the raffle;
/// pool generation itself is pure.
pub trait DrawRng: Send {
    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct ThreadRngDraw;

impl DrawRng for ThreadRngDraw {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Scripted random source for tests; yields the configured indices in order
/// (modulo the pool length) and repeats the last one.
pub struct FixedDraw {
    picks: Vec<usize>,
    cursor: usize,
}

impl FixedDraw {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, cursor: 0 }
    }
}

impl DrawRng for FixedDraw {
    fn pick(&mut self, len: usize) -> usize {
        let idx = self
            .picks
            .get(self.cursor)
            .or_else(|| self.picks.last())
            .copied()
            .unwrap_or(0);
        self.cursor += 1;
        idx % len
    }
}

/// Compute the set of participants eligible to win the next undrawn prize.
///
/// Base eligibility is `attending` minus the cancels list. Past winners are
/// then removed in mapping-list order; whenever that empties the pool, the
/// pool is reset to the full eligible set and the scan continues. Repeat wins
/// therefore become possible once every eligible participant has won, and
/// replaying the same mapping history always reproduces the same pool.
pub fn generate_pool(
    participants: &[Participant],
    cancels: &[String],
    mappings: &[Mapping],
) -> Vec<Participant> {
    let eligible: Vec<Participant> = participants
        .iter()
        .filter(|p| p.attending && !cancels.contains(&p.registration_id))
        .cloned()
        .collect();

    let mut pool = eligible.clone();
    for mapping in mappings {
        let Some(winner_id) = &mapping.winner_id else {
            continue;
        };
        pool.retain(|p| &p.registration_id != winner_id);
        if pool.is_empty() {
            pool = eligible.clone();
        }
    }
    pool
}

/// First mapping in list order with no winner. List order alone decides the
/// draw sequence.
pub fn next_undrawn_prize(mappings: &[Mapping]) -> Option<&Mapping> {
    mappings.iter().find(|m| m.winner_id.is_none())
}

/// IDs of prizes interchangeable with `prize_id` (same display name and
/// provider). `None` when the prize itself is unknown.
pub fn prize_group(prizes: &[Prize], prize_id: &str) -> Option<Vec<String>> {
    let lookup = prizes.iter().find(|p| p.id == prize_id)?;
    Some(
        prizes
            .iter()
            .filter(|p| p.display_name == lookup.display_name && p.provider == lookup.provider)
            .map(|p| p.id.clone())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, attending: bool) -> Participant {
        Participant {
            registration_id: id.to_string(),
            username: format!("user_{id}"),
            display_name: format!("Participant {id}"),
            attending,
        }
    }

    fn won(prize_id: &str, winner_id: &str) -> Mapping {
        Mapping {
            prize_id: prize_id.to_string(),
            winner_id: Some(winner_id.to_string()),
        }
    }

    fn undrawn(prize_id: &str) -> Mapping {
        Mapping {
            prize_id: prize_id.to_string(),
            winner_id: None,
        }
    }

    fn ids(pool: &[Participant]) -> Vec<&str> {
        pool.iter().map(|p| p.registration_id.as_str()).collect()
    }

    #[test]
    fn replenishes_after_exhaustion() {
        let participants = vec![participant("A", true), participant("B", true)];
        let mappings = vec![won("p1", "A"), won("p2", "B"), undrawn("p3")];

        let pool = generate_pool(&participants, &[], &mappings);
        assert_eq!(ids(&pool), vec!["A", "B"]);
    }

    #[test]
    fn cancelled_participant_never_eligible() {
        let participants = vec![participant("A", true), participant("B", true)];
        let cancels = vec!["A".to_string()];

        let pool = generate_pool(&participants, &cancels, &[]);
        assert_eq!(ids(&pool), vec!["B"]);

        // Regardless of mapping history, including histories that trigger a
        // replenishment reset.
        let mappings = vec![won("p1", "B"), undrawn("p2")];
        let pool = generate_pool(&participants, &cancels, &mappings);
        assert_eq!(ids(&pool), vec!["B"]);
    }

    #[test]
    fn non_attending_excluded() {
        let participants = vec![
            participant("A", false),
            participant("B", true),
            participant("C", true),
        ];
        let mappings = vec![won("p1", "B"), won("p2", "C"), undrawn("p3")];

        // Even through a replenishment reset, "A" must not reappear.
        let pool = generate_pool(&participants, &[], &mappings);
        assert!(!ids(&pool).contains(&"A"));
        assert_eq!(ids(&pool), vec!["B", "C"]);
    }

    #[test]
    fn pure_and_idempotent() {
        let participants = vec![
            participant("A", true),
            participant("B", true),
            participant("C", true),
        ];
        let cancels = vec!["C".to_string()];
        let mappings = vec![won("p1", "A"), undrawn("p2")];

        let first = generate_pool(&participants, &cancels, &mappings);
        let second = generate_pool(&participants, &cancels, &mappings);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["B"]);
    }

    #[test]
    fn empty_eligible_set_yields_empty_pool() {
        let participants = vec![participant("A", false)];
        let pool = generate_pool(&participants, &[], &[undrawn("p1")]);
        assert!(pool.is_empty());

        // The replenishment rule must not loop or resurrect anyone when the
        // base set itself is empty.
        let all_cancelled = vec![participant("A", true)];
        let pool = generate_pool(&all_cancelled, &["A".to_string()], &[won("p1", "A")]);
        assert!(pool.is_empty());
    }

    #[test]
    fn next_prize_is_first_unset_in_list_order() {
        let mut mappings = vec![undrawn("p1"), won("p2", "X"), undrawn("p3")];
        assert_eq!(next_undrawn_prize(&mappings).unwrap().prize_id, "p1");

        mappings[0].winner_id = Some("Y".to_string());
        assert_eq!(next_undrawn_prize(&mappings).unwrap().prize_id, "p3");

        mappings[2].winner_id = Some("Z".to_string());
        assert!(next_undrawn_prize(&mappings).is_none());
    }

    #[test]
    fn prize_group_matches_name_and_provider() {
        let prizes = vec![
            Prize {
                id: "p1".into(),
                display_name: "Mug".into(),
                provider: "Acme".into(),
            },
            Prize {
                id: "p2".into(),
                display_name: "Mug".into(),
                provider: "Acme".into(),
            },
            Prize {
                id: "p3".into(),
                display_name: "Mug".into(),
                provider: "Other".into(),
            },
        ];

        assert_eq!(prize_group(&prizes, "p1").unwrap(), vec!["p1", "p2"]);
        assert_eq!(prize_group(&prizes, "p3").unwrap(), vec!["p3"]);
        assert!(prize_group(&prizes, "nope").is_none());
    }

    #[test]
    fn fixed_draw_wraps_on_pool_length() {
        let mut rng = FixedDraw::new(vec![5, 1]);
        assert_eq!(rng.pick(3), 2);
        assert_eq!(rng.pick(3), 1);
        // Past the script, the last index repeats.
        assert_eq!(rng.pick(3), 1);
    }
}
