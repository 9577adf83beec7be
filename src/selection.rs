use rand::Rng;
use tracing::debug;

use crate::error::WheelError;
use crate::roster::{Prize, Roster};

/// Outcome of a draw: which slice the wheel has to stop on and what it awards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Position of the winner in the active participant list.
    pub index: usize,
    pub prize: String,
    /// Whether the winner was forced by a granted pairing.
    pub granted: bool,
}

/// First prize in list order that still has stock.
pub fn next_prize(prizes: &[Prize]) -> Option<&Prize> {
    prizes.iter().find(|p| !p.is_exhausted())
}

/// Decides who wins the next prize. Nothing in the roster is modified; stock and the
/// participant pool only change once the result is recorded or dismissed.
///
/// A granted winner for the prize is always chosen while still on the wheel. Otherwise
/// the draw is uniform over participants that hold no granted pairing at all, so a
/// participant reserved for some other prize is never consumed by a random draw.
pub fn select<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Result<Selection, WheelError> {
    if roster.participants.is_empty() {
        return Err(WheelError::NoParticipants);
    }
    let prize = next_prize(&roster.prizes).ok_or(WheelError::NoPrizesLeft)?;

    let forced = roster
        .granted_winners
        .iter()
        .filter(|g| g.prize == prize.name)
        .find_map(|g| roster.position_of(&g.name));
    if let Some(index) = forced {
        debug!(prize = %prize.name, winner = %roster.participants[index], "granted winner selected");
        return Ok(Selection {
            index,
            prize: prize.name.clone(),
            granted: true,
        });
    }

    let eligible: Vec<usize> = roster
        .participants
        .iter()
        .enumerate()
        .filter(|(_, name)| !roster.is_granted(name))
        .map(|(index, _)| index)
        .collect();
    if eligible.is_empty() {
        return Err(WheelError::NoEligibleParticipants {
            prize: prize.name.clone(),
        });
    }

    let index = eligible[rng.random_range(0..eligible.len())];
    Ok(Selection {
        index,
        prize: prize.name.clone(),
        granted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::GrantedWinner;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster(participants: &[&str], prizes: &[(&str, u32)], granted: &[(&str, &str)]) -> Roster {
        Roster {
            participants: participants.iter().map(|p| p.to_string()).collect(),
            prizes: prizes.iter().map(|(n, q)| Prize::new(*n, *q)).collect(),
            granted_winners: granted
                .iter()
                .map(|(n, p)| GrantedWinner::new(*n, *p))
                .collect(),
        }
    }

    #[test]
    fn skips_exhausted_prizes() {
        let roster = roster(&["A", "B"], &[("Gold", 0), ("Silver", 2)], &[]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(select(&roster, &mut rng).unwrap().prize, "Silver");
        }
    }

    #[test]
    fn granted_winner_is_forced_for_any_seed() {
        let roster = roster(&["A", "B", "C"], &[("Gold", 1)], &[("B", "Gold")]);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = select(&roster, &mut rng).unwrap();
            assert_eq!(selection.index, 1);
            assert_eq!(selection.prize, "Gold");
            assert!(selection.granted);
        }
    }

    #[test]
    fn granted_winner_no_longer_on_wheel_falls_back_to_random() {
        let roster = roster(&["A", "C"], &[("Gold", 1)], &[("B", "Gold")]);
        let mut rng = StdRng::seed_from_u64(3);
        let selection = select(&roster, &mut rng).unwrap();
        assert!(!selection.granted);
        assert!(selection.index < 2);
    }

    #[test]
    fn participants_reserved_for_other_prizes_are_not_drawn() {
        let roster = roster(
            &["A", "B", "C"],
            &[("Gold", 5), ("Silver", 1)],
            &[("A", "Silver"), ("C", "Silver")],
        );
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(select(&roster, &mut rng).unwrap().index, 1);
        }
    }

    #[test]
    fn rejects_when_nothing_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            select(&roster(&[], &[("Gold", 1)], &[]), &mut rng),
            Err(WheelError::NoParticipants)
        ));
        assert!(matches!(
            select(&roster(&["A"], &[("Gold", 0)], &[]), &mut rng),
            Err(WheelError::NoPrizesLeft)
        ));
        assert!(matches!(
            select(&roster(&["A"], &[("Gold", 1)], &[("A", "Silver")]), &mut rng),
            Err(WheelError::NoEligibleParticipants { .. })
        ));
    }

    #[test]
    fn random_draw_reaches_every_eligible_participant() {
        let roster = roster(&["A", "B", "C", "D"], &[("Gold", 1)], &[]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[select(&roster, &mut rng).unwrap().index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
