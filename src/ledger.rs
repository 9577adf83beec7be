use tracing::info;

use crate::roster::Roster;

/// A selection that has finished spinning and waits for the host to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResult {
    pub index: usize,
    pub name: String,
    pub prize: String,
    pub granted: bool,
}

/// A confirmed win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerRecord {
    pub name: String,
    pub prize: String,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    winners: Vec<WinnerRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards the pending prize: one unit of stock is consumed, the winner's granted
    /// pairing (if any) is used up and the winner leaves the wheel.
    pub fn record(&mut self, roster: &mut Roster, pending: &PendingResult) -> WinnerRecord {
        if let Some(prize) = roster.prizes.iter_mut().find(|p| p.name == pending.prize) {
            prize.quantity = prize.quantity.saturating_sub(1);
        }
        if let Some(pos) = roster
            .granted_winners
            .iter()
            .position(|g| g.name == pending.name)
        {
            roster.granted_winners.remove(pos);
        }

        let record = WinnerRecord {
            name: pending.name.clone(),
            prize: pending.prize.clone(),
        };
        self.winners.push(record.clone());
        remove_participant(roster, &pending.name);

        info!(winner = %record.name, prize = %record.prize, total = self.winners.len(), "win recorded");
        record
    }

    /// Takes the pending participant off the wheel without awarding anything.
    pub fn dismiss(&mut self, roster: &mut Roster, pending: &PendingResult) {
        remove_participant(roster, &pending.name);
        info!(participant = %pending.name, prize = %pending.prize, "win dismissed");
    }

    /// Confirmed wins, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &WinnerRecord> {
        self.winners.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}

fn remove_participant(roster: &mut Roster, name: &str) {
    if let Some(pos) = roster.position_of(name) {
        roster.participants.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{GrantedWinner, Prize};

    fn roster() -> Roster {
        Roster {
            participants: vec!["A".into(), "B".into(), "C".into()],
            prizes: vec![Prize::new("Gold", 2), Prize::new("Silver", 1)],
            granted_winners: vec![GrantedWinner::new("B", "Silver")],
        }
    }

    fn pending(index: usize, name: &str, prize: &str) -> PendingResult {
        PendingResult {
            index,
            name: name.into(),
            prize: prize.into(),
            granted: false,
        }
    }

    #[test]
    fn record_consumes_stock_and_removes_winner() {
        let mut roster = roster();
        let mut ledger = Ledger::new();
        let record = ledger.record(&mut roster, &pending(0, "A", "Gold"));

        assert_eq!(record, WinnerRecord { name: "A".into(), prize: "Gold".into() });
        assert_eq!(roster.prizes[0].quantity, 1);
        assert_eq!(roster.participants, vec!["B", "C"]);
        assert_eq!(roster.granted_winners.len(), 1);
    }

    #[test]
    fn record_uses_up_the_granted_pairing() {
        let mut roster = roster();
        let mut ledger = Ledger::new();
        ledger.record(&mut roster, &pending(1, "B", "Gold"));
        assert!(roster.granted_winners.is_empty());
        assert_eq!(roster.prizes[0].quantity, 1);
    }

    #[test]
    fn stock_never_goes_negative() {
        let mut roster = roster();
        roster.prizes[1].quantity = 0;
        Ledger::new().record(&mut roster, &pending(2, "C", "Silver"));
        assert_eq!(roster.prizes[1].quantity, 0);
    }

    #[test]
    fn dismiss_leaves_prizes_alone() {
        let mut roster = roster();
        let mut ledger = Ledger::new();
        ledger.dismiss(&mut roster, &pending(2, "C", "Gold"));
        assert_eq!(roster.prizes[0].quantity, 2);
        assert_eq!(roster.participants, vec!["A", "B"]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn history_is_newest_first() {
        let mut roster = roster();
        let mut ledger = Ledger::new();
        ledger.record(&mut roster, &pending(0, "A", "Gold"));
        ledger.record(&mut roster, &pending(1, "C", "Gold"));
        let names: Vec<&str> = ledger.history().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(ledger.len(), 2);
    }
}
