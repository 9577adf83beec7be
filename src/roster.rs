use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::WheelError;

/// A prize and how many of it are still left to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prize {
    pub name: String,
    pub quantity: u32,
}

impl Prize {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.quantity == 0
    }
}

/// A participant that must win a specific prize when that prize comes up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedWinner {
    pub name: String,
    pub prize: String,
}

impl GrantedWinner {
    pub fn new(name: impl Into<String>, prize: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prize: prize.into(),
        }
    }
}

/// Everything a data file describes: who is on the wheel, what can be won and
/// which pairings are decided up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub participants: Vec<String>,
    pub prizes: Vec<Prize>,
    pub granted_winners: Vec<GrantedWinner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Participants,
    Prizes,
    GrantedWinners,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            "[Participants]" => Some(Section::Participants),
            "[Prizes]" => Some(Section::Prizes),
            "[GrantedWinners]" => Some(Section::GrantedWinners),
            _ => None,
        }
    }
}

impl Roster {
    /// Parses the sectioned text format without validating it.
    ///
    /// Lines are trimmed, blank lines and `#` comments are skipped, and anything that
    /// appears before the first section header is ignored.
    pub fn parse_unchecked(text: &str) -> Self {
        let mut roster = Roster::default();
        let mut section = None;

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(header) = Section::from_header(line) {
                section = Some(header);
                continue;
            }

            match section {
                Some(Section::Participants) => roster.participants.push(line.to_string()),
                Some(Section::Prizes) => roster.prizes.push(parse_prize(line)),
                Some(Section::GrantedWinners) => match parse_granted_winner(line) {
                    Some(granted) => roster.granted_winners.push(granted),
                    None => warn!(line_no = line_no + 1, "skipping granted winner without a prize: {line}"),
                },
                None => debug!(line_no = line_no + 1, "ignoring line outside of any section"),
            }
        }

        roster
    }

    /// Parses and validates a roster. Fails when the participants or prizes section
    /// ends up empty.
    pub fn parse(text: &str) -> Result<Self, WheelError> {
        let roster = Self::parse_unchecked(text);
        roster.validate()?;
        Ok(roster)
    }

    pub fn from_file(path: &Path) -> Result<Self, WheelError> {
        let text = fs::read_to_string(path).map_err(|source| WheelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn validate(&self) -> Result<(), WheelError> {
        if self.participants.is_empty() {
            return Err(WheelError::MissingParticipants);
        }
        if self.prizes.is_empty() {
            return Err(WheelError::MissingPrizes);
        }
        Ok(())
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p == name)
    }

    pub fn is_granted(&self, name: &str) -> bool {
        self.granted_winners.iter().any(|g| g.name == name)
    }

    pub fn prizes_remaining(&self) -> u32 {
        self.prizes.iter().map(|p| p.quantity).sum()
    }
}

fn parse_prize(line: &str) -> Prize {
    let mut fields = line.split(',');
    let name = fields.next().unwrap_or_default().trim();
    let quantity = fields.next().and_then(parse_quantity).unwrap_or(1);
    Prize::new(name, quantity)
}

/// Reads the leading decimal digits of a field, so `"3 boxes"` is 3 and `"-2"` is nothing.
// An explicit `0` stays 0 (prize skipped); the browser version bumped it to 1.
fn parse_quantity(field: &str) -> Option<u32> {
    let field = field.trim();
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    field[..end].parse().ok()
}

fn parse_granted_winner(line: &str) -> Option<GrantedWinner> {
    let mut fields = line.split(',');
    let name = fields.next()?.trim();
    let prize = fields.next()?.trim();
    if name.is_empty() || prize.is_empty() {
        return None;
    }
    Some(GrantedWinner::new(name, prize))
}
