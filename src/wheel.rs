use std::f64::consts::TAU;
use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::WheelConfig;
use crate::error::WheelError;
use crate::ledger::{Ledger, PendingResult, WinnerRecord};
use crate::render::{render_wheel, Renderer};
use crate::roster::{Prize, Roster};
use crate::selection::select;
use crate::spin::{slice_under_pointer, SpinPlan};

/// Where the wheel is in its spin/confirm cycle. A new spin is only accepted from
/// `Idle`: `Spinning` and `Pending` are the two gates that block it.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Spinning { plan: SpinPlan, elapsed: Duration },
    Pending(PendingResult),
}

#[derive(Debug, Clone)]
pub struct WheelState {
    pub roster: Roster,
    pub ledger: Ledger,
    pub current_angle: f64,
    pub phase: Phase,
    pub loaded: bool,
}

impl Default for WheelState {
    fn default() -> Self {
        Self {
            roster: Roster::default(),
            ledger: Ledger::new(),
            current_angle: 0.0,
            phase: Phase::Idle,
            loaded: false,
        }
    }
}

/// What the host should do after a frame step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Nothing is animating.
    Idle,
    /// The wheel moved; redraw it.
    Moved,
    /// The spin just finished with this result, now waiting for confirmation.
    Finished(PendingResult),
}

/// Owns all wheel state and applies every transition to it.
#[derive(Debug)]
pub struct Wheel<R: Rng = StdRng> {
    config: WheelConfig,
    state: WheelState,
    rng: R,
}

impl Wheel<StdRng> {
    pub fn new(config: WheelConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn seeded(config: WheelConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wheel<R> {
    pub fn with_rng(config: WheelConfig, rng: R) -> Self {
        Self {
            config,
            state: WheelState::default(),
            rng,
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    pub fn participants(&self) -> &[String] {
        &self.state.roster.participants
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.state.roster.prizes
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle
    }

    pub fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state.phase, Phase::Spinning { .. })
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.state.phase, Phase::Pending(_))
    }

    pub fn pending(&self) -> Option<&PendingResult> {
        match &self.state.phase {
            Phase::Pending(result) => Some(result),
            _ => None,
        }
    }

    /// Confirmed wins, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &WinnerRecord> {
        self.state.ledger.history()
    }

    /// Participant currently under the pointer.
    pub fn participant_under_pointer(&self) -> Option<&str> {
        let participants = self.participants();
        slice_under_pointer(self.state.current_angle, participants.len())
            .map(|index| participants[index].as_str())
    }

    // ========================================================================
    // LOADING
    // ========================================================================

    /// Replaces all state with a freshly parsed roster. On error nothing changes.
    pub fn load(&mut self, text: &str) -> Result<(), WheelError> {
        let roster = Roster::parse(text)?;
        self.install(roster);
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), WheelError> {
        let roster = Roster::from_file(path)?;
        info!(path = %path.display(), "data file read");
        self.install(roster);
        Ok(())
    }

    pub fn load_roster(&mut self, roster: Roster) -> Result<(), WheelError> {
        roster.validate()?;
        self.install(roster);
        Ok(())
    }

    fn install(&mut self, roster: Roster) {
        info!(
            participants = roster.participants.len(),
            prizes = roster.prizes_remaining(),
            granted = roster.granted_winners.len(),
            "wheel loaded"
        );
        self.state = WheelState {
            roster,
            ledger: Ledger::new(),
            // Random starting rotation so the wheel does not always open the same way.
            current_angle: self.rng.random_range(0.0..TAU),
            phase: Phase::Idle,
            loaded: true,
        };
    }

    /// Clears everything back to the empty wheel.
    pub fn reset(&mut self) {
        info!("wheel reset");
        self.state = WheelState::default();
    }

    /// The load/reset toggle: resets a loaded wheel, otherwise loads `path`.
    pub fn toggle_file(&mut self, path: &Path) -> Result<(), WheelError> {
        if self.state.loaded {
            self.reset();
            Ok(())
        } else {
            self.load_file(path)
        }
    }

    // ========================================================================
    // SPINNING
    // ========================================================================

    /// Starts a spin towards the next winner. Rejected without touching any state
    /// while a spin is running, a result is unconfirmed, or no draw is possible.
    pub fn spin(&mut self) -> Result<SpinPlan, WheelError> {
        match self.state.phase {
            Phase::Spinning { .. } => return Err(WheelError::SpinInProgress),
            Phase::Pending(_) => return Err(WheelError::ResultPending),
            Phase::Idle => {}
        }

        let selection = select(&self.state.roster, &mut self.rng).inspect_err(|err| {
            warn!(%err, "spin rejected");
        })?;
        let plan = SpinPlan::new(
            selection.index,
            selection.prize,
            self.state.current_angle,
            self.state.roster.participants.len(),
            &self.config.spin,
            &mut self.rng,
        );
        debug!(
            index = plan.index(),
            prize = plan.prize(),
            granted = selection.granted,
            target = plan.target_angle(),
            duration_ms = plan.duration().as_millis() as u64,
            "spin started"
        );

        self.state.phase = Phase::Spinning {
            plan: plan.clone(),
            elapsed: Duration::ZERO,
        };
        Ok(plan)
    }

    /// Advances a running spin by one frame's worth of time.
    pub fn advance(&mut self, dt: Duration) -> Step {
        let Phase::Spinning { plan, elapsed } = &mut self.state.phase else {
            return Step::Idle;
        };

        *elapsed += dt;
        self.state.current_angle = plan.angle_at(*elapsed);
        if !plan.is_complete(*elapsed) {
            return Step::Moved;
        }

        let index = plan.index();
        let name = self.state.roster.participants[index].clone();
        let prize = plan.prize().to_string();
        let granted = self
            .state
            .roster
            .granted_winners
            .iter()
            .any(|g| g.name == name && g.prize == prize);
        let result = PendingResult {
            index,
            name,
            prize,
            granted,
        };
        info!(winner = %result.name, prize = %result.prize, "spin finished");
        self.state.phase = Phase::Pending(result.clone());
        Step::Finished(result)
    }

    // ========================================================================
    // CONFIRMATION
    // ========================================================================

    pub fn record(&mut self) -> Result<WinnerRecord, WheelError> {
        let pending = self.take_pending()?;
        Ok(self.state.ledger.record(&mut self.state.roster, &pending))
    }

    /// Removes the pending participant from the wheel without awarding the prize.
    pub fn dismiss(&mut self) -> Result<PendingResult, WheelError> {
        let pending = self.take_pending()?;
        self.state.ledger.dismiss(&mut self.state.roster, &pending);
        Ok(pending)
    }

    fn take_pending(&mut self) -> Result<PendingResult, WheelError> {
        match std::mem::replace(&mut self.state.phase, Phase::Idle) {
            Phase::Pending(result) => Ok(result),
            other => {
                self.state.phase = other;
                Err(WheelError::NoPendingResult)
            }
        }
    }

    // ========================================================================
    // DRAWING
    // ========================================================================

    pub fn draw<T: Renderer + ?Sized>(&self, renderer: &mut T) {
        render_wheel(
            renderer,
            &self.state.roster.participants,
            self.state.current_angle,
            &self.config,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::GrantedWinner;

    const DATA: &str = "[Participants]\nA\nB\nC\n[Prizes]\nGold,1\nSilver,1\n";

    fn spin_to_end<R: Rng>(wheel: &mut Wheel<R>) -> PendingResult {
        wheel.spin().unwrap();
        loop {
            match wheel.advance(Duration::from_millis(16)) {
                Step::Finished(result) => return result,
                Step::Moved => {}
                Step::Idle => panic!("spin stopped without a result"),
            }
        }
    }

    #[test]
    fn load_sets_random_start_angle() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 1);
        wheel.load(DATA).unwrap();
        assert!(wheel.is_loaded());
        assert!((0.0..TAU).contains(&wheel.current_angle()));
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 1);
        wheel.load(DATA).unwrap();
        let angle = wheel.current_angle();
        assert!(matches!(
            wheel.load("[Participants]\nZ\n"),
            Err(WheelError::MissingPrizes)
        ));
        assert_eq!(wheel.participants(), ["A", "B", "C"]);
        assert_eq!(wheel.current_angle(), angle);
    }

    #[test]
    fn spin_is_exclusive() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 2);
        wheel.load(DATA).unwrap();
        wheel.spin().unwrap();
        assert!(matches!(wheel.spin(), Err(WheelError::SpinInProgress)));

        wheel.advance(Duration::from_secs(10));
        assert!(wheel.has_pending());
        assert!(matches!(wheel.spin(), Err(WheelError::ResultPending)));
    }

    #[test]
    fn finished_spin_points_at_the_winner() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 3);
        wheel.load(DATA).unwrap();
        let result = spin_to_end(&mut wheel);
        assert!(!wheel.is_spinning());
        assert_eq!(wheel.participant_under_pointer(), Some(result.name.as_str()));
        assert!((0.0..TAU).contains(&wheel.current_angle()));
    }

    #[test]
    fn record_and_dismiss_require_a_pending_result() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 4);
        wheel.load(DATA).unwrap();
        assert!(matches!(wheel.record(), Err(WheelError::NoPendingResult)));
        wheel.spin().unwrap();
        assert!(matches!(wheel.dismiss(), Err(WheelError::NoPendingResult)));
        assert!(wheel.is_spinning());
    }

    #[test]
    fn advance_without_spin_is_idle() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 5);
        assert_eq!(wheel.advance(Duration::from_millis(16)), Step::Idle);
    }

    #[test]
    fn reset_clears_everything() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 6);
        wheel.load(DATA).unwrap();
        spin_to_end(&mut wheel);
        wheel.record().unwrap();
        wheel.reset();
        assert!(!wheel.is_loaded());
        assert!(wheel.participants().is_empty());
        assert_eq!(wheel.history().count(), 0);
        assert_eq!(wheel.current_angle(), 0.0);
    }

    #[test]
    fn load_roster_validates_before_replacing() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 8);
        wheel.load(DATA).unwrap();

        let no_prizes = Roster {
            participants: vec!["Zed".to_string()],
            ..Roster::default()
        };
        assert!(matches!(wheel.load_roster(no_prizes), Err(WheelError::MissingPrizes)));
        assert_eq!(wheel.participants(), ["A", "B", "C"]);

        let roster = Roster {
            participants: vec!["Zed".to_string(), "Yan".to_string()],
            prizes: vec![Prize::new("Gold", 1)],
            granted_winners: vec![GrantedWinner {
                name: "Yan".to_string(),
                prize: "Gold".to_string(),
            }],
        };
        wheel.load_roster(roster).unwrap();
        let result = spin_to_end(&mut wheel);
        assert_eq!(result.name, "Yan");
        assert!(result.granted);
    }

    #[test]
    fn toggle_resets_a_loaded_wheel() {
        let mut wheel = Wheel::seeded(WheelConfig::default(), 7);
        wheel.load(DATA).unwrap();
        wheel.toggle_file(Path::new("/unused.txt")).unwrap();
        assert!(!wheel.is_loaded());
        assert!(matches!(
            wheel.toggle_file(Path::new("/definitely/not/here.txt")),
            Err(WheelError::Read { .. })
        ));
    }
}
