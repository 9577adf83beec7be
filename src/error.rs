use std::path::PathBuf;

use thiserror::Error;

/// Every failure the wheel can report. None of them are fatal: the host shows the
/// message and waits for the user to correct the input or confirm the pending result.
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("Please enter at least one participant")]
    MissingParticipants,
    #[error("Please enter at least one prize")]
    MissingPrizes,
    #[error("Error reading file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The wheel is already spinning")]
    SpinInProgress,
    #[error("There are no participants left on the wheel")]
    NoParticipants,
    #[error("No more prizes available!")]
    NoPrizesLeft,
    #[error("Please record or dismiss the current winner before spinning again.")]
    ResultPending,
    #[error("No eligible participants for {prize}!")]
    NoEligibleParticipants { prize: String },
    #[error("There is no winner waiting for confirmation")]
    NoPendingResult,
    #[error("Font data could not be parsed")]
    InvalidFont,
    #[error("Windowing system error: {0}")]
    Window(String),
    #[error("Pixel surface error: {0}")]
    Surface(String),
}

impl WheelError {
    /// Spin attempts rejected because of the wheel's own gates rather than its data.
    pub fn is_spin_gate(&self) -> bool {
        matches!(self, WheelError::SpinInProgress | WheelError::ResultPending)
    }
}
