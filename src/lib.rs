// ============================================================================
// CRATE CONFIGURATION & MODULES
// ============================================================================

//! A prize wheel: participants on a spinning wheel, a prize inventory, optional
//! pre-assigned winners and a ledger of confirmed wins.
//!
//! [`Wheel`] owns the whole state and exposes every transition (load, spin, frame
//! step, record, dismiss, reset). Drawing goes through the [`Renderer`] trait, so the
//! same wheel renders into a window framebuffer ([`Canvas`]) or a recording
//! ([`Scene`]) for headless use.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod ledger;
pub mod render;
pub mod roster;
pub mod selection;
pub mod spin;
pub mod wheel;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use app::{App, Control};
pub use canvas::{load_font, Align, Canvas};
pub use config::{Color, SpinSettings, WheelConfig, DEFAULT_PALETTE};
pub use error::WheelError;
pub use ledger::{Ledger, PendingResult, WinnerRecord};
pub use render::{render_wheel, DrawCommand, Renderer, Scene, Slice, WheelGeometry};
pub use roster::{GrantedWinner, Prize, Roster};
pub use selection::{next_prize, select, Selection};
pub use spin::{ease_out_cubic, slice_under_pointer, SpinPlan};
pub use wheel::{Phase, Step, Wheel, WheelState};
