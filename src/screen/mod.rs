// Screen Module - Scan-to-Check-In Workflow
//
// This module implements the screen's finite-state controller: scan intake
// gated by the scanning state, check-in dispatch, and the result view that
// updates in place as responses arrive.

pub mod controller;
pub mod state_machine;
pub mod types;

pub use controller::ScreenController;
pub use state_machine::ScreenStateMachine;
pub use types::{EntryDisplay, EventOutcome, ScreenEvent, ScreenSnapshot, ScreenState};
