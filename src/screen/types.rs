use serde::{Deserialize, Serialize};

use crate::server::{Reachability, ENTRY_GRANTED};

/// Coarse screen mode. Exactly one of the two holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenState {
    /// Camera live, scan intake open
    Scanning,
    /// Result view shown, scan intake closed until restart
    ResultDisplayed,
}

/// Stimuli the screen reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// A decoded QR payload arrived from the camera
    Scan { text: String },
    /// The outstanding check-in call resolved with a server response
    CheckinResolved {
        message: String,
        count: Option<u64>,
    },
    /// The outstanding check-in call failed before a response was decoded
    CheckinFailed { reason: String },
    /// Operator pressed restart on the result view
    Restart,
}

/// Outcome of feeding one event to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Event accepted; state or displayed fields changed
    Applied,
    /// Event not valid in the current state; nothing changed
    Ignored,
}

/// What the result view shows while in `ResultDisplayed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDisplay {
    /// Check-in dispatched, response not yet in
    Pending,
    Granted,
    Denied { reason: String },
}

impl EntryDisplay {
    /// Map a server message to a display state. `"Entry Granted"` is the
    /// sole grant signal; every other message is a denial with that message
    /// as the reason.
    pub fn from_message(message: &str) -> Self {
        if message == ENTRY_GRANTED {
            EntryDisplay::Granted
        } else {
            EntryDisplay::Denied {
                reason: message.to_string(),
            }
        }
    }
}

/// Immutable view of everything the presentation layer needs.
///
/// Rendering is a pure function of this snapshot; the controller exposes no
/// other surface to the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    pub state: ScreenState,
    /// Raw payload of the scan currently on the result view
    pub scanned_text: Option<String>,
    /// Result view contents; `None` while scanning
    pub entry: Option<EntryDisplay>,
    /// Running total of successful entries
    pub count: u64,
    pub reachability: Reachability,
    pub probed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub torch_on: bool,
    pub settings_visible: bool,
    pub server_url: String,
}
