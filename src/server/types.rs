use serde::{Deserialize, Serialize};

/// The one message value the display layer treats as a grant. Every other
/// message is a denial shown with that message as the reason.
pub const ENTRY_GRANTED: &str = "Entry Granted";

/// Body of the check-in POST. The field name is fixed by the server contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckinRequest {
    #[serde(rename = "enrollmentNumber")]
    pub enrollment_number: String,
}

/// Server response to a check-in. Denials arrive in the same JSON shape as
/// grants; `count` is the running total of successful entries and may be
/// absent from denial responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckinResponse {
    pub message: String,
    #[serde(default)]
    pub count: Option<u64>,
}

impl CheckinResponse {
    pub fn is_granted(&self) -> bool {
        self.message == ENTRY_GRANTED
    }
}

/// Outcome of a liveness probe against the server base address.
///
/// Independent of check-in results; only an explicit re-probe moves it off
/// its current value (last-write-wins).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable)
    }
}
