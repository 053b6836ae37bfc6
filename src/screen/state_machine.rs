use tracing::{debug, info};

use super::types::{EntryDisplay, EventOutcome, ScreenEvent, ScreenState};

/// Finite-state machine for the scan-to-check-in cycle.
///
/// Two coarse states, no terminal state: the machine cycles between
/// `Scanning` and `ResultDisplayed` for the life of the screen. The scan
/// gate is the state itself; a `Scan` event is accepted only while
/// `Scanning`, and accepting it transitions away synchronously, before any
/// asynchronous work begins. Check-in resolutions update the displayed
/// fields in place without changing the coarse state.
#[derive(Debug)]
pub struct ScreenStateMachine {
    state: ScreenState,
    scanned_text: Option<String>,
    entry: Option<EntryDisplay>,
    count: u64,
}

impl Default for ScreenStateMachine {
    fn default() -> Self {
        Self {
            state: ScreenState::Scanning,
            scanned_text: None,
            entry: None,
            count: 0,
        }
    }
}

impl ScreenStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn scanned_text(&self) -> Option<&str> {
        self.scanned_text.as_deref()
    }

    pub fn entry(&self) -> Option<&EntryDisplay> {
        self.entry.as_ref()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScreenState::Scanning
    }

    pub fn handle(&mut self, event: ScreenEvent) -> EventOutcome {
        match (self.state, event) {
            (ScreenState::Scanning, ScreenEvent::Scan { text }) => {
                self.scanned_text = Some(text);
                self.entry = Some(EntryDisplay::Pending);
                self.state = ScreenState::ResultDisplayed;
                info!("Scan accepted, awaiting check-in response");
                EventOutcome::Applied
            }
            (ScreenState::ResultDisplayed, ScreenEvent::Scan { .. }) => {
                debug!("Scan ignored while a result is displayed");
                EventOutcome::Ignored
            }
            (ScreenState::ResultDisplayed, ScreenEvent::CheckinResolved { message, count }) => {
                self.entry = Some(EntryDisplay::from_message(&message));
                if let Some(count) = count {
                    self.count = count;
                }
                info!(server_message = %message, count = %self.count, "Check-in response applied");
                EventOutcome::Applied
            }
            // A stale resolution after restart still carries the running
            // total; apply the count but let the restart keep the screen.
            (ScreenState::Scanning, ScreenEvent::CheckinResolved { message, count }) => {
                if let Some(count) = count {
                    self.count = count;
                }
                debug!(server_message = %message, "Stale check-in response; count applied only");
                EventOutcome::Applied
            }
            (ScreenState::ResultDisplayed, ScreenEvent::CheckinFailed { reason }) => {
                self.entry = Some(EntryDisplay::Denied { reason });
                EventOutcome::Applied
            }
            (ScreenState::Scanning, ScreenEvent::CheckinFailed { reason }) => {
                debug!(reason = %reason, "Stale check-in failure ignored");
                EventOutcome::Ignored
            }
            (ScreenState::ResultDisplayed, ScreenEvent::Restart) => {
                self.scanned_text = None;
                self.entry = None;
                self.state = ScreenState::Scanning;
                info!("Scanning restarted");
                EventOutcome::Applied
            }
            (ScreenState::Scanning, ScreenEvent::Restart) => EventOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_transitions_to_pending_result() {
        let mut sm = ScreenStateMachine::new();
        assert!(sm.is_scanning());

        let outcome = sm.handle(ScreenEvent::Scan {
            text: "Enrollment: 12AB34".to_string(),
        });

        assert_eq!(outcome, EventOutcome::Applied);
        assert_eq!(sm.state(), ScreenState::ResultDisplayed);
        assert_eq!(sm.scanned_text(), Some("Enrollment: 12AB34"));
        assert_eq!(sm.entry(), Some(&EntryDisplay::Pending));
    }

    #[test]
    fn gate_closes_synchronously_on_first_scan() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "first".to_string(),
        });

        // A rapid second scan arrives before any response; it must be
        // ignored without touching the stored payload.
        let outcome = sm.handle(ScreenEvent::Scan {
            text: "second".to_string(),
        });
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(sm.scanned_text(), Some("first"));
    }

    #[test]
    fn grant_resolution_updates_fields_in_place() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "Enrollment: 1".to_string(),
        });
        sm.handle(ScreenEvent::CheckinResolved {
            message: "Entry Granted".to_string(),
            count: Some(5),
        });

        assert_eq!(sm.state(), ScreenState::ResultDisplayed);
        assert_eq!(sm.entry(), Some(&EntryDisplay::Granted));
        assert_eq!(sm.count(), 5);
    }

    #[test]
    fn denial_shows_the_server_message_as_reason() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "Enrollment: 1".to_string(),
        });
        sm.handle(ScreenEvent::CheckinResolved {
            message: "Already Checked In".to_string(),
            count: Some(5),
        });

        assert_eq!(
            sm.entry(),
            Some(&EntryDisplay::Denied {
                reason: "Already Checked In".to_string()
            })
        );
        assert_eq!(sm.count(), 5);
    }

    #[test]
    fn denial_without_count_leaves_prior_total() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "a".to_string(),
        });
        sm.handle(ScreenEvent::CheckinResolved {
            message: "Entry Granted".to_string(),
            count: Some(3),
        });
        sm.handle(ScreenEvent::Restart);
        sm.handle(ScreenEvent::Scan {
            text: "b".to_string(),
        });
        sm.handle(ScreenEvent::CheckinResolved {
            message: "Invalid Enrollment".to_string(),
            count: None,
        });

        assert_eq!(sm.count(), 3);
    }

    #[test]
    fn failure_sets_reason_and_keeps_count() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "a".to_string(),
        });
        sm.handle(ScreenEvent::CheckinResolved {
            message: "Entry Granted".to_string(),
            count: Some(7),
        });
        sm.handle(ScreenEvent::Restart);
        sm.handle(ScreenEvent::Scan {
            text: "b".to_string(),
        });
        sm.handle(ScreenEvent::CheckinFailed {
            reason: "unknown".to_string(),
        });

        assert_eq!(
            sm.entry(),
            Some(&EntryDisplay::Denied {
                reason: "unknown".to_string()
            })
        );
        assert_eq!(sm.count(), 7);
    }

    #[test]
    fn restart_clears_payload_and_reopens_gate() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "payload".to_string(),
        });
        sm.handle(ScreenEvent::Restart);

        assert!(sm.is_scanning());
        assert_eq!(sm.scanned_text(), None);
        assert_eq!(sm.entry(), None);

        let outcome = sm.handle(ScreenEvent::Scan {
            text: "next".to_string(),
        });
        assert_eq!(outcome, EventOutcome::Applied);
    }

    #[test]
    fn stale_resolution_after_restart_updates_count_only() {
        let mut sm = ScreenStateMachine::new();
        sm.handle(ScreenEvent::Scan {
            text: "a".to_string(),
        });
        sm.handle(ScreenEvent::Restart);

        // The check-in from before the restart resolves late.
        sm.handle(ScreenEvent::CheckinResolved {
            message: "Entry Granted".to_string(),
            count: Some(9),
        });

        assert!(sm.is_scanning());
        assert_eq!(sm.entry(), None);
        assert_eq!(sm.count(), 9);
    }
}
