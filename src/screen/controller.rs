use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::state_machine::ScreenStateMachine;
use super::types::{EventOutcome, ScreenEvent, ScreenSnapshot};
use crate::enrollment::extract_enrollment;
use crate::observability::checkin_metrics;
use crate::scanner::{ScanSource, ScannedCode, Symbology};
use crate::server::{CheckinResponse, Reachability, ServerClient, ServerError};

/// Owns the workflow state machine plus the independent side toggles:
/// torch, settings panel, server-address override, and the reachability
/// indicator.
///
/// All mutation happens through the methods below, on the single task that
/// owns the controller; there is no shared state and no locking. Stale
/// responses are applied last-write-wins.
#[derive(Debug)]
pub struct ScreenController {
    machine: ScreenStateMachine,
    reachability: Reachability,
    probed_at: Option<DateTime<Utc>>,
    torch_on: bool,
    settings_visible: bool,
    server_url: String,
    default_server_url: String,
}

impl ScreenController {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            machine: ScreenStateMachine::new(),
            reachability: Reachability::Unknown,
            probed_at: None,
            torch_on: false,
            settings_visible: false,
            default_server_url: server_url.clone(),
            server_url,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.machine.is_scanning()
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Gate and intake for one scan event.
    ///
    /// Consults the scanning gate and closes it synchronously before any
    /// asynchronous work, so rapid repeated scans cannot double-submit.
    /// Returns the extracted enrollment identifier when the scan was
    /// accepted; `None` when a result is already displayed.
    pub fn accept_scan(&mut self, text: &str) -> Option<String> {
        let outcome = self.machine.handle(ScreenEvent::Scan {
            text: text.to_string(),
        });
        if outcome == EventOutcome::Ignored {
            checkin_metrics().record_scan_ignored();
            return None;
        }
        checkin_metrics().record_scan_accepted();
        Some(extract_enrollment(text))
    }

    /// Intake for a decoded barcode. Only QR codes reach the workflow;
    /// other symbologies are dropped before the gate is consulted.
    pub fn accept_code(&mut self, code: &ScannedCode) -> Option<String> {
        if code.symbology != Symbology::Qr {
            debug!(symbology = ?code.symbology, "Non-QR code dropped");
            return None;
        }
        self.accept_scan(&code.text)
    }

    /// Apply a resolved check-in call to the displayed fields.
    pub fn apply_checkin(&mut self, outcome: Result<CheckinResponse, ServerError>) {
        match outcome {
            Ok(response) => {
                if response.is_granted() {
                    checkin_metrics().record_grant();
                } else {
                    checkin_metrics().record_denial();
                }
                self.machine.handle(ScreenEvent::CheckinResolved {
                    message: response.message,
                    count: response.count,
                });
            }
            Err(err) => {
                checkin_metrics().record_transport_failure();
                self.machine.handle(ScreenEvent::CheckinFailed {
                    reason: err.reason(),
                });
            }
        }
    }

    /// Full scan-to-check-in cycle. The screen flips to the result view the
    /// moment the scan is accepted; the displayed fields update in place
    /// once the call resolves. Returns whether the scan was accepted.
    pub async fn submit_scan(&mut self, client: &ServerClient, text: &str) -> bool {
        let Some(enrollment) = self.accept_scan(text) else {
            return false;
        };
        let outcome = client.check_in(&self.server_url, &enrollment).await;
        self.apply_checkin(outcome);
        true
    }

    /// Re-probe the server at the address currently in effect. Independent
    /// of the check-in workflow; never touches the gate or result state.
    pub async fn probe_server(&mut self, client: &ServerClient) -> Reachability {
        let reachability = client.probe(&self.server_url).await;
        self.reachability = reachability;
        self.probed_at = Some(Utc::now());
        reachability
    }

    pub fn restart_scanning(&mut self) {
        self.machine.handle(ScreenEvent::Restart);
    }

    pub fn toggle_torch(&mut self) -> bool {
        self.torch_on = !self.torch_on;
        self.torch_on
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.settings_visible = !self.settings_visible;
        self.settings_visible
    }

    pub fn set_server_url(&mut self, url: impl Into<String>) {
        self.server_url = url.into();
        info!(server_url = %self.server_url, "Server address overridden");
    }

    /// Reset the address to the built-in default and close the settings
    /// panel, matching the operator's reset action.
    pub fn reset_server_url(&mut self) {
        self.server_url = self.default_server_url.clone();
        self.settings_visible = false;
        info!(server_url = %self.server_url, "Server address reset to default");
    }

    /// Pump a scan source through the workflow: submit each QR code, render
    /// the pending and resolved views, then restart scanning for the next.
    pub async fn drain_source<S, F>(&mut self, client: &ServerClient, source: &mut S, mut render: F)
    where
        S: ScanSource,
        F: FnMut(&ScreenSnapshot),
    {
        source.set_torch(self.torch_on);
        while let Some(code) = source.next_code().await {
            let Some(enrollment) = self.accept_code(&code) else {
                continue;
            };
            render(&self.snapshot());
            let outcome = client.check_in(&self.server_url, &enrollment).await;
            self.apply_checkin(outcome);
            render(&self.snapshot());
            self.restart_scanning();
        }
    }

    /// The state snapshot the presentation layer renders from.
    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            state: self.machine.state(),
            scanned_text: self.machine.scanned_text().map(str::to_string),
            entry: self.machine.entry().cloned(),
            count: self.machine.count(),
            reachability: self.reachability,
            probed_at: self.probed_at,
            torch_on: self.torch_on,
            settings_visible: self.settings_visible,
            server_url: self.server_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::types::{EntryDisplay, ScreenState};

    #[test]
    fn accept_scan_extracts_and_closes_the_gate() {
        let mut controller = ScreenController::new("http://localhost");

        let enrollment = controller.accept_scan("Name: A\nEnrollment: 12AB34\n");
        assert_eq!(enrollment, Some("12AB34".to_string()));
        // Gate is already closed, before any response has arrived.
        assert!(!controller.is_scanning());
        assert_eq!(controller.accept_scan("Enrollment: 99"), None);
    }

    #[test]
    fn parse_miss_is_accepted_with_empty_identifier() {
        let mut controller = ScreenController::new("http://localhost");
        assert_eq!(controller.accept_scan("hello\nworld"), Some(String::new()));
    }

    #[test]
    fn non_qr_codes_do_not_consult_the_gate() {
        let mut controller = ScreenController::new("http://localhost");
        let code = ScannedCode {
            symbology: Symbology::Code128,
            text: "Enrollment: 1".to_string(),
        };
        assert_eq!(controller.accept_code(&code), None);
        assert!(controller.is_scanning());
    }

    #[test]
    fn transport_failure_becomes_denial_reason() {
        let mut controller = ScreenController::new("http://localhost");
        controller.accept_scan("Enrollment: 1");
        controller.apply_checkin(Err(ServerError::Decode(String::new())));

        let snapshot = controller.snapshot();
        assert_eq!(
            snapshot.entry,
            Some(EntryDisplay::Denied {
                reason: "unknown".to_string()
            })
        );
        assert_eq!(snapshot.count, 0);
    }

    #[test]
    fn restart_reopens_the_gate_and_clears_payload() {
        let mut controller = ScreenController::new("http://localhost");
        controller.accept_scan("Enrollment: 1");
        controller.restart_scanning();

        assert!(controller.is_scanning());
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, ScreenState::Scanning);
        assert_eq!(snapshot.scanned_text, None);
        assert!(controller.accept_scan("Enrollment: 2").is_some());
    }

    #[test]
    fn side_toggles_do_not_touch_the_workflow() {
        let mut controller = ScreenController::new("http://localhost");
        assert!(controller.toggle_torch());
        assert!(controller.toggle_settings());
        controller.set_server_url("http://elsewhere");
        assert_eq!(controller.server_url(), "http://elsewhere");
        assert!(controller.is_scanning());

        controller.reset_server_url();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.server_url, "http://localhost");
        // Reset also hides the settings panel.
        assert!(!snapshot.settings_visible);
        assert!(snapshot.torch_on);
    }
}
