use std::time::Duration;
use tracing::{debug, info, warn};

use super::errors::ServerError;
use super::types::{CheckinRequest, CheckinResponse, Reachability};
use crate::observability::checkin_metrics;

/// Sub-path of the base address that records one entry
pub const UPDATE_ENTRY_PATH: &str = "/api/update-entry";

/// HTTP client for the check-in server.
///
/// The base address is an argument to each call rather than stored state:
/// the operator can edit the address at any time, and the address in effect
/// is the one read at the moment a request is dispatched.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
}

impl ServerClient {
    pub fn new(request_timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Dispatch one check-in for the given enrollment identifier.
    ///
    /// The response body is decoded regardless of HTTP status: the server
    /// reports denials in the same JSON shape as grants. An empty identifier
    /// is submitted as-is; the server's denial is the only signal for a
    /// malformed payload.
    pub async fn check_in(
        &self,
        base_url: &str,
        enrollment_number: &str,
    ) -> Result<CheckinResponse, ServerError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), UPDATE_ENTRY_PATH);
        debug!(url = %url, enrollment = %enrollment_number, "Dispatching check-in");
        checkin_metrics().record_checkin();

        let request = CheckinRequest {
            enrollment_number: enrollment_number.to_string(),
        };
        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let parsed: CheckinResponse = serde_json::from_slice(&body)
            .map_err(|e| ServerError::Decode(e.to_string()))?;

        info!(
            status = %status,
            server_message = %parsed.message,
            count = ?parsed.count,
            "Check-in resolved"
        );
        Ok(parsed)
    }

    /// Probe the bare base address and classify the outcome.
    ///
    /// Never fails: any 2xx status means reachable, every other status or a
    /// transport error means unreachable. The probe does not gate or block
    /// the check-in workflow.
    pub async fn probe(&self, base_url: &str) -> Reachability {
        debug!(url = %base_url, "Probing server reachability");
        checkin_metrics().record_probe();

        match self.http.get(base_url).send().await {
            Ok(response) if response.status().is_success() => Reachability::Reachable,
            Ok(response) => {
                warn!(status = %response.status(), "Server probe returned non-success status");
                Reachability::Unreachable
            }
            Err(err) => {
                warn!(error = %err, "Server probe failed");
                Reachability::Unreachable
            }
        }
    }
}
