use thiserror::Error;

/// Failures from the check-in dispatcher.
///
/// Probe failures never surface here; the prober folds every failure into
/// `Reachability::Unreachable`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Transport-level failure talking to the server
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The response body did not match the check-in contract
    #[error("{0}")]
    Decode(String),
}

impl ServerError {
    /// The reason string shown on the denial screen: the underlying error's
    /// message text, or exactly "unknown" when the error carries no message.
    pub fn reason(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "unknown".to_string()
        } else {
            message
        }
    }
}
