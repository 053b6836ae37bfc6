// Gatecheck Library - QR Check-In Workflow
// This exposes the core components for testing and integration

pub mod config;
pub mod enrollment;
pub mod observability;
pub mod scanner;
pub mod screen;
pub mod server;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, GatecheckConfig, DEFAULT_SERVER_URL};
pub use enrollment::extract_enrollment;
pub use observability::{checkin_metrics, CheckinMetrics, OperationTimer};
pub use scanner::{FileScanSource, ScanSource, ScannedCode, Symbology};
pub use screen::{
    EntryDisplay, EventOutcome, ScreenController, ScreenEvent, ScreenSnapshot, ScreenState,
    ScreenStateMachine,
};
pub use server::{CheckinRequest, CheckinResponse, Reachability, ServerClient, ServerError};
pub use telemetry::{create_scan_span, generate_correlation_id, init_telemetry};
