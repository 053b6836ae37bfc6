use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Check-in workflow counters
#[derive(Debug, Default)]
pub struct CheckinMetrics {
    pub scans_accepted: AtomicU64,
    pub scans_ignored: AtomicU64,
    pub checkins: AtomicU64,
    pub grants: AtomicU64,
    pub denials: AtomicU64,
    pub transport_failures: AtomicU64,
    pub probes: AtomicU64,
}

impl CheckinMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scan_accepted(&self) {
        self.scans_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_ignored(&self) {
        self.scans_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_checkin(&self) {
        self.checkins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_grant(&self) {
        self.grants.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_denial(&self) {
        self.denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> CheckinStats {
        CheckinStats {
            scans_accepted: self.scans_accepted.load(Ordering::Relaxed),
            scans_ignored: self.scans_ignored.load(Ordering::Relaxed),
            checkins: self.checkins.load(Ordering::Relaxed),
            grants: self.grants.load(Ordering::Relaxed),
            denials: self.denials.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Check-in metrics: scans_accepted={}, scans_ignored={}, checkins={}, grants={}, denials={}, transport_failures={}, probes={}",
            stats.scans_accepted,
            stats.scans_ignored,
            stats.checkins,
            stats.grants,
            stats.denials,
            stats.transport_failures,
            stats.probes
        );
    }
}

#[derive(Debug, Clone)]
pub struct CheckinStats {
    pub scans_accepted: u64,
    pub scans_ignored: u64,
    pub checkins: u64,
    pub grants: u64,
    pub denials: u64,
    pub transport_failures: u64,
    pub probes: u64,
}

/// Global metrics instance
static CHECKIN_METRICS: std::sync::LazyLock<CheckinMetrics> =
    std::sync::LazyLock::new(CheckinMetrics::new);

pub fn checkin_metrics() -> &'static CheckinMetrics {
    &CHECKIN_METRICS
}

/// Time an operation and log its duration
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}

#[macro_export]
macro_rules! time_operation {
    ($operation:expr) => {
        let _timer = $crate::observability::OperationTimer::new($operation);
    };
}
