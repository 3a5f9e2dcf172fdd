use serde::{Deserialize, Serialize};

/// Dashboard counters over a time-windowed scan collection. Derived, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetrics {
    /// Scans since local midnight.
    pub scans_today: u64,
    /// Scans in the trailing 7-day window (today plus six prior days).
    pub scans_last7: u64,
    /// Distinct item codes in the same 7-day window.
    pub unique_codes_last7: u64,
}
