use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Description sentinel for items that were scanned but never listed on the
/// packing slip.
pub const NOT_ON_SLIP: &str = "(not on slip)";

/// One reconciliation line for a PO. Derived, never persisted: either read
/// verbatim from the server-side view or produced by the local merge.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ReconRow {
    pub item_number: String,
    pub description: Option<String>,
    pub qty_expected: i64,
    pub qty_scanned: i64,
    /// Always max(qty_expected - qty_scanned, 0), never negative.
    pub qty_remaining: i64,
}

/// Per-row receiving status, derived for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Ok,
    Partial,
    Missing,
}

/// Classification thresholds for short rows.
///
/// The default marks every short row `missing`. With `started_is_partial`
/// set, a short row that has at least one scan reports `partial` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPolicy {
    pub started_is_partial: bool,
}

impl StatusPolicy {
    pub fn classify(&self, row: &ReconRow) -> RowStatus {
        if row.qty_remaining == 0 {
            // Fully received, or an unlisted extra. Raw view rows can still
            // report a shortfall here; surface those as partial.
            if row.qty_scanned >= row.qty_expected {
                RowStatus::Ok
            } else {
                RowStatus::Partial
            }
        } else if self.started_is_partial && row.qty_scanned > 0 {
            RowStatus::Partial
        } else {
            RowStatus::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(expected: i64, scanned: i64, remaining: i64) -> ReconRow {
        ReconRow {
            item_number: "1001".to_string(),
            description: None,
            qty_expected: expected,
            qty_scanned: scanned,
            qty_remaining: remaining,
        }
    }

    #[test]
    fn fully_received_is_ok() {
        let policy = StatusPolicy::default();
        assert_eq!(policy.classify(&row(5, 5, 0)), RowStatus::Ok);
        assert_eq!(policy.classify(&row(5, 7, 0)), RowStatus::Ok);
        // Unlisted extras never show a deficit.
        assert_eq!(policy.classify(&row(0, 3, 0)), RowStatus::Ok);
    }

    #[test]
    fn short_rows_default_to_missing() {
        let policy = StatusPolicy::default();
        assert_eq!(policy.classify(&row(5, 0, 5)), RowStatus::Missing);
        assert_eq!(policy.classify(&row(5, 3, 2)), RowStatus::Missing);
    }

    #[test]
    fn started_rows_report_partial_when_enabled() {
        let policy = StatusPolicy {
            started_is_partial: true,
        };
        assert_eq!(policy.classify(&row(5, 3, 2)), RowStatus::Partial);
        assert_eq!(policy.classify(&row(5, 0, 5)), RowStatus::Missing);
    }
}
