use crate::db::queries;
use crate::error::Result;
use crate::models::{PackingSlipRow, ReconRow, ScanRow, NOT_ON_SLIP};
use indexmap::IndexMap;
use sqlx::PgPool;
use std::collections::HashSet;

/// Reconciliation service: the precomputed server-side view when it answers,
/// a local merge of both tables when it does not.
pub struct ReconcileService {
    pool: PgPool,
}

impl ReconcileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Per-item reconciliation report for one PO.
    pub async fn report(&self, po: &str) -> Result<Vec<ReconRow>> {
        // 1. Prefer the precomputed view; its rows are used verbatim.
        match queries::reconciliation_view(&self.pool, po).await {
            Ok(rows) => return Ok(rows),
            Err(err) => {
                tracing::warn!(
                    "reconciliation view unavailable for PO {}, merging locally: {}",
                    po,
                    err
                );
            }
        }

        // 2. Fallback: fetch both sides in parallel and merge in memory.
        //    Either lookup failing aborts the whole report.
        let (slips, scans) = futures::try_join!(
            queries::list_slip_rows(&self.pool, po),
            queries::list_po_scans(&self.pool, po),
        )?;

        tracing::info!(
            "reconciled PO {} locally: {} slip rows, {} scans",
            po,
            slips.len(),
            scans.len()
        );
        Ok(reconcile(&slips, &scans))
    }
}

/// Merge scanned-quantity totals with the expected-quantity manifest into a
/// per-item report. Pure; empty inputs yield empty output.
pub fn reconcile(manifest: &[PackingSlipRow], scans: &[ScanRow]) -> Vec<ReconRow> {
    // 1. Sum scanned quantities per item number (NULL quantity counts as 1).
    let mut scanned: IndexMap<String, i64> = IndexMap::new();
    for scan in scans {
        *scanned.entry(scan.item_number.clone()).or_insert(0) += scan.qty_scanned.unwrap_or(1);
    }

    // 2. One row per manifest line.
    let listed: HashSet<&str> = manifest.iter().map(|r| r.item_number.as_str()).collect();
    let mut rows: Vec<ReconRow> = Vec::with_capacity(manifest.len() + scanned.len());
    for slip in manifest {
        let got = scanned.get(&slip.item_number).copied().unwrap_or(0);
        let expected = slip.qty_expected.unwrap_or(0);
        rows.push(ReconRow {
            item_number: slip.item_number.clone(),
            description: slip.description.clone(),
            qty_expected: expected,
            qty_scanned: got,
            qty_remaining: (expected - got).max(0),
        });
    }

    // 3. Scanned items missing from the slip: found extras, never a deficit.
    for (item_number, got) in &scanned {
        if !listed.contains(item_number.as_str()) {
            rows.push(ReconRow {
                item_number: item_number.clone(),
                description: Some(NOT_ON_SLIP.to_string()),
                qty_expected: 0,
                qty_scanned: *got,
                qty_remaining: 0,
            });
        }
    }

    // 4. Ascending by item number.
    rows.sort_by(|a, b| a.item_number.cmp(&b.item_number));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn slip(item: &str, qty: Option<i64>) -> PackingSlipRow {
        PackingSlipRow {
            po_number: "PO12345".to_string(),
            item_number: item.to_string(),
            description: Some(format!("desc {item}")),
            qty_expected: qty,
        }
    }

    fn scan(item: &str, qty: Option<i64>) -> ScanRow {
        ScanRow {
            id: Uuid::new_v4(),
            po_number: Some("PO12345".to_string()),
            item_number: item.to_string(),
            qty_scanned: qty,
            device: Some("mobile".to_string()),
            user_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(reconcile(&[], &[]).is_empty());
    }

    #[test]
    fn one_row_per_distinct_item() {
        let manifest = vec![slip("1001", Some(2)), slip("1002", Some(1))];
        let scans = vec![scan("1001", Some(1)), scan("1001", Some(1)), scan("9999", Some(3))];

        let rows = reconcile(&manifest, &scans);
        let items: Vec<&str> = rows.iter().map(|r| r.item_number.as_str()).collect();
        assert_eq!(items, vec!["1001", "1002", "9999"]);
    }

    #[test]
    fn quantities_sum_and_remaining_never_negative() {
        let manifest = vec![slip("1001", Some(3)), slip("1002", Some(2))];
        let scans = vec![
            scan("1001", Some(2)),
            scan("1001", Some(4)), // over-scan
            scan("1002", Some(1)),
        ];

        let rows = reconcile(&manifest, &scans);
        assert_eq!(rows[0].qty_scanned, 6);
        assert_eq!(rows[0].qty_remaining, 0);
        assert_eq!(rows[1].qty_scanned, 1);
        assert_eq!(rows[1].qty_remaining, 1);
    }

    #[test]
    fn null_scan_quantity_counts_as_one() {
        let manifest = vec![slip("1001", Some(2))];
        let scans = vec![scan("1001", None), scan("1001", None)];

        let rows = reconcile(&manifest, &scans);
        assert_eq!(rows[0].qty_scanned, 2);
        assert_eq!(rows[0].qty_remaining, 0);
    }

    #[test]
    fn null_expected_quantity_counts_as_zero() {
        let manifest = vec![slip("1001", None)];
        let rows = reconcile(&manifest, &[scan("1001", Some(2))]);
        assert_eq!(rows[0].qty_expected, 0);
        assert_eq!(rows[0].qty_remaining, 0);
    }

    #[test]
    fn unlisted_items_are_flagged_without_deficit() {
        let rows = reconcile(&[], &[scan("7777", Some(5))]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description.as_deref(), Some(NOT_ON_SLIP));
        assert_eq!(rows[0].qty_expected, 0);
        assert_eq!(rows[0].qty_scanned, 5);
        assert_eq!(rows[0].qty_remaining, 0);
    }

    #[test]
    fn unscanned_lines_keep_full_remaining() {
        let rows = reconcile(&[slip("1001", Some(4))], &[]);
        assert_eq!(rows[0].qty_scanned, 0);
        assert_eq!(rows[0].qty_remaining, 4);
    }

    #[test]
    fn rows_sort_ascending_by_item_number() {
        let manifest = vec![slip("B2", Some(1)), slip("A10", Some(1)), slip("A1", Some(1))];
        let rows = reconcile(&manifest, &[]);
        let items: Vec<&str> = rows.iter().map(|r| r.item_number.as_str()).collect();
        assert_eq!(items, vec!["A1", "A10", "B2"]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let manifest = vec![slip("1001", Some(2)), slip("1002", None)];
        let scans = vec![scan("1001", Some(1)), scan("5555", None)];
        assert_eq!(reconcile(&manifest, &scans), reconcile(&manifest, &scans));
    }
}
