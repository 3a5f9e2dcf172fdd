use crate::api::identity::Identity;
use crate::error::{Error, Result};
use crate::models::{NewScan, ReconRow, RowStatus, ScanMetrics, ScanRow, StatusPolicy};
use crate::service::{ManifestService, MetricsService, ReconcileService, ScanService};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: one scan action
#[derive(Debug, Deserialize)]
pub struct RecordScanRequest {
    pub po_number: Option<String>,
    pub item_number: String,
    pub qty_scanned: Option<i64>,
    pub device: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordScanResponse {
    pub success: bool,
    pub message: String,
    pub scan: ScanRow,
}

#[derive(Debug, Serialize)]
pub struct ClearScansResponse {
    pub success: bool,
    pub message: String,
    pub deleted: u64,
}

/// Request body: raw CSV manifest for one PO
#[derive(Debug, Deserialize)]
pub struct UploadSlipRequest {
    pub po_number: String,
    pub csv: String,
}

#[derive(Debug, Serialize)]
pub struct UploadSlipResponse {
    pub success: bool,
    pub message: String,
    pub inserted: u64,
    pub warnings: Vec<String>,
}

/// Reconciliation row plus its derived status for display
#[derive(Debug, Serialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub row: ReconRow,
    pub status: RowStatus,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub po_number: String,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Deserialize)]
pub struct RecentScansQuery {
    pub limit: Option<i64>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Record one scan, optionally against a PO.
pub async fn record_scan(
    State(service): State<Arc<ScanService>>,
    identity: Identity,
    Json(req): Json<RecordScanRequest>,
) -> Result<Json<RecordScanResponse>> {
    let item_number = req.item_number.trim().to_string();
    if item_number.is_empty() {
        return Err(Error::MalformedInput("item_number is required".to_string()));
    }
    if matches!(req.qty_scanned, Some(qty) if qty < 1) {
        return Err(Error::MalformedInput(
            "qty_scanned must be a positive integer".to_string(),
        ));
    }

    let scan = service
        .record(NewScan {
            po_number: req
                .po_number
                .map(|po| po.trim().to_string())
                .filter(|po| !po.is_empty()),
            item_number,
            qty_scanned: req.qty_scanned,
            device: req.device,
            user_id: identity.0,
        })
        .await?;

    Ok(Json(RecordScanResponse {
        success: true,
        message: format!("Recorded scan for item {}", scan.item_number),
        scan,
    }))
}

/// Latest scans, newest first.
pub async fn recent_scans(
    State(service): State<Arc<ScanService>>,
    Query(query): Query<RecentScansQuery>,
) -> Result<Json<Vec<ScanRow>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    Ok(Json(service.recent(limit).await?))
}

/// Bulk-clear the signed-in operator's scans. Rejected before any store
/// call when nobody is signed in.
pub async fn clear_scans(
    State(service): State<Arc<ScanService>>,
    identity: Identity,
) -> Result<Json<ClearScansResponse>> {
    let user_id = identity.require()?;
    let deleted = service.clear_for(user_id).await?;
    Ok(Json(ClearScansResponse {
        success: true,
        message: format!("Cleared {} scans", deleted),
        deleted,
    }))
}

/// Parse and store a packing-slip manifest for one PO.
pub async fn upload_slip(
    State(service): State<Arc<ManifestService>>,
    Json(req): Json<UploadSlipRequest>,
) -> Result<Json<UploadSlipResponse>> {
    let outcome = service.upload(&req.po_number, &req.csv).await?;
    Ok(Json(UploadSlipResponse {
        success: true,
        message: format!(
            "Uploaded {} rows for PO {}",
            outcome.inserted,
            req.po_number.trim()
        ),
        inserted: outcome.inserted,
        warnings: outcome.warnings,
    }))
}

/// Reconciliation report for one PO.
pub async fn reconcile_po(
    State(service): State<Arc<ReconcileService>>,
    Path(po): Path<String>,
) -> Result<Json<ReconcileResponse>> {
    let po = po.trim().to_string();
    let rows = service.report(&po).await?;

    let policy = StatusPolicy::default();
    let rows = rows
        .into_iter()
        .map(|row| ReportRow {
            status: policy.classify(&row),
            row,
        })
        .collect();

    Ok(Json(ReconcileResponse { po_number: po, rows }))
}

/// Dashboard counters.
pub async fn metrics(State(service): State<Arc<MetricsService>>) -> Result<Json<ScanMetrics>> {
    Ok(Json(service.snapshot().await?))
}
