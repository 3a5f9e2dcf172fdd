use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One scan event as stored. Append-only; removed only by the
/// operator-scoped bulk clear.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScanRow {
    pub id: Uuid,
    /// Some scan paths record codes with no PO association.
    pub po_number: Option<String>,
    pub item_number: String,
    /// NULL counts as 1 wherever quantities are summed.
    pub qty_scanned: Option<i64>,
    pub device: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for one scan action. The store assigns id and created_at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScan {
    pub po_number: Option<String>,
    pub item_number: String,
    pub qty_scanned: Option<i64>,
    pub device: Option<String>,
    pub user_id: Option<Uuid>,
}
