use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One expected line item parsed from an uploaded manifest CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestLine {
    pub item_number: String,
    pub description: Option<String>,
    /// None when the CSV omits the column, leaves it blank, or the value is
    /// not a usable number. Defaulted to 1 at upload time, not at parse time.
    pub qty_expected: Option<i64>,
}

/// One packing-slip row as stored, keyed by PO + item number.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PackingSlipRow {
    pub po_number: String,
    pub item_number: String,
    pub description: Option<String>,
    pub qty_expected: Option<i64>,
}
