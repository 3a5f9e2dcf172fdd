use crate::db::queries;
use crate::error::{Error, Result};
use crate::models::{ManifestLine, PackingSlipRow};
use indexmap::IndexSet;
use sqlx::PgPool;

/// Parse result: manifest lines in input order plus row-level warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedManifest {
    pub lines: Vec<ManifestLine>,
    pub warnings: Vec<String>,
}

/// Outcome of a manifest upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub inserted: u64,
    pub warnings: Vec<String>,
}

/// Parse a raw CSV manifest.
///
/// The first non-blank line is the header; `item_number` is required,
/// `description` and `qty_expected` are optional, all matched
/// case-insensitively. Rows with an empty item number are skipped. A
/// quantity that is not a non-negative integer yields a warning and parses
/// as None. Empty input parses to an empty manifest.
pub fn parse_manifest(raw: &str) -> Result<ParsedManifest> {
    // Drop blank lines up front; quoted fields never span lines in this
    // dialect, so line-level filtering is safe.
    let body = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if body.is_empty() {
        return Ok(ParsedManifest {
            lines: Vec::new(),
            warnings: Vec::new(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::MalformedInput(format!("unreadable CSV header: {e}")))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let idx_item = column("item_number")
        .ok_or_else(|| Error::MalformedInput("CSV must include an item_number column".to_string()))?;
    let idx_desc = column("description");
    let idx_qty = column("qty_expected");

    let mut lines = Vec::new();
    let mut warnings = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| Error::MalformedInput(format!("CSV row {}: {e}", i + 2)))?;

        let item_number = record.get(idx_item).unwrap_or("").trim();
        if item_number.is_empty() {
            continue;
        }

        let description = idx_desc
            .and_then(|ix| record.get(ix))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let qty_expected = match idx_qty.and_then(|ix| record.get(ix)).map(str::trim) {
            None | Some("") => None,
            Some(text) => match text.parse::<i64>() {
                Ok(qty) if qty >= 0 => Some(qty),
                _ => {
                    let warning = format!(
                        "row {}: qty_expected `{}` is not a non-negative integer, defaulting to 1",
                        i + 2,
                        text
                    );
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                    None
                }
            },
        };

        lines.push(ManifestLine {
            item_number: item_number.to_string(),
            description,
            qty_expected,
        });
    }

    Ok(ParsedManifest { lines, warnings })
}

/// Packing-slip upload service: parse, validate, replace the PO's rows.
pub struct ManifestService {
    pool: PgPool,
}

impl ManifestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse `raw_csv` and replace the stored packing slip for `po`.
    /// Re-uploads supersede prior rows, they never merge.
    pub async fn upload(&self, po: &str, raw_csv: &str) -> Result<UploadOutcome> {
        let po = po.trim();
        if po.is_empty() {
            return Err(Error::MalformedInput("PO number is required".to_string()));
        }

        let parsed = parse_manifest(raw_csv)?;
        if parsed.lines.is_empty() {
            return Err(Error::MalformedInput("no manifest rows to upload".to_string()));
        }

        // One row per item number within a PO.
        let mut seen: IndexSet<&str> = IndexSet::with_capacity(parsed.lines.len());
        for line in &parsed.lines {
            if !seen.insert(line.item_number.as_str()) {
                return Err(Error::DuplicateItem(line.item_number.clone()));
            }
        }

        let rows: Vec<PackingSlipRow> = parsed
            .lines
            .iter()
            .map(|line| PackingSlipRow {
                po_number: po.to_string(),
                item_number: line.item_number.clone(),
                description: line.description.clone(),
                // Absent quantities default to 1 at upload time.
                qty_expected: Some(line.qty_expected.unwrap_or(1)),
            })
            .collect();

        let inserted = queries::replace_slip(&self.pool, po, &rows).await?;
        tracing::info!("uploaded {} slip rows for PO {}", inserted, po);
        Ok(UploadOutcome {
            inserted,
            warnings: parsed.warnings,
        })
    }
}
