use crate::models::{NewScan, PackingSlipRow, ReconRow, ScanRow};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Manifest upload batch size. Inserts are chunked to stay under the
/// backing store's payload limits.
pub const SLIP_CHUNK: usize = 500;

/// Packing-slip rows for one PO
pub async fn list_slip_rows(pool: &PgPool, po: &str) -> Result<Vec<PackingSlipRow>, sqlx::Error> {
    sqlx::query_as::<_, PackingSlipRow>(
        r#"
        SELECT po_number, item_number, description, qty_expected
        FROM packing_slips
        WHERE po_number = $1
        "#,
    )
    .bind(po)
    .fetch_all(pool)
    .await
}

/// Scan rows recorded against one PO
pub async fn list_po_scans(pool: &PgPool, po: &str) -> Result<Vec<ScanRow>, sqlx::Error> {
    sqlx::query_as::<_, ScanRow>(
        r#"
        SELECT id, po_number, item_number, qty_scanned, device, user_id, created_at
        FROM scans
        WHERE po_number = $1
        "#,
    )
    .bind(po)
    .fetch_all(pool)
    .await
}

/// Scan rows created at or after `since`, for windowed counting
pub async fn scans_since(pool: &PgPool, since: DateTime<Utc>) -> Result<Vec<ScanRow>, sqlx::Error> {
    sqlx::query_as::<_, ScanRow>(
        r#"
        SELECT id, po_number, item_number, qty_scanned, device, user_id, created_at
        FROM scans
        WHERE created_at >= $1
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await
}

/// Most recent scans first
pub async fn recent_scans(pool: &PgPool, limit: i64) -> Result<Vec<ScanRow>, sqlx::Error> {
    sqlx::query_as::<_, ScanRow>(
        r#"
        SELECT id, po_number, item_number, qty_scanned, device, user_id, created_at
        FROM scans
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Precomputed reconciliation rows from the server-side view
pub async fn reconciliation_view(pool: &PgPool, po: &str) -> Result<Vec<ReconRow>, sqlx::Error> {
    sqlx::query_as::<_, ReconRow>(
        r#"
        SELECT item_number, description, qty_expected, qty_scanned, qty_remaining
        FROM v_po_reconcile
        WHERE po_number = $1
        ORDER BY item_number ASC
        "#,
    )
    .bind(po)
    .fetch_all(pool)
    .await
}

/// Append one scan row. Quantity defaults to 1 when unspecified.
pub async fn insert_scan(pool: &PgPool, scan: &NewScan) -> Result<ScanRow, sqlx::Error> {
    sqlx::query_as::<_, ScanRow>(
        r#"
        INSERT INTO scans (po_number, item_number, qty_scanned, device, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, po_number, item_number, qty_scanned, device, user_id, created_at
        "#,
    )
    .bind(&scan.po_number)
    .bind(&scan.item_number)
    .bind(scan.qty_scanned.unwrap_or(1))
    .bind(&scan.device)
    .bind(scan.user_id)
    .fetch_one(pool)
    .await
}

/// Delete every scan owned by `user_id`. Returns the deleted row count.
pub async fn delete_user_scans(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM scans WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Replace the stored packing slip for `po` with `rows`: delete then chunked
/// inserts, all in one transaction. Returns the inserted row count.
pub async fn replace_slip(
    pool: &PgPool,
    po: &str,
    rows: &[PackingSlipRow],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM packing_slips WHERE po_number = $1")
        .bind(po)
        .execute(&mut *tx)
        .await?;

    let mut inserted = 0u64;
    for chunk in rows.chunks(SLIP_CHUNK) {
        let start_time = std::time::Instant::now();

        let mut query_builder = sqlx::QueryBuilder::new(
            "INSERT INTO packing_slips (po_number, item_number, description, qty_expected) ",
        );
        query_builder.push_values(chunk, |mut b, row| {
            b.push_bind(&row.po_number)
                .push_bind(&row.item_number)
                .push_bind(row.description.clone())
                .push_bind(row.qty_expected);
        });

        // 30s timeout per chunk insert
        let execute_result = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            query_builder.build().execute(&mut *tx),
        )
        .await;

        match execute_result {
            Ok(Ok(done)) => {
                inserted += done.rows_affected();
                tracing::debug!(
                    "slip INSERT chunk of {} rows done in {:?}",
                    chunk.len(),
                    start_time.elapsed()
                );
            }
            Ok(Err(e)) => {
                tracing::error!("slip INSERT failed after {:?}: {:?}", start_time.elapsed(), e);
                return Err(e);
            }
            Err(_) => {
                tracing::error!("slip INSERT timed out (>30s)");
                return Err(sqlx::Error::PoolTimedOut);
            }
        }
    }

    tx.commit().await?;
    Ok(inserted)
}
