use crate::db::queries;
use crate::error::Result;
use crate::models::{NewScan, ScanRow};
use sqlx::PgPool;
use uuid::Uuid;

/// Scan capture service: append, list, operator-scoped bulk clear.
pub struct ScanService {
    pool: PgPool,
}

impl ScanService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one scan row.
    pub async fn record(&self, scan: NewScan) -> Result<ScanRow> {
        let row = queries::insert_scan(&self.pool, &scan).await?;
        tracing::info!("recorded scan {} for item {}", row.id, row.item_number);
        Ok(row)
    }

    /// Latest scans, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<ScanRow>> {
        Ok(queries::recent_scans(&self.pool, limit).await?)
    }

    /// Delete every scan owned by `user_id`. Returns the deleted count.
    pub async fn clear_for(&self, user_id: Uuid) -> Result<u64> {
        let deleted = queries::delete_user_scans(&self.pool, user_id).await?;
        tracing::info!("cleared {} scans for user {}", deleted, user_id);
        Ok(deleted)
    }
}
