use crate::db::queries;
use crate::error::Result;
use crate::models::{ScanMetrics, ScanRow};
use chrono::{DateTime, Duration, Local, NaiveTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;

/// Dashboard metrics service.
pub struct MetricsService {
    pool: PgPool,
}

impl MetricsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Counters over the trailing seven-day window. One windowed fetch
    /// covers both counts: local midnight always falls inside the window.
    pub async fn snapshot(&self) -> Result<ScanMetrics> {
        let now = Local::now();
        let window_start = (now - Duration::days(6)).with_timezone(&Utc);
        let scans = queries::scans_since(&self.pool, window_start).await?;
        Ok(summarize(&scans, now))
    }
}

/// Count scans for the local calendar day and for the trailing 7-day window
/// (today plus six prior days), plus distinct codes in that window. Pure.
pub fn summarize(scans: &[ScanRow], now: DateTime<Local>) -> ScanMetrics {
    // Midnight of the local calendar day. A DST gap at midnight has no
    // earliest instant; fall back to `now`.
    let start_today = now
        .with_time(NaiveTime::MIN)
        .earliest()
        .unwrap_or(now)
        .with_timezone(&Utc);
    let start_window = (now - Duration::days(6)).with_timezone(&Utc);

    let mut scans_today = 0u64;
    let mut scans_last7 = 0u64;
    let mut codes: HashSet<&str> = HashSet::new();
    for scan in scans {
        if scan.created_at < start_window {
            continue;
        }
        scans_last7 += 1;
        codes.insert(scan.item_number.as_str());
        if scan.created_at >= start_today {
            scans_today += 1;
        }
    }

    ScanMetrics {
        scans_today,
        scans_last7,
        unique_codes_last7: codes.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn scan_at(code: &str, at: DateTime<Local>) -> ScanRow {
        ScanRow {
            id: Uuid::new_v4(),
            po_number: None,
            item_number: code.to_string(),
            qty_scanned: Some(1),
            device: None,
            user_id: None,
            created_at: at.with_timezone(&Utc),
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn counts_today_window_and_unique_codes() {
        let now = noon();
        let mut scans = vec![
            scan_at("A", now - Duration::hours(1)),
            scan_at("A", now - Duration::hours(2)),
            scan_at("B", now - Duration::hours(3)),
        ];
        // Ten scans six days ago, still inside the window.
        let old = now - Duration::days(6) + Duration::hours(2);
        for i in 0..10 {
            scans.push(scan_at(if i % 2 == 0 { "A" } else { "B" }, old));
        }

        let m = summarize(&scans, now);
        assert_eq!(m.scans_today, 3);
        assert_eq!(m.scans_last7, 13);
        assert_eq!(m.unique_codes_last7, 2);
    }

    #[test]
    fn window_start_is_inclusive() {
        let now = noon();
        let scans = vec![
            scan_at("A", now - Duration::days(6)),
            scan_at("B", now - Duration::days(6) - Duration::seconds(1)),
        ];
        let m = summarize(&scans, now);
        assert_eq!(m.scans_last7, 1);
        assert_eq!(m.unique_codes_last7, 1);
    }

    #[test]
    fn yesterday_counts_in_window_but_not_today() {
        let now = noon();
        let scans = vec![scan_at("A", now - Duration::hours(13))]; // 23:00 yesterday
        let m = summarize(&scans, now);
        assert_eq!(m.scans_today, 0);
        assert_eq!(m.scans_last7, 1);
    }

    #[test]
    fn empty_collection_is_all_zeroes() {
        let m = summarize(&[], noon());
        assert_eq!(m.scans_today, 0);
        assert_eq!(m.scans_last7, 0);
        assert_eq!(m.unique_codes_last7, 0);
    }
}
