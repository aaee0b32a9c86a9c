use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::warn;

use super::parse_timestamp;
use crate::models::UsageRecord;

/// One page of the newest-first usage query
#[derive(Debug, Clone, PartialEq)]
pub struct UsagePage {
    /// Rows that parsed
    pub records: Vec<UsageRecord>,
    /// Rows the query returned, including skipped ones
    pub row_count: usize,
}

/// Get one page of measured usage rows, newest first
/// Rows with amount 0 (meter gaps) are never returned
pub async fn usage_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<UsagePage, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT amount, interval_start, interval_end FROM usage WHERE amount != 0 ORDER BY interval_start DESC LIMIT ? OFFSET ?"
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let row_count = rows.len();
    let records = rows
        .into_iter()
        .filter_map(|row| {
            let amount: f64 = row.get(0);
            let start: String = row.get(1);
            let end: String = row.get(2);
            match (parse_timestamp(&start), parse_timestamp(&end)) {
                (Some(interval_start), Some(interval_end)) => Some(UsageRecord {
                    interval_start,
                    interval_end,
                    amount,
                }),
                _ => {
                    warn!("Skipping usage row with bad interval '{}'..'{}'", start, end);
                    None
                }
            }
        })
        .collect();

    Ok(UsagePage { records, row_count })
}

/// Rows read per round trip while looking for the latest parseable end
const LATEST_SCAN_PAGE: i64 = 24;

/// End of the most recent measured usage interval
/// Rows whose end does not parse are skipped
pub async fn latest_usage_end(pool: &SqlitePool) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    let mut offset = 0;

    loop {
        let ends = sqlx::query_scalar::<_, String>(
            "SELECT interval_end FROM usage WHERE amount != 0 ORDER BY interval_end DESC LIMIT ? OFFSET ?"
        )
        .bind(LATEST_SCAN_PAGE)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        for end in &ends {
            match parse_timestamp(end) {
                Some(ts) => return Ok(Some(ts)),
                None => warn!("Skipping usage row with bad interval end '{}'", end),
            }
        }

        if (ends.len() as i64) < LATEST_SCAN_PAGE {
            return Ok(None);
        }
        offset += LATEST_SCAN_PAGE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_usage, memory_pool};
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_usage_page_skips_unmeasured_rows() {
        let pool = memory_pool().await;
        insert_usage(&pool, 0.5, "2024-01-01 00:00:00", "2024-01-01 01:00:00").await;
        insert_usage(&pool, 0.0, "2024-01-01 01:00:00", "2024-01-01 02:00:00").await;
        insert_usage(&pool, 0.7, "2024-01-01 02:00:00", "2024-01-01 03:00:00").await;
        insert_usage(&pool, 0.9, "2024-01-01 03:00:00", "2024-01-01 04:00:00").await;

        let first = usage_page(&pool, 2, 0).await.unwrap();
        assert_eq!(first.row_count, 2);
        assert_eq!(first.records[0].amount, 0.9);
        assert_eq!(first.records[1].amount, 0.7);

        let second = usage_page(&pool, 2, 2).await.unwrap();
        assert_eq!(second.row_count, 1);
        assert_eq!(second.records[0].amount, 0.5);
    }

    #[tokio::test]
    async fn test_usage_page_counts_unparseable_rows() {
        let pool = memory_pool().await;
        insert_usage(&pool, 0.5, "2024-01-01 00:00:00", "2024-01-01 01:00:00").await;
        insert_usage(&pool, 0.7, "bad-start", "2024-01-01 02:00:00").await;

        let page = usage_page(&pool, 10, 0).await.unwrap();
        assert_eq!(page.row_count, 2);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].amount, 0.5);
    }

    #[tokio::test]
    async fn test_latest_usage_end() {
        let pool = memory_pool().await;
        assert_eq!(latest_usage_end(&pool).await.unwrap(), None);

        insert_usage(&pool, 1.0, "2024-01-01 22:00:00", "2024-01-01 23:00:00").await;
        insert_usage(&pool, 0.0, "2024-01-01 23:00:00", "2024-01-02 00:00:00").await;

        assert_eq!(
            latest_usage_end(&pool).await.unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_latest_usage_end_skips_broken_rows() {
        let pool = memory_pool().await;
        insert_usage(&pool, 1.0, "2024-01-01 10:00:00", "2024-01-01 11:00:00").await;
        // text sorts after every digit, so this row comes first
        insert_usage(&pool, 1.0, "2024-01-01 11:00:00", "broken").await;

        assert_eq!(
            latest_usage_end(&pool).await.unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_latest_usage_end_only_broken_rows() {
        let pool = memory_pool().await;
        insert_usage(&pool, 1.0, "2024-01-01 11:00:00", "broken").await;
        assert_eq!(latest_usage_end(&pool).await.unwrap(), None);
    }
}
