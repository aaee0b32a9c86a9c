use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::warn;

use super::{format_timestamp, parse_timestamp};
use crate::models::PriceSample;

/// Get raw price rows with `from <= valid_from < to`, oldest first
pub async fn prices_between(
    pool: &SqlitePool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<PriceSample>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT price, valid_from FROM prices WHERE valid_from >= ? AND valid_from < ? ORDER BY valid_from ASC"
    )
    .bind(format_timestamp(from))
    .bind(format_timestamp(to))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let raw_price: f64 = row.get(0);
            let valid_from: String = row.get(1);
            match parse_timestamp(&valid_from) {
                Some(valid_from) => Some(PriceSample { valid_from, raw_price }),
                None => {
                    warn!("Skipping price row with bad timestamp '{}'", valid_from);
                    None
                }
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_price, memory_pool};
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_prices_between_is_half_open_and_ordered() {
        let pool = memory_pool().await;
        insert_price(&pool, 30.0, "2024-01-01 02:00:00").await;
        insert_price(&pool, 10.0, "2024-01-01 00:00:00").await;
        insert_price(&pool, 20.0, "2024-01-01 01:00:00").await;
        insert_price(&pool, 99.0, "garbage").await;

        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        let prices = prices_between(&pool, from, to).await.unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].raw_price, 10.0);
        assert_eq!(prices[0].valid_from, from);
        assert_eq!(prices[1].raw_price, 20.0);
    }
}
