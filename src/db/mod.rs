use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub mod price;
pub mod usage;

/// Timestamp layout used in every table (always UTC)
pub const DB_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CREATE_TABLES: &str = include_str!("../../migrations/create_tables.sql");

/// Open the SQLite store and make sure the tables exist
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(false);

    // One render at a time; a single connection also keeps `sqlite::memory:` coherent
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all database tables
async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CREATE_TABLES).execute(pool).await?;
    Ok(())
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(DB_TIME_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, DB_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    pub async fn memory_pool() -> SqlitePool {
        init_db("sqlite::memory:").await.unwrap()
    }

    pub async fn insert_price(pool: &SqlitePool, price: f64, valid_from: &str) {
        sqlx::query("INSERT INTO prices (price, valid_from) VALUES (?, ?)")
            .bind(price)
            .bind(valid_from)
            .execute(pool)
            .await
            .unwrap();
    }

    pub async fn insert_usage(pool: &SqlitePool, amount: f64, start: &str, end: &str) {
        sqlx::query("INSERT INTO usage (amount, interval_start, interval_end) VALUES (?, ?, ?)")
            .bind(amount)
            .bind(start)
            .bind(end)
            .execute(pool)
            .await
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-01 17:00:00");
        assert_eq!(parse_timestamp("2024-01-01 17:00:00"), Some(ts));
        assert_eq!(parse_timestamp("2024-01-01T17:00:00Z"), None);
    }

    #[tokio::test]
    async fn test_init_db_is_idempotent() {
        let pool = test_support::memory_pool().await;
        create_tables(&pool).await.unwrap();
        test_support::insert_price(&pool, 1.0, "2024-01-01 00:00:00").await;
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = init_db("sqlite:///nonexistent-dir/electricity.db").await;
        assert!(result.is_err());
    }
}
