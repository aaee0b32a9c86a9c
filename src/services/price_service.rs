use chrono::{DateTime, Days, Duration, Timelike, Utc};
use chrono_tz::Tz;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, warn};

use crate::db;
use crate::models::{PriceSample, PriceSeries};
use crate::services::tariff_service::{round_price, TariffCalculator};
use crate::services::usage_service::{hour_bucket, local_midnight};

/// Slots in the forward-looking window shown on the chart
pub const SERIES_WINDOW_HOURS: usize = 48;
const HOURS_PER_DAY: usize = 24;

/// Rounded final price of the current hour
/// A missing price row is logged and shown as 0
pub async fn current_cost(
    pool: &SqlitePool,
    calculator: &TariffCalculator,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let slot = hour_bucket(now, calculator.timezone());
    let rows = db::price::prices_between(pool, slot, slot + Duration::hours(1)).await?;

    match rows.first() {
        Some(sample) => Ok(round_price(calculator.tariff(sample.raw_price, sample.valid_from))),
        None => {
            warn!("No price row for the current hour {}", slot);
            Ok(0)
        }
    }
}

/// Hourly prices from local midnight yesterday to local midnight after tomorrow,
/// trimmed to the 48 h chart window when tomorrow's prices are published
pub async fn build_series(
    pool: &SqlitePool,
    calculator: &TariffCalculator,
    now: DateTime<Utc>,
) -> Result<PriceSeries, sqlx::Error> {
    let tz = calculator.timezone();
    let today = now.with_timezone(&tz).date_naive();
    let from = local_midnight(today - Days::new(1), tz);
    let to = local_midnight(today + Days::new(2), tz);

    let samples = db::price::prices_between(pool, from, to).await?;
    debug!("Fetched {} price slots between {} and {}", samples.len(), from, to);

    Ok(assemble_series(&samples, calculator, now))
}

/// Apply tariffs and pick the window and current slot
pub fn assemble_series(
    samples: &[PriceSample],
    calculator: &TariffCalculator,
    now: DateTime<Utc>,
) -> PriceSeries {
    let tz = calculator.timezone();
    let mut prices: Vec<i64> = samples
        .iter()
        .map(|s| round_price(calculator.tariff(s.raw_price, s.valid_from)))
        .collect();
    let mut slot_hours: Vec<u32> = samples.iter().map(|s| local_hour(s.valid_from, tz)).collect();

    let hour = local_hour(now, tz) as usize;

    // With tomorrow's prices available, yesterday is dropped
    let current_index = if prices.len() > SERIES_WINDOW_HOURS {
        prices.drain(..HOURS_PER_DAY);
        slot_hours.drain(..HOURS_PER_DAY);
        hour
    } else {
        hour + HOURS_PER_DAY
    };

    PriceSeries {
        current_index: current_index.min(prices.len()),
        prices,
        slot_hours,
    }
}

fn local_hour(ts: DateTime<Utc>, tz: Tz) -> u32 {
    ts.with_timezone(&tz).hour()
}
