use std::collections::HashMap;

use chrono::{DateTime, Days, Duration, DurationRound, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, warn};

use crate::db;
use crate::models::{PriceSample, UsageRecord, UsageSummary};
use crate::services::tariff_service::TariffCalculator;

/// Rows fetched per round trip while walking back through the usage table
const USAGE_PAGE_SIZE: i64 = 24 * 7;

/// Sum usage, cost and efficiency over `day_count` days ending `day_offset`
/// days before the most recent day with measured usage
pub async fn aggregate(
    pool: &SqlitePool,
    calculator: &TariffCalculator,
    day_offset: u32,
    day_count: u32,
) -> Result<UsageSummary, sqlx::Error> {
    let tz = calculator.timezone();

    let latest_end = match db::usage::latest_usage_end(pool).await? {
        Some(end) => end,
        None => {
            warn!("No measured usage in the database");
            return Ok(UsageSummary::empty("no data"));
        }
    };

    let latest_day = latest_usage_day(latest_end, tz);
    let (first_day, last_day) = window_days(latest_day, day_offset, day_count);
    let window_start = local_midnight(first_day, tz);
    let window_end = local_midnight(last_day + Days::new(1), tz);
    debug!(
        "Usage window {} .. {} ({} - {} UTC)",
        first_day, last_day, window_start, window_end
    );

    let records = usage_in_window(pool, window_start, window_end).await?;
    let prices = db::price::prices_between(pool, window_start, window_end).await?;

    Ok(summarize(
        &records,
        &prices,
        calculator,
        period_label(first_day, last_day),
    ))
}

/// Local calendar day holding the instant just before `latest_end`
pub fn latest_usage_day(latest_end: DateTime<Utc>, tz: Tz) -> NaiveDate {
    (latest_end - Duration::seconds(1))
        .with_timezone(&tz)
        .date_naive()
}

/// First and last local day of the window, both inclusive
pub fn window_days(latest_day: NaiveDate, day_offset: u32, day_count: u32) -> (NaiveDate, NaiveDate) {
    let last_day = latest_day - Days::new(u64::from(day_offset));
    let first_day = last_day - Days::new(u64::from(day_count.max(1) - 1));
    (first_day, last_day)
}

/// UTC instant of local midnight on `day`, using that date's offset
pub fn local_midnight(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        // zones that skip midnight on a DST switch start the day at 01:00
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Start of the local hour containing `ts`
pub fn hour_bucket(ts: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let local = ts.with_timezone(&tz);
    local
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .map(|t| t.with_timezone(&Utc))
        .or_else(|| ts.duration_trunc(Duration::hours(1)).ok())
        .unwrap_or(ts)
}

/// Walk the newest-first usage pages until the window start is passed
async fn usage_in_window(
    pool: &SqlitePool,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<UsageRecord>, sqlx::Error> {
    let mut records = Vec::new();
    let mut offset = 0;

    loop {
        let page = db::usage::usage_page(pool, USAGE_PAGE_SIZE, offset).await?;
        let exhausted = (page.row_count as i64) < USAGE_PAGE_SIZE;
        let mut passed_window = false;

        for record in page.records {
            if record.interval_start < window_start {
                passed_window = true;
                break;
            }
            if record.interval_end <= window_end {
                records.push(record);
            }
        }

        if exhausted || passed_window {
            break;
        }
        offset += USAGE_PAGE_SIZE;
    }

    Ok(records)
}

/// Cost and efficiency of `records`, priced per local hour slot
pub fn summarize(
    records: &[UsageRecord],
    prices: &[PriceSample],
    calculator: &TariffCalculator,
    period_label: String,
) -> UsageSummary {
    let tz = calculator.timezone();
    let tariffs: HashMap<DateTime<Utc>, f64> = prices
        .iter()
        .map(|p| {
            let slot = hour_bucket(p.valid_from, tz);
            (slot, calculator.tariff(p.raw_price, slot))
        })
        .collect();

    let mut total_amount = 0.0;
    let mut total_cost = 0.0;
    let mut min_tariff: Option<f64> = None;

    for record in records.iter().filter(|r| r.amount != 0.0) {
        total_amount += record.amount;

        let slot = hour_bucket(record.interval_start, tz);
        match tariffs.get(&slot) {
            Some(&tariff) => {
                total_cost += record.amount * tariff;
                min_tariff = Some(min_tariff.map_or(tariff, |m| m.min(tariff)));
            }
            None => {
                warn!("No price for usage slot {}, counting it as free", slot);
            }
        }
    }

    UsageSummary {
        period_label,
        total_amount,
        total_cost,
        efficiency_percent: efficiency_percent(total_cost, total_amount, min_tariff),
    }
}

/// Actual cost relative to buying everything at the cheapest slot, in percent
pub fn efficiency_percent(total_cost: f64, total_amount: f64, min_tariff: Option<f64>) -> Option<f64> {
    match min_tariff {
        Some(min) if total_amount > 0.0 && min > 0.0 => Some(total_cost / (total_amount * min) * 100.0),
        _ => None,
    }
}

fn period_label(first_day: NaiveDate, last_day: NaiveDate) -> String {
    if first_day == last_day {
        last_day.format("%Y-%m-%d").to_string()
    } else {
        format!("{} - {}", first_day.format("%d/%m"), last_day.format("%d/%m"))
    }
}
