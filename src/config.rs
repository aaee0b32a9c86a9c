//! Runtime configuration, read from the environment (and `.env`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::models::tariff::{SeasonalSurcharge, Surcharge, TariffConfig};
use crate::utils::export::OutputFormat;
use crate::utils::errors::{DashResult, DashboardError};

const DEFAULT_WEATHER_URL: &str = "https://www.dmi.dk/NinJo2DmiDk/ninjo2dmidk";

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub latitude: String,
    pub longitude: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub font_path: PathBuf,
    pub timezone: Tz,
    pub weather: WeatherConfig,
    pub tariff: TariffConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> DashResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> DashResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DashboardError::Config(format!("{} not set", key)))
        };

        let database_url = required("DATABASE_URL")?;
        let font_path = PathBuf::from(required("FONT_PATH")?);

        let timezone = match lookup("DASHBOARD_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| DashboardError::Config(format!("DASHBOARD_TIMEZONE: {}", e)))?,
            None => chrono_tz::Europe::Copenhagen,
        };

        let weather = WeatherConfig {
            base_url: lookup("WEATHER_BASE_URL").unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string()),
            latitude: lookup("WEATHER_LATITUDE").unwrap_or_else(|| "55.7034".to_string()),
            longitude: lookup("WEATHER_LONGITUDE").unwrap_or_else(|| "12.5823".to_string()),
            timeout: Duration::from_secs(parse_or(&lookup, "WEATHER_TIMEOUT_SECS", 10)?),
            max_retries: parse_or(&lookup, "WEATHER_MAX_RETRIES", 3)?,
            retry_delay: Duration::from_millis(parse_or(&lookup, "WEATHER_RETRY_DELAY_MS", 500)?),
        };
        if weather.max_retries == 0 {
            return Err(DashboardError::Config(
                "WEATHER_MAX_RETRIES must be at least 1".to_string(),
            ));
        }

        let tariff = tariff_from_lookup(&lookup)?;

        let output = OutputConfig {
            path: PathBuf::from(lookup("OUTPUT_PATH").unwrap_or_else(|| "out.bmp".to_string())),
            format: parse_or(&lookup, "OUTPUT_FORMAT", OutputFormat::Bmp)?,
        };

        Ok(Self {
            database_url,
            font_path,
            timezone,
            weather,
            tariff,
            output,
        })
    }
}

fn tariff_from_lookup<F>(lookup: &F) -> DashResult<TariffConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = TariffConfig::default();

    let peak_start: u32 = parse_or(lookup, "TARIFF_PEAK_START", defaults.peak_start)?;
    let peak_end: u32 = parse_or(lookup, "TARIFF_PEAK_END", defaults.peak_end)?;
    if peak_start > 23 || peak_end > 23 || peak_start > peak_end {
        return Err(DashboardError::Config(format!(
            "peak window {}-{} is not a valid range of hours",
            peak_start, peak_end
        )));
    }

    let standard = Surcharge {
        peak: parse_or(lookup, "TARIFF_PEAK_SURCHARGE", defaults.standard.peak)?,
        off_peak: parse_or(lookup, "TARIFF_OFFPEAK_SURCHARGE", defaults.standard.off_peak)?,
    };
    check_surcharge(&standard)?;

    let winter = match lookup("TARIFF_WINTER_MONTHS").filter(|v| !v.trim().is_empty()) {
        Some(months) => {
            let months = months
                .split(',')
                .map(|m| m.trim().parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DashboardError::Config(format!("TARIFF_WINTER_MONTHS: {}", e)))?;
            if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(DashboardError::Config(format!(
                    "TARIFF_WINTER_MONTHS: {} is not a month",
                    bad
                )));
            }
            let surcharge = Surcharge {
                peak: parse_or(lookup, "TARIFF_WINTER_PEAK_SURCHARGE", standard.peak)?,
                off_peak: parse_or(lookup, "TARIFF_WINTER_OFFPEAK_SURCHARGE", standard.off_peak)?,
            };
            check_surcharge(&surcharge)?;
            Some(SeasonalSurcharge { months, surcharge })
        }
        None => None,
    };

    Ok(TariffConfig {
        peak_start,
        peak_end,
        standard,
        winter,
    })
}

fn check_surcharge(surcharge: &Surcharge) -> DashResult<()> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if valid(surcharge.peak) && valid(surcharge.off_peak) {
        Ok(())
    } else {
        Err(DashboardError::Config(format!(
            "surcharges must be non-negative (peak {}, off-peak {})",
            surcharge.peak, surcharge.off_peak
        )))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> DashResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| DashboardError::Config(format!("{}: {}", key, e))),
        None => Ok(default),
    }
}
