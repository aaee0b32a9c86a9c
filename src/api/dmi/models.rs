use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{CurrentConditions, DayForecast, HourlyForecastPoint};
use crate::services::forecast_service;

/// Hours of spot forecast drawn on the graph
pub const HOURLY_POINTS: usize = 48;
/// Today plus the five days of the forecast strip
pub const DAILY_AGGREGATES: usize = 6;

/// Top level DMI "llj" document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmiData {
    pub sunrise: String,
    pub sunset: String,
    pub timeserie: Vec<TimeSerie>,
    pub agg_data: Vec<AggData>,
}

/// One hourly entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSerie {
    /// yyyyMMddHHmmss
    pub time: String,
    pub temp: f64,
    pub symbol: i64,
    pub precip1: f64,
    pub wind_dir: Option<String>,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub visibility: f64,
}

/// One daily aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggData {
    /// yyyyMMdd
    pub time: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub precip_sum: f64,
    pub uv_radiation: f64,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed weather document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Incomplete weather document: {0}")]
    Incomplete(String),
}

/// A validated forecast document
#[derive(Debug, Clone)]
pub struct Forecast {
    data: DmiData,
}

impl Forecast {
    /// Check the document carries enough hourly and daily entries
    pub fn new(data: DmiData) -> Result<Self, WeatherError> {
        if data.timeserie.len() < HOURLY_POINTS {
            return Err(WeatherError::Incomplete(format!(
                "expected {} hourly entries, got {}",
                HOURLY_POINTS,
                data.timeserie.len()
            )));
        }
        if data.agg_data.len() < DAILY_AGGREGATES {
            return Err(WeatherError::Incomplete(format!(
                "expected {} daily aggregates, got {}",
                DAILY_AGGREGATES,
                data.agg_data.len()
            )));
        }
        Ok(Self { data })
    }

    pub fn current_conditions(&self) -> CurrentConditions {
        let now = &self.data.timeserie[0];
        let today = &self.data.agg_data[0];

        CurrentConditions {
            description: forecast_service::describe(now.symbol),
            temperature: now.temp,
            humidity: now.humidity,
            pressure: now.pressure,
            visibility: now.visibility,
            wind_speed: now.wind_speed,
            wind_gust: now.wind_gust,
            wind_direction: now.wind_dir.clone().unwrap_or_default(),
            precipitation: now.precip1,
            day_max: today.max_temp,
            day_min: today.min_temp,
            day_precipitation: today.precip_sum,
            uv_index: today.uv_radiation,
            sunrise: clock_time(&self.data.sunrise),
            sunset: clock_time(&self.data.sunset),
        }
    }

    /// The next 48 hours starting with the current one
    pub fn hour_forecast(&self) -> Result<Vec<HourlyForecastPoint>, WeatherError> {
        self.data.timeserie[..HOURLY_POINTS]
            .iter()
            .map(|entry| {
                let hour_of_day = entry
                    .time
                    .get(8..10)
                    .and_then(|h| h.parse::<u32>().ok())
                    .filter(|h| *h < 24)
                    .ok_or_else(|| WeatherError::Incomplete(format!("bad hourly timestamp '{}'", entry.time)))?;
                let (sky_cover, precipitation) = forecast_service::classify(entry.symbol);

                Ok(HourlyForecastPoint {
                    hour_of_day,
                    temperature_tenths: (entry.temp * 10.0).round() as i32,
                    sky_cover,
                    precipitation,
                    precipitation_amount: entry.precip1.round() as i32,
                })
            })
            .collect()
    }

    /// Summaries for the five days after today
    pub fn day_forecasts(&self) -> Result<Vec<DayForecast>, WeatherError> {
        self.data.agg_data[1..DAILY_AGGREGATES]
            .iter()
            .map(|day| {
                let date = day
                    .time
                    .get(..8)
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())
                    .ok_or_else(|| WeatherError::Incomplete(format!("bad daily timestamp '{}'", day.time)))?;

                Ok(DayForecast {
                    date,
                    temp_max: day.max_temp,
                    temp_min: day.min_temp,
                    precipitation_sum: day.precip_sum,
                    weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                })
            })
            .collect()
    }
}

/// "812" -> "08:12", "1630" -> "16:30"
fn clock_time(raw: &str) -> String {
    if raw.is_empty() || raw.len() > 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        warn!("Unexpected sun time '{}'", raw);
        return raw.to_string();
    }
    let padded = format!("{:0>4}", raw);
    format!("{}:{}", &padded[..2], &padded[2..])
}


#[cfg(test)]
mod tests {
    use super::fixtures::dmi_document;
    use super::*;
    use crate::models::{Precipitation, SkyCover};

    fn forecast() -> Forecast {
        let data: DmiData = serde_json::from_value(dmi_document(60, 10)).unwrap();
        Forecast::new(data).unwrap()
    }

    #[test]
    fn test_rejects_short_documents() {
        let data: DmiData = serde_json::from_value(dmi_document(47, 10)).unwrap();
        assert!(matches!(Forecast::new(data), Err(WeatherError::Incomplete(_))));

        let data: DmiData = serde_json::from_value(dmi_document(48, 5)).unwrap();
        assert!(matches!(Forecast::new(data), Err(WeatherError::Incomplete(_))));

        let data: DmiData = serde_json::from_value(dmi_document(48, 6)).unwrap();
        assert!(Forecast::new(data).is_ok());
    }

    #[test]
    fn test_current_conditions() {
        let now = forecast().current_conditions();
        assert_eq!(now.description, "Cloudy");
        assert_eq!(now.wind_direction, "SW");
        assert_eq!(now.sunrise, "08:38");
        assert_eq!(now.sunset, "15:51");
        assert_eq!(now.day_max, 4.0);
        assert_eq!(now.visibility_text(), "1200m");
    }

    #[test]
    fn test_hour_forecast() {
        let hours = forecast().hour_forecast().unwrap();
        assert_eq!(hours.len(), 48);
        assert_eq!(hours[0].hour_of_day, 22);
        assert_eq!(hours[2].hour_of_day, 0);
        assert_eq!(hours[0].temperature_tenths, 20);
        assert_eq!(hours[1].temperature_tenths, 21);
        assert_eq!(hours[0].precipitation_amount, 1);
        assert_eq!(hours[1].sky_cover, SkyCover::Broken);
        assert_eq!(hours[1].precipitation, Precipitation::LightRain);
    }

    #[test]
    fn test_bad_hour_is_an_error() {
        let mut doc = dmi_document(48, 6);
        doc["timeserie"][3]["time"] = "2024".into();
        let data: DmiData = serde_json::from_value(doc).unwrap();
        let forecast = Forecast::new(data).unwrap();
        assert!(forecast.hour_forecast().is_err());
    }

    #[test]
    fn test_day_forecasts_flag_weekends() {
        let days = forecast().day_forecasts().unwrap();
        assert_eq!(days.len(), 5);
        // 5th January 2024 is a Friday
        assert_eq!(days[0].label(), "05/01");
        let weekend: Vec<bool> = days.iter().map(|d| d.weekend).collect();
        assert_eq!(weekend, vec![false, true, true, false, false]);
        assert_eq!(days[1].temp_min, -3.0);
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time("812"), "08:12");
        assert_eq!(clock_time("1630"), "16:30");
        assert_eq!(clock_time("5"), "00:05");
        assert_eq!(clock_time("n/a"), "n/a");
    }
}
