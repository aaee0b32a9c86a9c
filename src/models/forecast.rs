//! Weather forecast models

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkyCover {
    #[default]
    Clear,
    Broken,
    Cloudy,
    Fog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precipitation {
    #[default]
    None,
    LightRain,
    HeavyRain,
    LightSleet,
    HeavySleet,
    LightSnow,
    HeavySnow,
}

/// One hour of the spot forecast
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecastPoint {
    pub hour_of_day: u32,
    /// Degrees C × 10
    pub temperature_tenths: i32,
    pub sky_cover: SkyCover,
    pub precipitation: Precipitation,
    /// Rounded mm
    pub precipitation_amount: i32,
}

/// Summary for one upcoming day
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation_sum: f64,
    pub weekend: bool,
}

impl DayForecast {
    /// "DD/MM"
    pub fn label(&self) -> String {
        self.date.format("%d/%m").to_string()
    }
}

/// The "now" block of the weather panel
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub description: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Metres
    pub visibility: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: String,
    pub precipitation: f64,
    pub day_max: f64,
    pub day_min: f64,
    pub day_precipitation: f64,
    pub uv_index: f64,
    pub sunrise: String,
    pub sunset: String,
}

impl CurrentConditions {
    /// Visibility with its unit: kilometres from 1500 m up, metres below
    pub fn visibility_text(&self) -> String {
        if self.visibility >= 1500.0 {
            format!("{:.1}km", self.visibility / 1000.0)
        } else {
            format!("{:.0}m", self.visibility)
        }
    }
}
