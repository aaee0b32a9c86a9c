//! Data models for the dashboard
//!
//! Value objects built fresh for every render. Each module groups the records
//! one part of the pipeline produces or consumes.

pub mod chart;
pub mod forecast;
pub mod price;
pub mod tariff;
pub mod usage;

// Re-export commonly used types for convenience
pub use chart::{AxisRange, BarSegment, Column, Rect};
pub use forecast::{CurrentConditions, DayForecast, HourlyForecastPoint, Precipitation, SkyCover};
pub use price::{PriceSample, PriceSeries};
pub use tariff::{SeasonalSurcharge, Surcharge, TariffConfig};
pub use usage::{UsageRecord, UsageSummary};
