//! Electricity price models

use chrono::{DateTime, Utc};

/// One hourly spot price row, before distribution costs
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub valid_from: DateTime<Utc>,
    pub raw_price: f64,
}

/// Rolling hourly price series for the cost chart
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// Rounded final prices, one per slot
    pub prices: Vec<i64>,
    /// Local hour of day of each slot
    pub slot_hours: Vec<u32>,
    /// Slot holding the current hour; earlier slots are in the past
    pub current_index: usize,
}

impl PriceSeries {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn max_price(&self) -> Option<i64> {
        self.prices.iter().copied().max()
    }
}
