use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::{Surcharge, TariffConfig};

/// Adds distribution costs to raw spot prices
#[derive(Debug, Clone)]
pub struct TariffCalculator {
    config: TariffConfig,
    timezone: Tz,
}

impl TariffCalculator {
    pub fn new(config: TariffConfig, timezone: Tz) -> Self {
        Self { config, timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Final unrounded price for the slot starting at `timestamp`
    pub fn tariff(&self, raw_price: f64, timestamp: DateTime<Utc>) -> f64 {
        let local = timestamp.with_timezone(&self.timezone);
        let surcharge = self.surcharge_for_month(local.month());

        if (self.config.peak_start..=self.config.peak_end).contains(&local.hour()) {
            raw_price + surcharge.peak
        } else {
            raw_price + surcharge.off_peak
        }
    }

    fn surcharge_for_month(&self, month: u32) -> &Surcharge {
        match &self.config.winter {
            Some(winter) if winter.months.contains(&month) => &winter.surcharge,
            _ => &self.config.standard,
        }
    }
}

/// Round a final price for display (half away from zero)
pub fn round_price(price: f64) -> i64 {
    price.round() as i64
}
