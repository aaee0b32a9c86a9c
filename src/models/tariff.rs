//! Distribution tariff settings

/// Surcharge pair added on top of the raw spot price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surcharge {
    pub peak: f64,
    pub off_peak: f64,
}

/// Alternative surcharge used during the listed months
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalSurcharge {
    /// Calendar months (1-12)
    pub months: Vec<u32>,
    pub surcharge: Surcharge,
}

/// Peak window and surcharge tiers
#[derive(Debug, Clone, PartialEq)]
pub struct TariffConfig {
    /// First local hour of the peak window
    pub peak_start: u32,
    /// Last local hour of the peak window (inclusive)
    pub peak_end: u32,
    pub standard: Surcharge,
    pub winter: Option<SeasonalSurcharge>,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            peak_start: 17,
            peak_end: 19,
            standard: Surcharge {
                peak: 211.28,
                off_peak: 162.0,
            },
            winter: None,
        }
    }
}
