//! Metered consumption models

use chrono::{DateTime, Utc};

/// One metered interval
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub interval_start: DateTime<Utc>,
    pub interval_end: DateTime<Utc>,
    /// kWh consumed; zero means the meter did not report
    pub amount: f64,
}

/// Consumption, cost and efficiency over a window of days
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSummary {
    pub period_label: String,
    pub total_amount: f64,
    pub total_cost: f64,
    /// `None` when the window has no priced consumption
    pub efficiency_percent: Option<f64>,
}

impl UsageSummary {
    pub fn empty(period_label: impl Into<String>) -> Self {
        Self {
            period_label: period_label.into(),
            total_amount: 0.0,
            total_cost: 0.0,
            efficiency_percent: None,
        }
    }

    /// kWh with two decimals
    pub fn amount_text(&self) -> String {
        format!("{:.2}KWh", self.total_amount)
    }

    /// Cost in major currency units (prices are stored in 1/100ths)
    pub fn cost_text(&self) -> String {
        format!("{:.2} kr", self.total_cost / 100.0)
    }

    pub fn efficiency_text(&self) -> String {
        match self.efficiency_percent {
            Some(pct) => format!("{:.0}%", pct),
            None => "n/a".to_string(),
        }
    }
}
