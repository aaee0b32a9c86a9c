use thiserror::Error;

use crate::api::dmi::WeatherError;

/// Fatal errors that abort a render before any output is written
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Weather feed error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Drawing failed: {0}")]
    Render(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type DashResult<T> = Result<T, DashboardError>;

impl DashboardError {
    /// Wrap any drawing backend error
    pub fn render(e: impl std::fmt::Display) -> Self {
        DashboardError::Render(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_stage() {
        let err = DashboardError::Config("TARIFF_PEAK_START must be 0-23".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: TARIFF_PEAK_START must be 0-23"
        );

        let err = DashboardError::render("backend gone");
        assert!(err.to_string().starts_with("Drawing failed"));
    }
}
