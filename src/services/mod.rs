pub mod chart_service;
pub mod dashboard_service;
pub mod forecast_service;
pub mod price_service;
pub mod tariff_service;
pub mod usage_service;
