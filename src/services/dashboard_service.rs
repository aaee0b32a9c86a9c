use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePool;
use tracing::info;

use crate::api::dmi::Forecast;
use crate::models::{CurrentConditions, DayForecast, HourlyForecastPoint, PriceSeries, UsageSummary};
use crate::services::tariff_service::TariffCalculator;
use crate::services::{chart_service, price_service, usage_service};
use crate::utils::canvas::{Axis, Canvas, Colour, FontSize};
use crate::utils::date::ordinal_date;
use crate::utils::errors::DashResult;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 480;

/// Everything drawn on one dashboard
#[derive(Debug, Clone)]
pub struct DashboardInputs {
    /// Local date for the title
    pub date: NaiveDate,
    /// Local time of the render, already formatted
    pub generated_at: String,
    pub current_cost: i64,
    pub prices: PriceSeries,
    pub last_week: UsageSummary,
    pub previous_day: UsageSummary,
    pub latest_day: UsageSummary,
    pub conditions: CurrentConditions,
    pub days: Vec<DayForecast>,
    pub hours: Vec<HourlyForecastPoint>,
}

/// Run every query and derive every view before anything is drawn
pub async fn gather(
    pool: &SqlitePool,
    calculator: &TariffCalculator,
    forecast: &Forecast,
    now: DateTime<Utc>,
) -> DashResult<DashboardInputs> {
    let local_now = now.with_timezone(&calculator.timezone());

    let current_cost = price_service::current_cost(pool, calculator, now).await?;
    let prices = price_service::build_series(pool, calculator, now).await?;
    let last_week = usage_service::aggregate(pool, calculator, 0, 7).await?;
    let previous_day = usage_service::aggregate(pool, calculator, 1, 1).await?;
    let latest_day = usage_service::aggregate(pool, calculator, 0, 1).await?;

    let inputs = DashboardInputs {
        date: local_now.date_naive(),
        generated_at: local_now.format("%Y-%m-%d %H:%M:%S").to_string(),
        current_cost,
        prices,
        last_week,
        previous_day,
        latest_day,
        conditions: forecast.current_conditions(),
        days: forecast.day_forecasts()?,
        hours: forecast.hour_forecast()?,
    };
    info!(
        "Gathered {} price slots, {} forecast hours, current cost {}",
        inputs.prices.prices.len(),
        inputs.hours.len(),
        inputs.current_cost
    );
    Ok(inputs)
}

/// Draw the whole dashboard
pub fn render<C: Canvas>(canvas: &mut C, inputs: &DashboardInputs) -> DashResult<()> {
    let width = canvas.width();
    let height = canvas.height();

    // title bar and footer rule
    canvas.fill_rect(0, 0, width, 50, Colour::Black)?;
    canvas.draw_line(Axis::Horizontal, height - 20, 0, width)?;
    canvas.draw_text(&ordinal_date(inputs.date), width / 2, 25, Colour::White, FontSize::Large)?;
    canvas.draw_text(&inputs.conditions.sunrise, width / 8, 25, Colour::White, FontSize::Normal)?;
    canvas.draw_text(&inputs.conditions.sunset, 7 * width / 8, 25, Colour::White, FontSize::Normal)?;

    draw_electricity(canvas, inputs)?;
    draw_current_weather(canvas, &inputs.conditions)?;
    draw_day_forecasts(canvas, &inputs.days)?;
    chart_service::draw_weather_graph(canvas, &inputs.hours)?;

    canvas.draw_text(&inputs.generated_at, width / 2, height - 10, Colour::Black, FontSize::Normal)?;
    Ok(())
}

fn draw_electricity<C: Canvas>(canvas: &mut C, inputs: &DashboardInputs) -> DashResult<()> {
    canvas.fill_rect(404, 55, 692, 85, Colour::Black)?;
    canvas.draw_text("Current KWh Cost", 548, 70, Colour::White, FontSize::Normal)?;
    canvas.draw_text(&inputs.current_cost.to_string(), 750, 70, Colour::Black, FontSize::Large)?;

    chart_service::draw_price_chart(canvas, &inputs.prices)?;

    // usage panel covers the foot of the price bars
    canvas.fill_rect(420, 345, 780, 450, Colour::White)?;
    let columns = [
        (482, "Last 7 days", &inputs.last_week),
        (600, inputs.previous_day.period_label.as_str(), &inputs.previous_day),
        (718, inputs.latest_day.period_label.as_str(), &inputs.latest_day),
    ];
    for (x, label, summary) in columns {
        canvas.fill_rect(x - 52, 350, x + 53, 370, Colour::Black)?;
        canvas.draw_text(label, x, 360, Colour::White, FontSize::Normal)?;
        canvas.draw_text(&summary.amount_text(), x, 385, Colour::Black, FontSize::Normal)?;
        canvas.draw_text(&summary.cost_text(), x, 410, Colour::Black, FontSize::Normal)?;
        canvas.draw_text(&summary.efficiency_text(), x, 435, Colour::Black, FontSize::Normal)?;
    }
    Ok(())
}

fn draw_current_weather<C: Canvas>(canvas: &mut C, now: &CurrentConditions) -> DashResult<()> {
    let large = FontSize::Large;

    canvas.draw_text(&now.description, 100, 80, Colour::Black, large)?;
    canvas.draw_line(Axis::Horizontal, 110, 4, 192)?;
    canvas.draw_text(
        &format!("{:.1}m/s ({})", now.wind_speed, now.wind_direction),
        100,
        150,
        Colour::Black,
        large,
    )?;
    canvas.fill_rect(4, 168, 196, 188, Colour::Black)?;
    canvas.draw_text(&format!("{:.1}m/s gusts", now.wind_gust), 100, 178, Colour::White, FontSize::Normal)?;

    canvas.draw_text(&format!("{:.1}°C", now.temperature), 250, 75, Colour::Black, large)?;
    canvas.fill_rect(202, 90, 298, 110, Colour::Black)?;
    canvas.draw_text(
        &format!("{:.0} / {:.0}°C", now.day_max, now.day_min),
        250,
        100,
        Colour::White,
        FontSize::Normal,
    )?;

    canvas.draw_text(&format!("{:.0}mm", now.precipitation), 350, 75, Colour::Black, large)?;
    canvas.fill_rect(302, 90, 398, 110, Colour::Black)?;
    canvas.draw_text(&format!("{:.1}mm", now.day_precipitation), 350, 100, Colour::White, FontSize::Normal)?;

    canvas.draw_text(&format!("{:.0}%", now.humidity), 250, 135, Colour::Black, large)?;
    canvas.draw_line(Axis::Horizontal, 152, 202, 96)?;
    canvas.draw_text(&format!("UV {:.1}", now.uv_index), 350, 135, Colour::Black, large)?;
    canvas.draw_line(Axis::Horizontal, 152, 302, 96)?;

    canvas.draw_text(&now.visibility_text(), 250, 170, Colour::Black, large)?;
    canvas.draw_line(Axis::Horizontal, 187, 202, 96)?;
    canvas.draw_text(&format!("{:.0}", now.pressure), 350, 170, Colour::Black, large)?;
    canvas.draw_line(Axis::Horizontal, 187, 302, 96)?;
    Ok(())
}

/// Five 80 px wide day cells; weekends invert the body instead of the header
fn draw_day_forecasts<C: Canvas>(canvas: &mut C, days: &[DayForecast]) -> DashResult<()> {
    let y = 390;
    let mut x = 40;
    for day in days {
        let (header, body) = if day.weekend {
            canvas.fill_rect(x - 39, y + 20, x + 39, y + 60, Colour::Black)?;
            (Colour::Black, Colour::White)
        } else {
            canvas.fill_rect(x - 39, y, x + 39, y + 20, Colour::Black)?;
            (Colour::White, Colour::Black)
        };

        canvas.draw_text(&day.label(), x, y + 10, header, FontSize::Normal)?;
        canvas.draw_text(
            &format!("{:.0} / {:.0}°C", day.temp_max, day.temp_min),
            x,
            y + 30,
            body,
            FontSize::Normal,
        )?;
        canvas.draw_text(&format!("{:.1} mm", day.precipitation_sum), x, y + 50, body, FontSize::Normal)?;
        x += 80;
    }
    Ok(())
}
