use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod models;
mod services;
mod utils;

use api::dmi::WeatherClient;
use config::Config;
use services::dashboard_service::{self, HEIGHT, WIDTH};
use services::tariff_service::TariffCalculator;
use utils::{export, screen, DashResult, Screen};

/// Fetch everything, draw into memory, then write the image
async fn run(config: &Config) -> DashResult<()> {
    screen::load_font(&config.font_path)?;

    info!("Opening database...");
    let pool = db::init_db(&config.database_url).await?;
    let calculator = TariffCalculator::new(config.tariff.clone(), config.timezone);

    info!("Fetching weather forecast...");
    let client = WeatherClient::new(&config.weather)?;
    let forecast = client
        .fetch(&config.weather.latitude, &config.weather.longitude)
        .await?;

    let inputs = dashboard_service::gather(&pool, &calculator, &forecast, Utc::now()).await?;
    pool.close().await;

    let mut buffer = vec![255u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let mut screen = Screen::new(&mut buffer, WIDTH, HEIGHT)?;
        dashboard_service::render(&mut screen, &inputs)?;
        screen.present()?;
    }

    export::write_output(&config.output.path, config.output.format, WIDTH, HEIGHT, &buffer)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["paper_dash=info", "sqlx=warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Rendering paper-dash v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&config).await {
        error!("Render failed: {}", e);
        std::process::exit(1);
    }
}
