use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, error, warn};

use super::models::{DmiData, Forecast, WeatherError};
use crate::config::WeatherConfig;

/// Client for the DMI point forecast feed
pub struct WeatherClient {
    http_client: HttpClient,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay,
        })
    }

    /// Fetch and validate the forecast for a location
    pub async fn fetch(&self, latitude: &str, longitude: &str) -> Result<Forecast, WeatherError> {
        debug!("Fetching forecast for lat {} lon {}", latitude, longitude);

        let response = self
            .retry_request(|| async {
                self.http_client
                    .get(&self.base_url)
                    .query(&[("cmd", "llj"), ("lon", longitude), ("lat", latitude)])
                    .send()
                    .await
            })
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Weather feed returned {}: {}", status, body);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: DmiData = serde_json::from_str(&body)?;
        Forecast::new(data)
    }

    /// Retry transport failures and overloaded responses with a doubling delay.
    /// The last response is returned as is once the attempts run out.
    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> Result<reqwest::Response, WeatherError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) if is_retryable(response.status()) && attempts < self.max_retries => {
                    warn!(
                        "Weather feed returned {} (attempt {}/{}). Retrying in {:?}",
                        response.status(),
                        attempts,
                        self.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("Weather request failed after {} attempts: {}", attempts, e);
                    return Err(WeatherError::Request(e));
                }
                Err(e) => {
                    warn!(
                        "Weather request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempts, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
