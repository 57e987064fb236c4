use crate::config::PowerConfig;
use crate::error::{AppError, Result};
use crate::models::WeatherObservation;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// NASA POWER missing-value sentinel
const MISSING_VALUE: f64 = -999.0;

/// Source of daily weather observations for a point and date range.
///
/// Implementations map provider-specific field names and sentinels onto the
/// canonical [`WeatherObservation`] schema; the planner only sees `None` for
/// anything unavailable.
pub trait WeatherProvider {
    fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<BTreeMap<NaiveDate, WeatherObservation>>> + Send;
}

/// Client for the NASA POWER temporal daily point API.
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: PowerParameters,
}

/// Daily series keyed by YYYYMMDD date strings.
///
/// `PRECTOT` is the legacy name for the corrected precipitation series;
/// older deployments of the API still return it, so both are accepted.
#[derive(Debug, Deserialize)]
struct PowerParameters {
    #[serde(rename = "T2M", default)]
    temperature: HashMap<String, f64>,
    #[serde(rename = "PRECTOTCORR", alias = "PRECTOT", default)]
    precipitation: HashMap<String, f64>,
    #[serde(rename = "ALLSKY_SFC_SW_DWN", default)]
    solar_radiation: HashMap<String, f64>,
}

impl NasaPowerClient {
    pub fn new(config: &PowerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cottondrip/0.1.0")
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    async fn fetch_impl(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, WeatherObservation>> {
        let url = format!("{}/api/temporal/daily/point", self.base_url);
        debug!(
            "Fetching POWER data for ({}, {}) from {} to {}",
            latitude, longitude, start, end
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("start", start.format("%Y%m%d").to_string()),
                ("end", end.format("%Y%m%d").to_string()),
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("community", "ag".to_string()),
                (
                    "parameters",
                    "T2M,PRECTOTCORR,ALLSKY_SFC_SW_DWN".to_string(),
                ),
                ("format", "JSON".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Http(response.error_for_status().unwrap_err()));
        }

        let payload: PowerResponse = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Malformed POWER response: {}", e)))?;

        let observations = merge_series(&payload.properties.parameter)?;
        info!(
            "POWER returned {} dates for ({}, {})",
            observations.len(),
            latitude,
            longitude
        );

        Ok(observations)
    }
}

impl WeatherProvider for NasaPowerClient {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, WeatherObservation>> {
        retry_with_backoff(self.max_retries, || {
            self.fetch_impl(latitude, longitude, start, end)
        })
        .await
    }
}

/// Merge the three per-parameter series into one map keyed by date, turning
/// sentinel values into field absence.
fn merge_series(params: &PowerParameters) -> Result<BTreeMap<NaiveDate, WeatherObservation>> {
    let mut observations: BTreeMap<NaiveDate, WeatherObservation> = BTreeMap::new();

    for (key, value) in &params.temperature {
        let date = parse_power_date(key)?;
        observations.entry(date).or_default().temperature_c = screen_sentinel(*value);
    }
    for (key, value) in &params.precipitation {
        let date = parse_power_date(key)?;
        observations.entry(date).or_default().precipitation_mm = screen_sentinel(*value);
    }
    for (key, value) in &params.solar_radiation {
        let date = parse_power_date(key)?;
        observations.entry(date).or_default().solar_radiation = screen_radiation(*value);
    }

    Ok(observations)
}

fn screen_sentinel(value: f64) -> Option<f64> {
    if !value.is_finite() || (value - MISSING_VALUE).abs() < 0.1 {
        None
    } else {
        Some(value)
    }
}

/// Irradiance cannot go below zero; a negative reading is provider garbage
/// and is treated like the sentinel.
fn screen_radiation(value: f64) -> Option<f64> {
    screen_sentinel(value).filter(|v| *v >= 0.0)
}

/// Parse a POWER series key in YYYYMMDD form.
fn parse_power_date(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y%m%d")
        .map_err(|e| AppError::Parse(format!("Invalid POWER date key '{}': {}", key, e)))
}

/// Retry a future with exponential backoff
async fn retry_with_backoff<F, Fut, T>(max_retries: u32, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                retries += 1;

                if retries > max_retries {
                    return Err(e);
                }

                // Only transient transport failures are worth retrying
                let should_retry = match &e {
                    AppError::Http(reqwest_err) => {
                        reqwest_err.is_timeout()
                            || reqwest_err.is_connect()
                            || reqwest_err
                                .status()
                                .map(|s| s.is_server_error())
                                .unwrap_or(false)
                    }
                    AppError::Io(_) => true,
                    _ => false,
                };

                if !should_retry {
                    return Err(e);
                }

                let delay = Duration::from_secs(2u64.pow(retries.saturating_sub(1)));
                warn!(
                    "Request failed (attempt {}/{}): {}. Retrying in {:?}...",
                    retries, max_retries, e, delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
