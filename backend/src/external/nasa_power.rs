//! NASA POWER API client for historical daily weather
//!
//! Uses the daily point endpoint with the agricultural (AG) community parameters.

use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use shared::{DailyWeather, GpsCoordinates, WeatherHistory};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const SERVICE_NAME: &str = "NASA POWER";

/// Sentinel NASA POWER uses for missing values
pub const MISSING_VALUE: f64 = -999.0;

const PRECIPITATION: &str = "PRECTOTCORR";
const TEMPERATURE: &str = "T2M";
const SOLAR_RADIATION: &str = "ALLSKY_SFC_SW_DWN";

/// NASA POWER API client
#[derive(Clone)]
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    /// Parameter name -> (YYYYMMDD -> value)
    parameter: HashMap<String, BTreeMap<String, f64>>,
}

impl NasaPowerClient {
    /// Create a client against `base_url`
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, base_url }
    }

    /// Fetch daily weather from 1 January `start_year` to 31 December `end_year`
    pub async fn fetch_daily(
        &self,
        coords: GpsCoordinates,
        start_year: i32,
        end_year: i32,
    ) -> AppResult<WeatherHistory> {
        let parameters = [PRECIPITATION, TEMPERATURE, SOLAR_RADIATION].join(",");
        let query = [
            ("parameters", parameters),
            ("community", "AG".to_string()),
            ("longitude", coords.longitude.to_string()),
            ("latitude", coords.latitude.to_string()),
            ("start", format!("{}0101", start_year)),
            ("end", format!("{}1231", end_year)),
            ("format", "JSON".to_string()),
        ];

        tracing::info!(
            "Fetching weather data from NASA POWER for lat={}, lon={}",
            coords.latitude,
            coords.longitude
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::external(SERVICE_NAME, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(
                SERVICE_NAME,
                format!("{} - {}", status, body),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::external(SERVICE_NAME, format!("reading body: {}", e)))?;

        parse_daily_response(&body, coords)
    }
}

/// The ten (or `years`) complete calendar years ending last year
pub fn default_year_range(today: NaiveDate, years: usize) -> (i32, i32) {
    let end_year = today.year() - 1;
    let start_year = end_year - years.max(1) as i32 + 1;
    (start_year, end_year)
}

/// Parse a daily point response into a weather history
pub fn parse_daily_response(body: &str, coords: GpsCoordinates) -> AppResult<WeatherHistory> {
    let data: PowerResponse = serde_json::from_str(body)
        .map_err(|e| AppError::upstream_parse(SERVICE_NAME, e.to_string()))?;

    let mut parameters = data.properties.parameter;
    let precipitation = parameters
        .remove(PRECIPITATION)
        .filter(|values| !values.is_empty())
        .ok_or_else(|| AppError::upstream_parse(SERVICE_NAME, "no precipitation data"))?;
    let temperature = parameters.remove(TEMPERATURE).unwrap_or_default();
    let solar = parameters.remove(SOLAR_RADIATION).unwrap_or_default();

    let days = precipitation
        .iter()
        .map(|(key, &mm)| {
            let date = NaiveDate::parse_from_str(key, "%Y%m%d").map_err(|_| {
                AppError::upstream_parse(SERVICE_NAME, format!("bad date key {}", key))
            })?;
            Ok(DailyWeather {
                date,
                precipitation_mm: present(mm),
                temperature_c: temperature.get(key).copied().and_then(present),
                solar_radiation: solar.get(key).copied().and_then(present),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(WeatherHistory {
        location: coords,
        source: SERVICE_NAME.to_string(),
        days,
    })
}

fn present(value: f64) -> Option<f64> {
    (value != MISSING_VALUE).then_some(value)
}
