//! SoilGrids API client for topsoil properties

use reqwest::Client;
use serde::Deserialize;
use shared::{GpsCoordinates, SoilProperties};
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const SERVICE_NAME: &str = "SoilGrids";

/// Topsoil depth interval requested from SoilGrids
const DEPTH: &str = "0-5cm";

/// SoilGrids stores integers scaled by 10: clay/sand g/kg -> %, pH*10 -> pH, soc dg/kg -> g/kg
const CONVERSION_FACTOR: f64 = 10.0;

const PROPERTIES: [&str; 4] = ["clay", "sand", "phh2o", "soc"];

/// SoilGrids API client
#[derive(Clone)]
pub struct SoilGridsClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SoilGridsResponse {
    properties: SoilGridsProperties,
}

#[derive(Debug, Deserialize)]
struct SoilGridsProperties {
    #[serde(default)]
    layers: Vec<SoilLayer>,
}

#[derive(Debug, Deserialize)]
struct SoilLayer {
    name: String,
    #[serde(default)]
    depths: Vec<SoilDepth>,
}

#[derive(Debug, Deserialize)]
struct SoilDepth {
    values: SoilValues,
}

#[derive(Debug, Deserialize)]
struct SoilValues {
    mean: Option<f64>,
}

impl SoilGridsClient {
    /// Create a client against `base_url`
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, base_url }
    }

    /// Fetch mean topsoil properties at a point
    pub async fn fetch_properties(&self, coords: GpsCoordinates) -> AppResult<SoilProperties> {
        let mut query: Vec<(&str, String)> = vec![
            ("lon", coords.longitude.to_string()),
            ("lat", coords.latitude.to_string()),
        ];
        query.extend(PROPERTIES.iter().map(|p| ("property", p.to_string())));
        query.push(("depth", DEPTH.to_string()));
        query.push(("value", "mean".to_string()));

        tracing::info!(
            "Fetching soil data from SoilGrids for lat={}, lon={}",
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

        parse_properties_response(&body)
    }
}

/// Parse a properties query response
///
/// Every requested property must carry a mean for the first depth interval.
pub fn parse_properties_response(body: &str) -> AppResult<SoilProperties> {
    let data: SoilGridsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::upstream_parse(SERVICE_NAME, e.to_string()))?;

    let layers = data.properties.layers;
    let value_of = |name: &str| -> AppResult<f64> {
        layers
            .iter()
            .find(|layer| layer.name == name)
            .and_then(|layer| layer.depths.first())
            .and_then(|depth| depth.values.mean)
            .map(|mean| mean / CONVERSION_FACTOR)
            .ok_or_else(|| {
                AppError::upstream_parse(SERVICE_NAME, format!("missing soil property {}", name))
            })
    };

    Ok(SoilProperties {
        clay_content: value_of("clay")?,
        sand_content: value_of("sand")?,
        ph_level: value_of("phh2o")?,
        organic_carbon: value_of("soc")?,
    })
}
