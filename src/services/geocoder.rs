use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::GeocoderConfig;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no geocoding result for address: {0}")]
    NoResult(String),

    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

/// Location fields resolved from a free-form address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Thin client for a MapQuest-style geocoding provider. The rest of the
/// system only sees `geocode(address) -> GeoPoint`.
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Geocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let url = format!("{}/address", self.base_url);
        let body: Value = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("location", address)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let location = body
            .pointer("/results/0/locations/0")
            .ok_or_else(|| GeocodeError::NoResult(address.to_string()))?;

        let lat = location
            .pointer("/latLng/lat")
            .and_then(Value::as_f64)
            .ok_or_else(|| GeocodeError::Malformed("missing latLng.lat".to_string()))?;
        let lng = location
            .pointer("/latLng/lng")
            .and_then(Value::as_f64)
            .ok_or_else(|| GeocodeError::Malformed("missing latLng.lng".to_string()))?;

        let text = |key: &str| {
            location
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(GeoPoint {
            formatted_address: Some(address.to_string()),
            street: text("street"),
            // MapQuest admin areas: 5 = city, 3 = state, 1 = country
            city: text("adminArea5"),
            state: text("adminArea3"),
            zipcode: text("postalCode"),
            country: text("adminArea1"),
            lat,
            lng,
        })
    }
}
