use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{PlaceLabel, PlaceResolver};
use crate::config::GeocoderConfig;
use crate::coords::DecimalCoordinate;
use crate::error::ResolveError;

/// Body of Nominatim's answer when no place exists at a coordinate (open sea, etc.).
const UNABLE_TO_GEOCODE: &str = "Unable to geocode";

/// Reverse geocoding against an OpenStreetMap Nominatim `/reverse` endpoint.
pub struct NominatimResolver {
    endpoint: String,
    language: Option<String>,
    zoom: Option<u8>,
    client: Client,
}

impl NominatimResolver {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            zoom: config.zoom,
            client,
        })
    }
}

#[async_trait::async_trait]
impl PlaceResolver for NominatimResolver {
    fn name(&self) -> &str {
        "Nominatim"
    }

    async fn reverse_geocode(
        &self,
        coord: DecimalCoordinate,
    ) -> Result<Option<PlaceLabel>, ResolveError> {
        let mut query = vec![
            ("format", "jsonv2".to_string()),
            ("lat", coord.latitude.to_string()),
            ("lon", coord.longitude.to_string()),
        ];
        if let Some(zoom) = self.zoom {
            query.push(("zoom", zoom.to_string()));
        }

        let mut request = self.client.get(&self.endpoint).query(&query);
        if let Some(ref language) = self.language {
            request = request.header("Accept-Language", language.as_str());
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ResolveError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_reverse_response(&text)
    }
}

/// Parse the JSON body of a Nominatim reverse lookup.
///
/// Returns the `display_name`, `None` for "Unable to geocode", and an error
/// for any other reported failure.
pub fn parse_reverse_response(text: &str) -> Result<Option<PlaceLabel>, ResolveError> {
    let json: Value =
        serde_json::from_str(text).map_err(|e| ResolveError::Decode(e.to_string()))?;

    if let Some(name) = json["display_name"].as_str() {
        return Ok(Some(PlaceLabel::new(name)));
    }

    match &json["error"] {
        Value::String(msg) if msg == UNABLE_TO_GEOCODE => Ok(None),
        Value::String(msg) => Err(ResolveError::Service(msg.clone())),
        Value::Object(obj) => {
            let msg = obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            Err(ResolveError::Service(msg.to_string()))
        }
        _ => Err(ResolveError::Decode(
            "response has neither display_name nor error".to_string(),
        )),
    }
}
