//! Azure Maps REST client
//!
//! Implements the three remote calls the assistant's tools are built on:
//! address geocoding, nearby POI search, and the asynchronous route-matrix
//! job. The client requires a non-empty subscription key at construction
//! time, so a missing credential fails before any network I/O exists.

use std::env;

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{BistroError, Result};

/// Production Azure Maps host
pub const DEFAULT_BASE_URL: &str = "https://atlas.microsoft.com";

/// Maximum number of POIs returned by a nearby search
const NEARBY_LIMIT: u32 = 10;

/// Nearby search radius in meters (8046 m ≈ 5 miles)
const NEARBY_RADIUS_METERS: u32 = 8046;

/// API version sent with every request
const API_VERSION: &str = "1.0";

/// A geographic position, always latitude first
///
/// Every public signature in this crate takes coordinates in (latitude,
/// longitude) order; this struct keeps the order visible at call sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Client for the Azure Maps REST endpoints
pub struct MapsClient {
    client: Client,
    base_url: String,
    subscription_key: String,
}

impl MapsClient {
    /// Create a client reading the subscription key from the named
    /// environment variable
    ///
    /// Fails with a config error before any request is made when the
    /// variable is unset or empty.
    pub fn from_env(base_url: impl Into<String>, key_env: &str) -> Result<Self> {
        let key = env::var(key_env).unwrap_or_default();
        if key.is_empty() {
            return Err(BistroError::Config(format!(
                "Subscription key not found: set the '{}' environment variable",
                key_env
            )));
        }
        Self::with_key(base_url, key)
    }

    /// Create a client with an explicit subscription key
    pub fn with_key(base_url: impl Into<String>, subscription_key: impl Into<String>) -> Result<Self> {
        let subscription_key = subscription_key.into();
        if subscription_key.is_empty() {
            return Err(BistroError::Config("Subscription key must not be empty".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(BistroError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            subscription_key,
        })
    }

    /// Resolve a free-text address query to address candidates
    ///
    /// Single GET against `/search/address/json`; the query is URL-encoded
    /// by the query-string builder. Any transport failure, non-2xx status,
    /// or unparsable body surfaces immediately.
    pub async fn geocode(&self, query: &str) -> Result<Value> {
        let url = format!("{}/search/address/json", self.base_url);
        log::debug!("GET {} query={:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api-version", API_VERSION),
                ("query", query),
                ("subscription-key", self.subscription_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_document(status, &body)
    }

    /// List POIs of one category around a position
    ///
    /// Fixed result limit and radius; `category_id` is passed through to
    /// the service unvalidated, so an unknown id surfaces whatever the
    /// service answers.
    pub async fn nearby_search(&self, position: Coordinate, category_id: &str) -> Result<Value> {
        let url = format!("{}/search/nearby/json", self.base_url);
        log::debug!(
            "GET {} lat={} lon={} categorySet={}",
            url,
            position.lat,
            position.lon,
            category_id
        );

        let lat = position.lat.to_string();
        let lon = position.lon.to_string();
        let limit = NEARBY_LIMIT.to_string();
        let radius = NEARBY_RADIUS_METERS.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api-version", API_VERSION),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("limit", limit.as_str()),
                ("radius", radius.as_str()),
                ("subscription-key", self.subscription_key.as_str()),
                ("categorySet", category_id),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_document(status, &body)
    }

    /// Compute travel distance/time between an origin and a destination
    ///
    /// The route-matrix endpoint is an asynchronous job API: the submit
    /// POST answers 202 with a `Location` header naming the result URL,
    /// which is then fetched with a single GET and must answer 200. There
    /// is no wait between the two steps; a job that is not instantly
    /// complete surfaces as a remote error.
    pub async fn route_matrix(&self, origin: Coordinate, destination: Coordinate) -> Result<Value> {
        let url = format!("{}/route/matrix/json", self.base_url);
        let body = route_matrix_body(origin, destination);
        log::debug!("POST {} body={}", url, body);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("api-version", API_VERSION),
                ("routeType", "shortest"),
                ("subscription-key", self.subscription_key.as_str()),
            ])
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let submit_body = response.text().await?;

        let result_url = result_url(status, location.as_deref(), &submit_body)?;
        log::debug!("GET {}", result_url);

        let result = self.client.get(&result_url).send().await?;
        let status = result.status().as_u16();
        let body = result.text().await?;
        parse_result(status, &body)
    }
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Build the one-origin/one-destination MultiPoint request body
///
/// The service consumes coordinate pairs as `[lat, lon]` arrays.
fn route_matrix_body(origin: Coordinate, destination: Coordinate) -> Value {
    json!({
        "origins": {
            "type": "MultiPoint",
            "coordinates": [[origin.lat, origin.lon]]
        },
        "destinations": {
            "type": "MultiPoint",
            "coordinates": [[destination.lat, destination.lon]]
        }
    })
}

/// Parse a synchronous search response: any 2xx with a JSON body
fn parse_document(status: u16, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        log::warn!("Maps API answered {}: {}", status, body);
        return Err(BistroError::Remote {
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// Extract the result URL from the route-matrix submit response
///
/// The submit step must answer exactly 202 and carry a `Location` header.
fn result_url(status: u16, location: Option<&str>, body: &str) -> Result<String> {
    if status != 202 {
        log::warn!("Route matrix submit answered {}: {}", status, body);
        return Err(BistroError::Remote {
            status,
            body: body.to_string(),
        });
    }
    match location {
        Some(url) if !url.is_empty() => Ok(url.to_string()),
        _ => Err(BistroError::Remote {
            status,
            body: "Location header not found in the response".to_string(),
        }),
    }
}

/// Parse the route-matrix result fetch: must be exactly 200
fn parse_result(status: u16, body: &str) -> Result<Value> {
    if status != 200 {
        log::warn!("Route matrix result answered {}: {}", status, body);
        return Err(BistroError::Remote {
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}
