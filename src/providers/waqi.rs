//! WAQI air-quality provider client
//!
//! City feed lookups are cached with a short jittered TTL; bounding-box
//! station searches degrade to an empty list on failure since sparse or
//! missing station coverage is an expected outcome, not an error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::RngExt;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::AirImpactError;
use crate::cache::PersistentCache;
use crate::config::AqiProviderConfig;
use crate::models::aqi::{AqiCategory, AqiObservation, Pollutants, StationReading};
use crate::models::geo::{BoundingBox, GeoPoint};
use crate::providers::http_client;

const SERVICE_NAME: &str = "WAQI";

pub struct WaqiClient {
    http: ClientWithMiddleware,
    base_url: String,
    token: String,
    cache: Arc<PersistentCache>,
    cache_ttl: Duration,
}

impl WaqiClient {
    pub fn new(
        config: &AqiProviderConfig,
        token: String,
        cache: Arc<PersistentCache>,
    ) -> Result<Self> {
        Ok(Self {
            http: http_client(config.timeout_seconds, config.max_retries)?,
            base_url: config.base_url.clone(),
            token,
            cache,
            cache_ttl: Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60),
        })
    }

    /// Current observation for a city, served from cache when fresh.
    #[instrument(skip(self))]
    pub async fn city_feed(&self, city: &str) -> Result<AqiObservation> {
        let key = format!("aqi:{}", city.trim().to_lowercase());

        if let Some(cached) = self.cache.get::<AqiObservation>(&key).await? {
            debug!("Cache hit for {city}");
            return Ok(cached);
        }

        let url = format!(
            "{}/feed/{}/?token={}",
            self.base_url,
            urlencoding::encode(city.trim()),
            self.token
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AirImpactError::upstream(SERVICE_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AirImpactError::upstream(
                SERVICE_NAME,
                format!("HTTP {}", response.status()),
            )
            .into());
        }

        let feed: FeedResponse = response.json().await.map_err(|e| {
            AirImpactError::upstream(SERVICE_NAME, format!("malformed feed payload: {e}"))
        })?;

        if feed.status != "ok" {
            return Err(AirImpactError::upstream(
                SERVICE_NAME,
                format!("provider returned status '{}'", feed.status),
            )
            .into());
        }

        let data = feed.data.ok_or_else(|| {
            AirImpactError::upstream(SERVICE_NAME, "feed response missing data")
        })?;

        let index = parse_index(&data.aqi).ok_or_else(|| {
            AirImpactError::upstream(SERVICE_NAME, "feed response has no numeric AQI")
        })?;

        let observation = AqiObservation {
            city: city.to_string(),
            index,
            category: AqiCategory::from_index(index),
            dominant_pollutant: data
                .dominentpol
                .unwrap_or_else(|| "PM2.5".to_string()),
            pollutants: data
                .iaqi
                .map(|iaqi| Pollutants {
                    pm25: iaqi.pm25.map(|v| v.v),
                    pm10: iaqi.pm10.map(|v| v.v),
                    o3: iaqi.o3.map(|v| v.v),
                    no2: iaqi.no2.map(|v| v.v),
                    so2: iaqi.so2.map(|v| v.v),
                    co: iaqi.co.map(|v| v.v),
                })
                .unwrap_or_default(),
            timestamp: data
                .time
                .and_then(|t| t.iso)
                .and_then(|iso| DateTime::parse_from_rfc3339(&iso).ok())
                .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc)),
            source: SERVICE_NAME.to_string(),
        };

        // Jitter the TTL so a burst of lookups doesn't expire all at once
        let jitter: f32 = rand::rng().random_range(0.9..1.1);
        let ttl = Duration::from_secs((self.cache_ttl.as_secs() as f32 * jitter) as u64);
        self.cache.put(&key, observation.clone(), ttl).await?;

        Ok(observation)
    }

    /// Station readings inside a bounding box.
    ///
    /// An empty result is valid and expected; transport or payload failures
    /// also degrade to the empty list (logged) since the aggregation core
    /// has its own documented fallback.
    #[instrument(skip(self))]
    pub async fn stations_in_bounds(&self, bounds: &BoundingBox) -> Vec<StationReading> {
        match self.fetch_stations(bounds).await {
            Ok(stations) => {
                debug!("Found {} AQI stations", stations.len());
                stations
            }
            Err(e) => {
                warn!("Station search failed, continuing without stations: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_stations(&self, bounds: &BoundingBox) -> Result<Vec<StationReading>> {
        let url = format!(
            "{}/v2/map/bounds/?latlng={},{},{},{}&token={}",
            self.base_url,
            bounds.min_lat,
            bounds.min_lng,
            bounds.max_lat,
            bounds.max_lng,
            self.token
        );

        let response: BoundsResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .with_context(|| "Failed to parse WAQI bounds response")?;

        if response.status != "ok" {
            return Err(AirImpactError::upstream(
                SERVICE_NAME,
                format!("bounds search returned status '{}'", response.status),
            )
            .into());
        }

        // Stations without a numeric reading ("-") are dropped
        let stations = response
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|station| {
                let index = parse_index(&station.aqi)?;
                Some(StationReading::new(
                    GeoPoint::new(station.lat, station.lon),
                    index,
                    station.station.name,
                ))
            })
            .collect();

        Ok(stations)
    }
}

/// WAQI reports the index either as a number or as a string (sometimes "-"
/// for stations that are offline). Clamped to the 0-500 scale.
fn parse_index(raw: &serde_json::Value) -> Option<u16> {
    let value = match raw {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !value.is_finite() {
        return None;
    }

    Some(value.round().clamp(0.0, 500.0) as u16)
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    data: Option<FeedData>,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    aqi: serde_json::Value,
    dominentpol: Option<String>,
    iaqi: Option<Iaqi>,
    time: Option<FeedTime>,
}

#[derive(Debug, Deserialize)]
struct Iaqi {
    pm25: Option<IaqiValue>,
    pm10: Option<IaqiValue>,
    o3: Option<IaqiValue>,
    no2: Option<IaqiValue>,
    so2: Option<IaqiValue>,
    co: Option<IaqiValue>,
}

#[derive(Debug, Deserialize)]
struct IaqiValue {
    v: f64,
}

#[derive(Debug, Deserialize)]
struct FeedTime {
    iso: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoundsResponse {
    status: String,
    data: Option<Vec<BoundsStation>>,
}

#[derive(Debug, Deserialize)]
struct BoundsStation {
    lat: f64,
    lon: f64,
    aqi: serde_json::Value,
    station: BoundsStationInfo,
}

#[derive(Debug, Deserialize)]
struct BoundsStationInfo {
    name: String,
}
