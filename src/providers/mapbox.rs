//! Mapbox geocoding and directions client
//!
//! The access token is supplied by the caller on every request; the server
//! holds no routing credential of its own.

use anyhow::Result;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::AirImpactError;
use crate::config::RoutingProviderConfig;
use crate::models::geo::{GeoPoint, RouteGeometry};
use crate::providers::http_client;
use crate::routes::TravelMode;

const SERVICE_NAME: &str = "Mapbox";

pub struct MapboxClient {
    http: ClientWithMiddleware,
    base_url: String,
}

/// A geocoded place name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub point: GeoPoint,
    pub name: String,
}

/// One candidate route as returned by the directions API
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRoute {
    pub geometry: RouteGeometry,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl MapboxClient {
    pub fn new(config: &RoutingProviderConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(config.timeout_seconds, config.max_retries)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Forward-geocode a place name; `None` when the provider has no match.
    #[instrument(skip(self, token))]
    pub async fn geocode(&self, place: &str, token: &str) -> Result<Option<ResolvedPlace>> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json?access_token={}&limit=1",
            self.base_url,
            urlencoding::encode(place),
            token
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
                format!("geocoding failed with HTTP {}", response.status()),
            )
            .into());
        }

        let geocoding: GeocodingResponse = response.json().await.map_err(|e| {
            AirImpactError::upstream(SERVICE_NAME, format!("malformed geocoding payload: {e}"))
        })?;

        let Some(feature) = geocoding.features.into_iter().next() else {
            debug!("No geocoding results for '{place}'");
            return Ok(None);
        };

        // Mapbox centers are [longitude, latitude]
        let resolved = ResolvedPlace {
            point: GeoPoint::new(feature.center[1], feature.center[0]),
            name: feature.place_name,
        };
        debug!(
            "Geocoded '{place}' to {} ({})",
            resolved.name,
            resolved.point.format_coordinates()
        );

        Ok(Some(resolved))
    }

    /// Candidate routes between two points, alternatives included.
    #[instrument(skip(self, token), fields(profile = mode.provider_profile()))]
    pub async fn directions(
        &self,
        from: &GeoPoint,
        to: &GeoPoint,
        mode: TravelMode,
        token: &str,
    ) -> Result<Vec<CandidateRoute>> {
        let url = format!(
            "{}/directions/v5/mapbox/{}/{},{};{},{}?alternatives=true&geometries=geojson&access_token={}",
            self.base_url,
            mode.provider_profile(),
            from.longitude,
            from.latitude,
            to.longitude,
            to.latitude,
            token
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
                format!("directions failed with HTTP {}", response.status()),
            )
            .into());
        }

        let directions: DirectionsResponse = response.json().await.map_err(|e| {
            AirImpactError::upstream(SERVICE_NAME, format!("malformed directions payload: {e}"))
        })?;

        let routes: Vec<CandidateRoute> = directions
            .routes
            .into_iter()
            .map(|route| CandidateRoute {
                geometry: RouteGeometry::from_lng_lat(&route.geometry.coordinates),
                distance_meters: route.distance,
                duration_seconds: route.duration,
            })
            .collect();

        debug!("Provider returned {} route(s)", routes.len());

        Ok(routes)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    center: [f64; 2],
    place_name: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: DirectionsGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_geocoding_response_center_order() {
        let raw = json!({
            "features": [
                { "center": [77.2090, 28.6139], "place_name": "New Delhi, India" }
            ]
        });
        let parsed: GeocodingResponse = serde_json::from_value(raw).unwrap();
        let feature = &parsed.features[0];
        // center is [lng, lat]
        let point = GeoPoint::new(feature.center[1], feature.center[0]);
        assert_eq!(point.latitude, 28.6139);
        assert_eq!(point.longitude, 77.2090);
    }

    #[test]
    fn test_directions_response_shape() {
        let raw = json!({
            "routes": [
                {
                    "geometry": { "coordinates": [[77.20, 28.61], [77.21, 28.60]] },
                    "distance": 3120.5,
                    "duration": 540.0
                }
            ]
        });
        let parsed: DirectionsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.routes.len(), 1);
        let geometry = RouteGeometry::from_lng_lat(&parsed.routes[0].geometry.coordinates);
        assert_eq!(geometry.len(), 2);
        assert_eq!(geometry.points[0].latitude, 28.61);
    }

    #[test]
    fn test_directions_missing_routes_is_empty() {
        let parsed: DirectionsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.routes.is_empty());
    }
}
