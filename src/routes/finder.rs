//! Clean-route finder
//!
//! Orchestrates the provider calls for one "find routes between A and B"
//! request: geocode both endpoints, fetch candidate routes, pull nearby
//! station readings, then aggregate and rank per-route exposure. Each call
//! owns its own geometry, station list, and results; nothing here is shared
//! across requests.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::AirImpactError;
use crate::models::aqi::StationReading;
use crate::models::geo::{BoundingBox, RouteGeometry};
use crate::models::profile::UserExposureProfile;
use crate::providers::mapbox::{MapboxClient, ResolvedPlace};
use crate::providers::waqi::WaqiClient;
use crate::routes::TravelMode;
use crate::routes::cost::{RouteExposureResult, aggregate_route_exposure};
use crate::routes::rank::rank_routes;

/// Degrees of padding around the endpoints when searching for stations
const STATION_SEARCH_MARGIN: f64 = 0.1;

/// Index assigned to the synthetic station injected when the bounding-box
/// search comes back empty
const FALLBACK_STATION_INDEX: u16 = 100;

/// One scored candidate route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    /// Position in the provider's original response
    pub id: usize,
    pub name: String,
    pub mode: TravelMode,
    pub recommended: bool,
    /// Estimated travel time at the mode's average speed
    pub duration_minutes: u32,
    pub exposure: RouteExposureResult,
    pub geometry: RouteGeometry,
}

/// Full result of a route search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub routes: Vec<PlannedRoute>,
    pub from: ResolvedPlace,
    pub to: ResolvedPlace,
    /// The station readings the scores were computed against (including a
    /// synthetic fallback station when none were found)
    pub stations: Vec<StationReading>,
}

/// Find and rank candidate routes between two place names by cumulative
/// exposure cost.
///
/// The Mapbox access token comes from the caller, per request; there is no
/// shared server-wide routing credential.
#[instrument(skip(mapbox, waqi, profile, mapbox_token), fields(mode = mode.provider_profile()))]
pub async fn find_clean_routes(
    mapbox: &MapboxClient,
    waqi: &WaqiClient,
    from_place: &str,
    to_place: &str,
    mode: TravelMode,
    profile: &UserExposureProfile,
    mapbox_token: &str,
) -> Result<RoutePlan> {
    let from = mapbox
        .geocode(from_place, mapbox_token)
        .await?
        .ok_or_else(|| AirImpactError::validation(format!("Location not found: {from_place}")))?;
    let to = mapbox
        .geocode(to_place, mapbox_token)
        .await?
        .ok_or_else(|| AirImpactError::validation(format!("Location not found: {to_place}")))?;

    let candidates = mapbox
        .directions(&from.point, &to.point, mode, mapbox_token)
        .await?;

    if candidates.is_empty() {
        return Err(
            AirImpactError::validation("No routes found between these locations").into(),
        );
    }

    let bounds = BoundingBox::around(&from.point, &to.point, STATION_SEARCH_MARGIN);
    let mut stations = waqi.stations_in_bounds(&bounds).await;

    if stations.is_empty() {
        warn!("No stations in bounds, using fallback station at origin");
        stations.push(StationReading::new(
            from.point,
            FALLBACK_STATION_INDEX,
            "Fallback Station",
        ));
    }

    info!(
        routes = candidates.len(),
        stations = stations.len(),
        "Scoring candidate routes"
    );

    let scored: Vec<PlannedRoute> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let exposure = aggregate_route_exposure(
                &candidate.geometry,
                &stations,
                &profile.health_conditions,
            );
            let name = if index == 0 {
                "Fastest Route".to_string()
            } else {
                format!("Alternative {index}")
            };

            PlannedRoute {
                id: index,
                name,
                mode,
                recommended: false,
                duration_minutes: mode.estimate_minutes(exposure.distance_km),
                exposure,
                geometry: candidate.geometry,
            }
        })
        .collect();

    let ranked = rank_routes(scored);

    if let Some(best) = ranked.first() {
        info!(
            best = %best.name,
            average_index = best.exposure.average_index,
            "Route search complete"
        );
    }

    Ok(RoutePlan {
        routes: ranked,
        from,
        to,
        stations,
    })
}
