//! Route exposure pipeline
//!
//! Cost aggregation over sampled route geometries, ranking of candidate
//! routes by cumulative exposure, and the provider-facing finder that wires
//! geocoding, directions, and station data together.

pub mod cost;
pub mod finder;
pub mod rank;

use serde::{Deserialize, Serialize};

pub use cost::{
    FALLBACK_POLLUTION_INDEX, RouteExposureResult, aggregate_route_exposure,
    nearest_pollution_index,
};
pub use finder::{PlannedRoute, RoutePlan, find_clean_routes};
pub use rank::rank_routes;

/// Travel mode accepted by the routing provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    /// Parse a request-supplied mode tag. Unlike profile tags, an unknown
    /// mode is a hard validation error (the provider cannot route it), so
    /// this returns `None` instead of degrading.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "driving" => Some(TravelMode::Driving),
            "walking" => Some(TravelMode::Walking),
            "cycling" => Some(TravelMode::Cycling),
            _ => None,
        }
    }

    /// Mapbox directions profile name
    #[must_use]
    pub fn provider_profile(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }

    /// Assumed average speed for duration estimates
    #[must_use]
    pub fn speed_kmh(self) -> f64 {
        match self {
            TravelMode::Walking => 5.0,
            TravelMode::Cycling => 15.0,
            TravelMode::Driving => 30.0,
        }
    }

    /// Estimated travel time in minutes for a distance at this mode's speed
    #[must_use]
    pub fn estimate_minutes(self, distance_km: f64) -> u32 {
        (distance_km / self.speed_kmh() * 60.0).round() as u32
    }
}
