//! Zone-based route costing
//!
//! A simpler, station-free comparison path: routes are described as ordered
//! lists of named zones with a known AQI and a dwell time, and costed by
//! cumulative aqi x minutes x activity multiplier.

use serde::{Deserialize, Serialize};

use crate::models::profile::Activity;

/// One leg of a zone route: a named zone, its AQI, and time spent in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLeg {
    pub name: String,
    pub aqi: u16,
    pub time_minutes: f64,
}

/// Cost contribution of a single zone leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCost {
    pub zone: String,
    pub aqi: u16,
    pub time_minutes: f64,
    pub cost: u32,
}

/// Total cost of one zone route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCost {
    pub total_cost: u32,
    pub breakdown: Vec<ZoneCost>,
    pub average_aqi: u16,
}

/// A named candidate route expressed as zone legs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedZoneRoute {
    pub name: String,
    pub zones: Vec<ZoneLeg>,
    #[serde(default = "default_activity")]
    pub activity: Activity,
}

fn default_activity() -> Activity {
    Activity::Walking
}

/// One route's entry in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedRoute {
    pub route_name: String,
    pub total_cost: u32,
    pub breakdown: Vec<ZoneCost>,
    pub average_aqi: u16,
    /// Percent above the cheapest route (0 for the best route)
    pub percentage_diff: u32,
}

/// Result of comparing two or more zone routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    pub best_route: String,
    pub comparison: Vec<ComparedRoute>,
}

/// Cumulative exposure cost of a route through known zones.
///
/// `zones` must be non-empty; callers validate before invoking.
#[must_use]
pub fn route_cost(zones: &[ZoneLeg], activity: Activity) -> RouteCost {
    let activity_multiplier = activity.multiplier();

    let mut total_cost = 0.0_f64;
    let breakdown: Vec<ZoneCost> = zones
        .iter()
        .map(|zone| {
            let cost = f64::from(zone.aqi) * zone.time_minutes * activity_multiplier;
            total_cost += cost;
            ZoneCost {
                zone: zone.name.clone(),
                aqi: zone.aqi,
                time_minutes: zone.time_minutes,
                cost: cost.round() as u32,
            }
        })
        .collect();

    let average_aqi = if zones.is_empty() {
        0
    } else {
        let sum: u32 = zones.iter().map(|z| u32::from(z.aqi)).sum();
        (f64::from(sum) / zones.len() as f64).round() as u16
    };

    RouteCost {
        total_cost: total_cost.round() as u32,
        breakdown,
        average_aqi,
    }
}

/// Compare candidate zone routes and pick the lowest-cost one.
///
/// Each entry carries its percentage difference from the minimum cost.
#[must_use]
pub fn compare_routes(routes: &[NamedZoneRoute]) -> RouteComparison {
    let costs: Vec<(String, RouteCost)> = routes
        .iter()
        .map(|route| (route.name.clone(), route_cost(&route.zones, route.activity)))
        .collect();

    let min_cost = costs
        .iter()
        .map(|(_, cost)| cost.total_cost)
        .min()
        .unwrap_or(0);

    let best_route = costs
        .iter()
        .find(|(_, cost)| cost.total_cost == min_cost)
        .map(|(name, _)| name.clone())
        .unwrap_or_default();

    let comparison = costs
        .into_iter()
        .map(|(route_name, cost)| {
            let percentage_diff = if min_cost > 0 {
                ((f64::from(cost.total_cost - min_cost) / f64::from(min_cost)) * 100.0).round()
                    as u32
            } else {
                0
            };
            ComparedRoute {
                route_name,
                total_cost: cost.total_cost,
                breakdown: cost.breakdown,
                average_aqi: cost.average_aqi,
                percentage_diff,
            }
        })
        .collect();

    RouteComparison {
        best_route,
        comparison,
    }
}

/// Seed zone profile for a city district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub zone: String,
    pub base_aqi: u16,
    pub areas: Vec<String>,
}

/// Seed AQI profiles for well-known city zones. Used by the intervention
/// surface to flag high-risk districts when no live data is supplied.
#[must_use]
pub fn city_zones(city: &str) -> Vec<ZoneProfile> {
    let seed: &[(&str, u16, &[&str])] = match city {
        "Delhi" => &[
            ("Zone A", 180, &["Connaught Place", "Rajiv Chowk"]),
            ("Zone B", 220, &["Anand Vihar", "ITO"]),
            ("Zone C", 150, &["Nehru Place", "Lajpat Nagar"]),
        ],
        "Mumbai" => &[
            ("Zone A", 120, &["Bandra", "Andheri"]),
            ("Zone B", 100, &["Worli", "Colaba"]),
            ("Zone C", 140, &["Thane", "Mulund"]),
        ],
        _ => &[],
    };

    seed.iter()
        .map(|(zone, base_aqi, areas)| ZoneProfile {
            zone: (*zone).to_string(),
            base_aqi: *base_aqi,
            areas: areas.iter().map(|a| (*a).to_string()).collect(),
        })
        .collect()
}

/// Zones in a city whose baseline AQI exceeds `threshold`
#[must_use]
pub fn high_risk_zones(city: &str, threshold: u16) -> Vec<ZoneProfile> {
    city_zones(city)
        .into_iter()
        .filter(|zone| zone.base_aqi > threshold)
        .collect()
}
