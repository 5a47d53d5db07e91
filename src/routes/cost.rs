//! Route exposure-cost aggregation
//!
//! Walks a sampled route geometry, resolves the nearest station reading for
//! each sample, and accumulates distance-weighted exposure into summary
//! statistics.

use serde::{Deserialize, Serialize};

use crate::models::aqi::StationReading;
use crate::models::geo::{GeoPoint, RouteGeometry};
use crate::models::profile::{HealthCondition, health_multiplier};

/// Conservative "unhealthy for sensitive groups" default used whenever no
/// station data is available. Live station coverage is sparse, so this is a
/// documented degrade path, not an error.
pub const FALLBACK_POLLUTION_INDEX: u16 = 150;

/// Target number of samples per route; denser geometries are strided down
/// to roughly this many points.
const TARGET_SAMPLES: usize = 20;

/// Derived exposure summary for one candidate route. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteExposureResult {
    /// Rounded cumulative distance-weighted exposure
    pub exposure_score: u32,
    /// Distance-weighted average pollution index along the route
    pub average_index: u16,
    /// Lowest pollution index observed at any sample
    pub min_index: u16,
    /// Highest pollution index observed at any sample
    pub max_index: u16,
    /// Total sampled distance in kilometers
    pub distance_km: f64,
}

/// Pollution index of the station nearest to `point`.
///
/// Linear scan; ties keep the first station in input order, so the result
/// is deterministic for a fixed station sequence. An empty station list
/// yields [`FALLBACK_POLLUTION_INDEX`].
#[must_use]
pub fn nearest_pollution_index(point: &GeoPoint, stations: &[StationReading]) -> u16 {
    let mut nearest = FALLBACK_POLLUTION_INDEX;
    let mut min_distance = f64::INFINITY;

    for station in stations {
        let distance = point.distance_km(&station.location);
        if distance < min_distance {
            min_distance = distance;
            nearest = station.pollution_index;
        }
    }

    nearest
}

/// Aggregate the exposure cost of a route geometry against a set of station
/// readings.
///
/// Sampling stride is `max(1, len / 20)` so the work stays bounded at about
/// twenty samples regardless of geometry density. The health multiplier is
/// the MAX-of-conditions value, computed once and applied to every segment.
///
/// A geometry that yields fewer than two samples has zero distance; the
/// average falls back to [`FALLBACK_POLLUTION_INDEX`] instead of dividing
/// by zero.
#[must_use]
pub fn aggregate_route_exposure(
    geometry: &RouteGeometry,
    stations: &[StationReading],
    health_conditions: &[HealthCondition],
) -> RouteExposureResult {
    let multiplier = health_multiplier(health_conditions);

    let mut total_exposure = 0.0_f64;
    let mut total_distance = 0.0_f64;
    let mut max_index = 0_u16;
    let mut min_index = 500_u16;

    let stride = (geometry.len() / TARGET_SAMPLES).max(1);

    let mut index = 0;
    while index < geometry.len() {
        let point = &geometry.points[index];
        let sample_index = nearest_pollution_index(point, stations);

        if index > 0 {
            let previous = &geometry.points[index.saturating_sub(stride)];
            let segment_distance = previous.distance_km(point);

            total_distance += segment_distance;
            total_exposure += segment_distance * f64::from(sample_index) * multiplier;
        }

        max_index = max_index.max(sample_index);
        min_index = min_index.min(sample_index);

        index += stride;
    }

    let average_index = if total_distance > 0.0 {
        (total_exposure / total_distance).round() as u16
    } else {
        FALLBACK_POLLUTION_INDEX
    };

    RouteExposureResult {
        exposure_score: total_exposure.round() as u32,
        average_index,
        min_index,
        max_index,
        distance_km: total_distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::HealthCondition;

    fn station(lat: f64, lng: f64, index: u16) -> StationReading {
        StationReading::new(GeoPoint::new(lat, lng), index, "test station")
    }

    #[test]
    fn test_nearest_empty_stations_falls_back() {
        let point = GeoPoint::new(28.61, 77.20);
        assert_eq!(nearest_pollution_index(&point, &[]), 150);
    }

    #[test]
    fn test_nearest_picks_minimum_distance() {
        let point = GeoPoint::new(28.61, 77.20);
        let stations = vec![
            station(30.00, 78.00, 90),
            station(28.62, 77.21, 210),
            station(27.00, 76.00, 50),
        ];
        assert_eq!(nearest_pollution_index(&point, &stations), 210);
    }

    #[test]
    fn test_nearest_tie_keeps_first_in_input_order() {
        let point = GeoPoint::new(28.61, 77.20);
        // Two stations at exactly the same spot: the first one wins
        let stations = vec![station(28.70, 77.30, 111), station(28.70, 77.30, 222)];
        assert_eq!(nearest_pollution_index(&point, &stations), 111);
    }

    #[test]
    fn test_single_point_geometry_has_zero_distance_and_fallback_average() {
        let geometry = RouteGeometry::new(vec![GeoPoint::new(28.61, 77.20)]);
        let stations = vec![station(28.62, 77.21, 200)];

        let result = aggregate_route_exposure(&geometry, &stations, &[]);
        assert_eq!(result.distance_km, 0.0);
        assert_eq!(result.exposure_score, 0);
        assert_eq!(result.average_index, 150);
        assert_eq!(result.max_index, 200);
    }

    #[test]
    fn test_uniform_index_average_matches_station() {
        // Two points ~1km apart with a single station: the weighted average
        // equals the station index
        let geometry = RouteGeometry::new(vec![
            GeoPoint::new(28.6100, 77.2000),
            GeoPoint::new(28.6190, 77.2000),
        ]);
        let stations = vec![station(28.6145, 77.2000, 180)];

        let result = aggregate_route_exposure(&geometry, &stations, &[]);
        assert!(result.distance_km > 0.5 && result.distance_km < 1.5);
        assert_eq!(result.average_index, 180);
        assert_eq!(result.min_index, 180);
        assert_eq!(result.max_index, 180);
        assert_eq!(
            result.exposure_score,
            (result.distance_km * 180.0).round() as u32
        );
    }

    #[test]
    fn test_health_multiplier_scales_exposure_not_minmax() {
        let geometry = RouteGeometry::new(vec![
            GeoPoint::new(28.6100, 77.2000),
            GeoPoint::new(28.6190, 77.2000),
        ]);
        let stations = vec![station(28.6145, 77.2000, 100)];

        let baseline = aggregate_route_exposure(&geometry, &stations, &[]);
        let with_copd =
            aggregate_route_exposure(&geometry, &stations, &[HealthCondition::Copd]);

        // Exposure (and hence the weighted average) scales by 1.8, while the
        // raw min/max stay at the station reading
        assert!(with_copd.exposure_score > baseline.exposure_score);
        assert_eq!(with_copd.min_index, 100);
        assert_eq!(with_copd.max_index, 100);
        let ratio = f64::from(with_copd.exposure_score) / f64::from(baseline.exposure_score);
        assert!((ratio - 1.8).abs() < 0.01, "ratio was {ratio}");
    }

    #[test]
    fn test_dense_geometry_is_strided() {
        // 100 points in a straight line: stride becomes 5, still covering
        // the whole path
        let points: Vec<GeoPoint> = (0..100)
            .map(|i| GeoPoint::new(28.6 + f64::from(i) * 0.0005, 77.2))
            .collect();
        let total_span = points[0].distance_km(&points[99]);
        let geometry = RouteGeometry::new(points);
        let stations = vec![station(28.62, 77.20, 120)];

        let result = aggregate_route_exposure(&geometry, &stations, &[]);
        // Sampled distance should roughly match the full span (straight line)
        assert!((result.distance_km - total_span).abs() < 0.3);
    }

    #[test]
    fn test_min_max_tracked_across_all_samples() {
        let geometry = RouteGeometry::new(vec![
            GeoPoint::new(28.6000, 77.2000),
            GeoPoint::new(28.6500, 77.2000),
            GeoPoint::new(28.7000, 77.2000),
        ]);
        let stations = vec![
            station(28.6000, 77.2000, 80),
            station(28.6500, 77.2000, 300),
            station(28.7000, 77.2000, 150),
        ];

        let result = aggregate_route_exposure(&geometry, &stations, &[]);
        assert_eq!(result.min_index, 80);
        assert_eq!(result.max_index, 300);
    }
}
