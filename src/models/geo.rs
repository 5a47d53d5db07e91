//! Geographic value types: points, route geometries, bounding boxes

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

/// A single WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point, in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let from = HaversineLocation {
            latitude: self.latitude,
            longitude: self.longitude,
        };
        let to = HaversineLocation {
            latitude: other.latitude,
            longitude: other.longitude,
        };
        distance(from, to, Units::Kilometers)
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Ordered sequence of points approximating a travel path.
///
/// Insertion order is path order; duplicate points are permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub points: Vec<GeoPoint>,
}

impl RouteGeometry {
    #[must_use]
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Builds a geometry from GeoJSON-style `[longitude, latitude]` pairs,
    /// as returned by the routing provider.
    #[must_use]
    pub fn from_lng_lat(coordinates: &[[f64; 2]]) -> Self {
        Self {
            points: coordinates
                .iter()
                .map(|c| GeoPoint::new(c[1], c[0]))
                .collect(),
        }
    }

    /// Back to GeoJSON-style `[longitude, latitude]` pairs for responses.
    #[must_use]
    pub fn to_lng_lat(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|p| [p.longitude, p.latitude])
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Geographic bounding box used for station searches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box covering two endpoints, padded by `margin` degrees on every side
    #[must_use]
    pub fn around(a: &GeoPoint, b: &GeoPoint, margin: f64) -> Self {
        Self {
            min_lat: a.latitude.min(b.latitude) - margin,
            max_lat: a.latitude.max(b.latitude) + margin,
            min_lng: a.longitude.min(b.longitude) - margin,
            max_lng: a.longitude.max(b.longitude) + margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_known_pair() {
        // Interlaken to Grindelwald, roughly 20km apart
        let a = GeoPoint::new(46.6863, 7.8632);
        let b = GeoPoint::new(46.6244, 8.0414);
        let d = a.distance_km(&b);
        assert!(d > 10.0 && d < 25.0, "unexpected distance: {d}");
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(28.6139, 77.2090);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_lng_lat_round_trip() {
        let geometry = RouteGeometry::from_lng_lat(&[[77.2090, 28.6139], [77.2295, 28.6129]]);
        assert_eq!(geometry.len(), 2);
        assert_eq!(geometry.points[0].latitude, 28.6139);
        assert_eq!(geometry.points[0].longitude, 77.2090);
        assert_eq!(geometry.to_lng_lat()[1], [77.2295, 28.6129]);
    }

    #[test]
    fn test_bounding_box_padding() {
        let from = GeoPoint::new(28.61, 77.20);
        let to = GeoPoint::new(28.53, 77.25);
        let bounds = BoundingBox::around(&from, &to, 0.1);
        assert!(bounds.min_lat < 28.53 && bounds.max_lat > 28.61);
        assert!(bounds.min_lng < 77.20 && bounds.max_lng > 77.25);
    }
}
