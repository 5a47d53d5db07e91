//! Air-quality models: station readings, observations, category bands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::geo::GeoPoint;

/// A single air-quality sensor: location plus current pollution index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReading {
    pub location: GeoPoint,
    /// Pollution index on the 0-500 AQI scale
    pub pollution_index: u16,
    pub name: String,
}

impl StationReading {
    #[must_use]
    pub fn new(location: GeoPoint, pollution_index: u16, name: impl Into<String>) -> Self {
        Self {
            location,
            pollution_index,
            name: name.into(),
        }
    }
}

/// Per-pollutant concentrations reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
}

/// Current air-quality observation for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiObservation {
    pub city: String,
    /// Pollution index on the 0-500 AQI scale
    pub index: u16,
    pub category: AqiCategory,
    pub dominant_pollutant: String,
    pub pollutants: Pollutants,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Standard AQI category bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Category band for a pollution index
    #[must_use]
    pub fn from_index(index: u16) -> Self {
        match index {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthySensitive,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy for Sensitive",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Display color used by clients
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            AqiCategory::Good => "#00e400",
            AqiCategory::Moderate => "#ffff00",
            AqiCategory::UnhealthySensitive => "#ff7e00",
            AqiCategory::Unhealthy => "#ff0000",
            AqiCategory::VeryUnhealthy => "#8f3f97",
            AqiCategory::Hazardous => "#7e0023",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_band_boundaries() {
        assert_eq!(AqiCategory::from_index(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_index(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_index(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_index(101), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_index(150), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_index(151), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_index(201), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_index(301), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_index(500), AqiCategory::Hazardous);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AqiCategory::from_index(120).label(), "Unhealthy for Sensitive");
        assert_eq!(AqiCategory::from_index(40).label(), "Good");
    }
}
