//! Core data models for exposure estimation and route planning

pub mod aqi;
pub mod geo;
pub mod profile;

pub use aqi::{AqiCategory, AqiObservation, Pollutants, StationReading};
pub use geo::{BoundingBox, GeoPoint, RouteGeometry};
pub use profile::{Activity, AgeGroup, HealthCondition, UserExposureProfile};
