//! `AirImpact`: personal air-pollution exposure service
//!
//! Computes personal exposure scores from live air-quality data, finds and
//! ranks low-exposure travel routes, and produces policy and intervention
//! guidance for polluted cities.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod exposure;
pub mod intervention;
pub mod models;
pub mod policy;
pub mod providers;
pub mod routes;
pub mod web;
pub mod zones;

pub use config::AirImpactConfig;
pub use error::AirImpactError;

/// Crate version, exposed on the health endpoint
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience result alias for fallible service operations
pub type Result<T> = std::result::Result<T, AirImpactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
