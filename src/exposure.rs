//! Personal exposure formula
//!
//! Maps (pollution index, duration, activity, age group, health conditions)
//! to a scalar exposure score and a bucketed risk tier. Pure computation:
//! no I/O, no error paths. Unrecognized categorical tags degrade to a
//! neutral 1.0 multiplier rather than failing the request.

use serde::{Deserialize, Serialize};

use crate::models::profile::{Activity, AgeGroup, HealthCondition, health_multiplier};

/// Reference ceiling for the health-impact scale (the historical
/// HAZARDOUS threshold constant)
pub const HEALTH_IMPACT_CEILING: u32 = 35_000;

/// Bucketed severity label derived from an exposure score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    VeryHigh,
    Hazardous,
}

impl RiskTier {
    /// Tier for a score. Boundaries are strictly-greater-than: a score of
    /// exactly 5000 is still LOW, 5001 is MODERATE, and so on.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score > 25_000 {
            RiskTier::Hazardous
        } else if score > 15_000 {
            RiskTier::VeryHigh
        } else if score > 10_000 {
            RiskTier::High
        } else if score > 5_000 {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    /// Human-readable guidance for this tier
    #[must_use]
    pub fn explanation(self) -> &'static str {
        match self {
            RiskTier::Low => {
                "Your exposure is within safe limits. Continue your activities as planned."
            }
            RiskTier::Moderate => {
                "Moderate exposure detected. Consider reducing time outdoors if sensitive."
            }
            RiskTier::High => {
                "High exposure risk. Limit outdoor activities and wear a mask if possible."
            }
            RiskTier::VeryHigh => {
                "Very high exposure. Minimize outdoor time and avoid strenuous activities."
            }
            RiskTier::Hazardous => {
                "Hazardous exposure levels. Stay indoors and use air purifiers if available."
            }
        }
    }
}

/// The individual factors that produced a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureBreakdown {
    pub base_index: u16,
    pub duration_minutes: f64,
    pub activity_multiplier: f64,
    pub age_multiplier: f64,
    pub health_multiplier: f64,
    pub total_multiplier: f64,
}

/// Result of the exposure formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureResult {
    pub score: u32,
    pub risk_tier: RiskTier,
    pub breakdown: ExposureBreakdown,
}

/// Compute a personal exposure score.
///
/// `score = round(index x minutes x activity x age x max(health))`. The
/// health multiplier is the MAXIMUM across the user's conditions, never a
/// sum or product; an empty set is neutral.
#[must_use]
pub fn compute_exposure(
    pollution_index: u16,
    duration_minutes: f64,
    activity: Activity,
    age_group: AgeGroup,
    health_conditions: &[HealthCondition],
) -> ExposureResult {
    let activity_multiplier = activity.multiplier();
    let age_multiplier = age_group.multiplier();
    let health_multiplier = health_multiplier(health_conditions);

    let score = (f64::from(pollution_index)
        * duration_minutes
        * activity_multiplier
        * age_multiplier
        * health_multiplier)
        .round() as u32;

    ExposureResult {
        score,
        risk_tier: RiskTier::from_score(score),
        breakdown: ExposureBreakdown {
            base_index: pollution_index,
            duration_minutes,
            activity_multiplier,
            age_multiplier,
            health_multiplier,
            total_multiplier: activity_multiplier * age_multiplier * health_multiplier,
        },
    }
}

/// Rough 0-100 health-impact estimate for an exposure score.
///
/// Scales the score against the reference ceiling, then weights vulnerable
/// age groups and respiratory conditions more heavily. Capped at 100.
#[must_use]
pub fn health_impact(score: u32, age_group: AgeGroup, conditions: &[HealthCondition]) -> u8 {
    let mut impact = (f64::from(score) / f64::from(HEALTH_IMPACT_CEILING) * 100.0).min(100.0);

    if matches!(age_group, AgeGroup::Child | AgeGroup::Senior) {
        impact *= 1.2;
    }

    if conditions
        .iter()
        .any(|c| matches!(c, HealthCondition::Asthma | HealthCondition::Copd))
    {
        impact *= 1.3;
    }

    impact.min(100.0).round() as u8
}
