//! User exposure profile: activity, age group, and health condition tags
//!
//! All categorical tags degrade gracefully: unknown values deserialize to a
//! neutral variant whose multiplier is 1.0 rather than failing the request.

use serde::{Deserialize, Serialize};

/// Physical activity during exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Resting,
    Walking,
    Cycling,
    Running,
    Commuting,
    /// Any unrecognized activity tag; neutral multiplier
    #[serde(other)]
    Other,
}

impl Activity {
    /// Breathing-rate multiplier for this activity
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Activity::Resting => 1.0,
            Activity::Walking => 1.3,
            Activity::Cycling => 1.8,
            Activity::Running => 2.5,
            Activity::Commuting => 1.2,
            Activity::Other => 1.0,
        }
    }

    /// Parse a free-text activity tag; unknown tags map to `Other`
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "resting" => Activity::Resting,
            "walking" => Activity::Walking,
            "cycling" => Activity::Cycling,
            "running" => Activity::Running,
            "commuting" => Activity::Commuting,
            _ => Activity::Other,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Activity::Resting => "resting",
            Activity::Walking => "walking",
            Activity::Cycling => "cycling",
            Activity::Running => "running",
            Activity::Commuting => "commuting",
            Activity::Other => "other",
        }
    }
}

/// Age group of the exposed person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Child,
    Adult,
    Senior,
    /// Unrecognized age tag; neutral multiplier
    #[serde(other)]
    Unspecified,
}

impl AgeGroup {
    /// Age sensitivity multiplier
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            AgeGroup::Child => 1.3,
            AgeGroup::Adult => 1.0,
            AgeGroup::Senior => 1.4,
            AgeGroup::Unspecified => 1.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Child => "child",
            AgeGroup::Adult => "adult",
            AgeGroup::Senior => "senior",
            AgeGroup::Unspecified => "unspecified",
        }
    }
}

/// Pre-existing health condition tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Asthma,
    Copd,
    HeartDisease,
    Diabetes,
    Hypertension,
    Bronchitis,
    Emphysema,
    /// Informational "no conditions" tag; contributes no multiplier
    None,
    /// Unrecognized condition tag; neutral multiplier
    #[serde(other)]
    Other,
}

impl HealthCondition {
    /// Sensitivity multiplier for a single condition
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            HealthCondition::Asthma => 1.6,
            HealthCondition::Copd => 1.8,
            HealthCondition::HeartDisease => 1.5,
            HealthCondition::Diabetes => 1.2,
            HealthCondition::Hypertension
            | HealthCondition::Bronchitis
            | HealthCondition::Emphysema
            | HealthCondition::None
            | HealthCondition::Other => 1.0,
        }
    }
}

/// Combined health multiplier across all of a user's conditions.
///
/// Only the worst single condition counts: multipliers are taken as a MAX,
/// never summed or multiplied together. An empty set is neutral.
#[must_use]
pub fn health_multiplier(conditions: &[HealthCondition]) -> f64 {
    conditions
        .iter()
        .map(|c| c.multiplier())
        .fold(1.0, f64::max)
}

/// Personal risk profile used by the exposure formula and route aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExposureProfile {
    #[serde(default = "default_age_group")]
    pub age_group: AgeGroup,
    #[serde(default)]
    pub health_conditions: Vec<HealthCondition>,
    /// Exact age, if known; used only for suggestion context
    #[serde(default)]
    pub age: Option<u32>,
    /// Home city, if known; used only for suggestion context
    #[serde(default)]
    pub city: Option<String>,
}

fn default_age_group() -> AgeGroup {
    AgeGroup::Unspecified
}

impl Default for UserExposureProfile {
    fn default() -> Self {
        Self {
            age_group: AgeGroup::Unspecified,
            health_conditions: Vec::new(),
            age: None,
            city: None,
        }
    }
}

impl UserExposureProfile {
    /// MAX-of-conditions multiplier for this profile
    #[must_use]
    pub fn health_multiplier(&self) -> f64 {
        health_multiplier(&self.health_conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_activity_is_neutral() {
        assert_eq!(Activity::parse("flying"), Activity::Other);
        assert_eq!(Activity::parse("flying").multiplier(), 1.0);
        assert_eq!(Activity::parse("running").multiplier(), 2.5);
    }

    #[test]
    fn test_unknown_tags_deserialize_to_neutral() {
        let activity: Activity = serde_json::from_str("\"flying\"").unwrap();
        assert_eq!(activity, Activity::Other);

        let age: AgeGroup = serde_json::from_str("\"toddler\"").unwrap();
        assert_eq!(age, AgeGroup::Unspecified);

        let condition: HealthCondition = serde_json::from_str("\"sniffles\"").unwrap();
        assert_eq!(condition.multiplier(), 1.0);
    }

    #[test]
    fn test_health_multiplier_takes_max_not_product() {
        let conditions = vec![HealthCondition::Asthma, HealthCondition::Copd];
        assert_eq!(health_multiplier(&conditions), 1.8);
    }

    #[test]
    fn test_health_multiplier_empty_set_is_neutral() {
        assert_eq!(health_multiplier(&[]), 1.0);
    }

    #[test]
    fn test_none_condition_contributes_nothing() {
        assert_eq!(health_multiplier(&[HealthCondition::None]), 1.0);
        assert_eq!(
            health_multiplier(&[HealthCondition::None, HealthCondition::Diabetes]),
            1.2
        );
    }

    #[test]
    fn test_snake_case_wire_format() {
        assert_eq!(
            serde_json::to_string(&HealthCondition::HeartDisease).unwrap(),
            "\"heart_disease\""
        );
        let parsed: HealthCondition = serde_json::from_str("\"heart_disease\"").unwrap();
        assert_eq!(parsed, HealthCondition::HeartDisease);
    }
}
