//! City intervention simulation
//!
//! Estimates the effect of a pollution-control action (water spraying,
//! traffic restrictions, ...) on the current AQI and the population it
//! would reach. Effectiveness figures are fixed averages; the output
//! carries a disclaimer to that effect.

use serde::{Deserialize, Serialize};

use crate::zones::high_risk_zones;

/// Kind of pollution-control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    WaterSpray,
    TrafficControl,
    ConstructionHalt,
    VehicleRestriction,
    PublicAdvisory,
    /// Explicit catch-all tag with conservative effectiveness
    Other,
}

struct Effectiveness {
    /// Percentage of the current AQI the action removes
    aqi_reduction_percent: u16,
    /// Default action duration when the caller gives none
    duration_minutes: u32,
    /// Share of the zone population the action reaches
    affected_population_share: f64,
    description: &'static str,
}

impl InterventionKind {
    /// Parse a request-supplied action tag. Unlike profile tags, an
    /// unknown action is a hard validation error; only the literal
    /// `"other"` maps to the catch-all kind.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "water_spray" => Some(InterventionKind::WaterSpray),
            "traffic_control" => Some(InterventionKind::TrafficControl),
            "construction_halt" => Some(InterventionKind::ConstructionHalt),
            "vehicle_restriction" => Some(InterventionKind::VehicleRestriction),
            "public_advisory" => Some(InterventionKind::PublicAdvisory),
            "other" => Some(InterventionKind::Other),
            _ => None,
        }
    }

    fn effectiveness(self) -> Effectiveness {
        match self {
            InterventionKind::WaterSpray => Effectiveness {
                aqi_reduction_percent: 15,
                duration_minutes: 60,
                affected_population_share: 0.3,
                description: "Water spraying reduces PM2.5 and PM10 by suppressing dust particles",
            },
            InterventionKind::TrafficControl => Effectiveness {
                aqi_reduction_percent: 20,
                duration_minutes: 180,
                affected_population_share: 0.5,
                description: "Traffic restrictions reduce vehicular emissions significantly",
            },
            InterventionKind::ConstructionHalt => Effectiveness {
                aqi_reduction_percent: 25,
                duration_minutes: 480,
                affected_population_share: 0.4,
                description: "Halting construction eliminates dust and machinery emissions",
            },
            InterventionKind::VehicleRestriction => Effectiveness {
                aqi_reduction_percent: 30,
                duration_minutes: 720,
                affected_population_share: 0.7,
                description: "Comprehensive vehicle restrictions have maximum impact",
            },
            InterventionKind::PublicAdvisory => Effectiveness {
                aqi_reduction_percent: 5,
                duration_minutes: 1440,
                affected_population_share: 0.9,
                description: "Public advisories help reduce overall pollution-generating activities",
            },
            InterventionKind::Other => Effectiveness {
                aqi_reduction_percent: 10,
                duration_minutes: 120,
                affected_population_share: 0.3,
                description: "Other interventions have variable effectiveness",
            },
        }
    }
}

/// Zone population lookup; unknown zones use the default
fn zone_population(zone: Option<&str>) -> u32 {
    match zone {
        Some("Zone A") => 50_000,
        Some("Zone B") => 75_000,
        Some("Zone C") => 40_000,
        _ => 50_000,
    }
}

/// Estimated population-level effect of a simulated action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedImpact {
    pub exposure_reduction_percent: u16,
    pub affected_population: u32,
    pub duration_minutes: u32,
}

/// Outcome of one intervention simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionOutcome {
    pub action_type: InterventionKind,
    pub aqi_before_action: u16,
    pub aqi_after_action: u16,
    pub aqi_reduction: u16,
    pub reduction_percent: u16,
    pub estimated_impact: EstimatedImpact,
    pub notes: String,
    pub disclaimer: String,
}

/// Simulate a pollution-control action against the current AQI.
///
/// `aqi_before` must be positive (validated at the API boundary); the
/// post-action AQI never goes below zero.
#[must_use]
pub fn simulate(
    action: InterventionKind,
    aqi_before: u16,
    zone: Option<&str>,
    duration_override: Option<u32>,
) -> InterventionOutcome {
    let effectiveness = action.effectiveness();

    let aqi_reduction = (f64::from(aqi_before) * f64::from(effectiveness.aqi_reduction_percent)
        / 100.0)
        .round() as u16;
    let aqi_after = aqi_before.saturating_sub(aqi_reduction);

    let affected_population = (f64::from(zone_population(zone))
        * effectiveness.affected_population_share)
        .round() as u32;

    let reduction_percent = if aqi_before > 0 {
        (f64::from(aqi_reduction) / f64::from(aqi_before) * 100.0).round() as u16
    } else {
        0
    };

    InterventionOutcome {
        action_type: action,
        aqi_before_action: aqi_before,
        aqi_after_action: aqi_after,
        aqi_reduction,
        reduction_percent,
        estimated_impact: EstimatedImpact {
            exposure_reduction_percent: reduction_percent,
            affected_population,
            duration_minutes: duration_override.unwrap_or(effectiveness.duration_minutes),
        },
        notes: effectiveness.description.to_string(),
        disclaimer: "Simulation based on average effectiveness. Actual results may vary."
            .to_string(),
    }
}

/// 0-100 cost-effectiveness score: reduction x reach per hour of action,
/// normalized against a full-reduction city-wide reference.
#[must_use]
pub fn cost_effectiveness(outcome: &InterventionOutcome) -> u8 {
    let hours = f64::from(outcome.estimated_impact.duration_minutes) / 60.0;
    if hours <= 0.0 {
        return 0;
    }

    let effectiveness = f64::from(outcome.reduction_percent)
        * f64::from(outcome.estimated_impact.affected_population)
        / hours;

    let max_possible = 100.0 * 100_000.0;
    (effectiveness / max_possible * 100.0).min(100.0).round() as u8
}

/// A suggested action with its rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedIntervention {
    pub action: InterventionKind,
    pub reason: String,
}

/// Actions worth considering at the current AQI level
#[must_use]
pub fn recommended_interventions(current_aqi: u16) -> Vec<RecommendedIntervention> {
    let suggestions: Vec<(InterventionKind, &str)> = if current_aqi <= 100 {
        vec![(
            InterventionKind::PublicAdvisory,
            "Maintain current good air quality",
        )]
    } else if current_aqi <= 200 {
        vec![
            (InterventionKind::TrafficControl, "Reduce vehicular emissions"),
            (InterventionKind::WaterSpray, "Suppress dust"),
        ]
    } else if current_aqi <= 300 {
        vec![
            (
                InterventionKind::VehicleRestriction,
                "Implement odd-even restrictions",
            ),
            (
                InterventionKind::ConstructionHalt,
                "Halt construction activities",
            ),
            (InterventionKind::WaterSpray, "Deploy water sprinklers"),
        ]
    } else {
        vec![
            (InterventionKind::VehicleRestriction, "Complete vehicle ban"),
            (
                InterventionKind::ConstructionHalt,
                "Emergency halt all construction",
            ),
            (InterventionKind::PublicAdvisory, "Issue health emergency"),
        ]
    };

    suggestions
        .into_iter()
        .map(|(action, reason)| RecommendedIntervention {
            action,
            reason: reason.to_string(),
        })
        .collect()
}

/// High-risk zones of a city that would benefit most from intervention
#[must_use]
pub fn priority_zones(city: &str) -> Vec<crate::zones::ZoneProfile> {
    high_risk_zones(city, 150)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_water_spray() {
        let outcome = simulate(InterventionKind::WaterSpray, 200, Some("Zone A"), None);
        // 15% of 200 = 30
        assert_eq!(outcome.aqi_reduction, 30);
        assert_eq!(outcome.aqi_after_action, 170);
        assert_eq!(outcome.reduction_percent, 15);
        assert_eq!(outcome.estimated_impact.duration_minutes, 60);
        assert_eq!(outcome.estimated_impact.affected_population, 15_000);
    }

    #[test]
    fn test_simulate_duration_override() {
        let outcome = simulate(InterventionKind::TrafficControl, 180, None, Some(90));
        assert_eq!(outcome.estimated_impact.duration_minutes, 90);
    }

    #[test]
    fn test_simulate_never_goes_negative() {
        let outcome = simulate(InterventionKind::VehicleRestriction, 1, None, None);
        assert!(outcome.aqi_after_action <= outcome.aqi_before_action);
    }

    #[test]
    fn test_unknown_zone_uses_default_population() {
        let outcome = simulate(InterventionKind::PublicAdvisory, 150, Some("Zone Z"), None);
        // 0.9 x 50_000
        assert_eq!(outcome.estimated_impact.affected_population, 45_000);
    }

    #[test]
    fn test_cost_effectiveness_bounded() {
        let outcome = simulate(InterventionKind::VehicleRestriction, 400, Some("Zone B"), None);
        let score = cost_effectiveness(&outcome);
        assert!(score <= 100);
    }

    #[test]
    fn test_recommended_interventions_escalate() {
        assert_eq!(recommended_interventions(80).len(), 1);
        assert_eq!(recommended_interventions(150).len(), 2);
        assert_eq!(recommended_interventions(250).len(), 3);

        let severe = recommended_interventions(400);
        assert!(
            severe
                .iter()
                .any(|r| r.action == InterventionKind::VehicleRestriction)
        );
    }

    #[test]
    fn test_action_parse_accepts_known_tags_only() {
        assert_eq!(
            InterventionKind::parse("water_spray"),
            Some(InterventionKind::WaterSpray)
        );
        assert_eq!(
            InterventionKind::parse("vehicle_restriction"),
            Some(InterventionKind::VehicleRestriction)
        );
        // "other" is a valid literal tag, not a sink for typos
        assert_eq!(InterventionKind::parse("other"), Some(InterventionKind::Other));
        assert_eq!(InterventionKind::parse("cloud_seeding"), None);
        assert_eq!(InterventionKind::parse(""), None);
    }

    #[test]
    fn test_literal_other_keeps_conservative_effectiveness() {
        let kind = InterventionKind::parse("other").unwrap();
        assert_eq!(kind.effectiveness().aqi_reduction_percent, 10);
    }
}
