//! City-level policy recommendations by AQI band
//!
//! Maps a current pollution index onto an escalation stage with concrete
//! policy actions, a public advisory, and affected target groups.

use serde::{Deserialize, Serialize};

/// AQI at which advisories begin
pub const ADVISORY_THRESHOLD: u16 = 101;
/// AQI at which restrictions begin
pub const RESTRICTIONS_THRESHOLD: u16 = 151;
/// AQI at which an emergency is declared
pub const EMERGENCY_THRESHOLD: u16 = 201;
/// AQI at which a severe emergency is declared
pub const SEVERE_EMERGENCY_THRESHOLD: u16 = 301;

/// Escalation stage of the policy response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyStage {
    NormalOperations,
    Advisory,
    Restrictions,
    Emergency,
    SevereEmergency,
}

impl PolicyStage {
    #[must_use]
    pub fn from_index(aqi: u16) -> Self {
        if aqi < ADVISORY_THRESHOLD {
            PolicyStage::NormalOperations
        } else if aqi < RESTRICTIONS_THRESHOLD {
            PolicyStage::Advisory
        } else if aqi < EMERGENCY_THRESHOLD {
            PolicyStage::Restrictions
        } else if aqi < SEVERE_EMERGENCY_THRESHOLD {
            PolicyStage::Emergency
        } else {
            PolicyStage::SevereEmergency
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PolicyStage::NormalOperations => "Normal Operations",
            PolicyStage::Advisory => "Advisory Stage",
            PolicyStage::Restrictions => "Restriction Stage",
            PolicyStage::Emergency => "Emergency Stage",
            PolicyStage::SevereEmergency => "Severe Emergency",
        }
    }

    /// Display color used by clients
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            PolicyStage::NormalOperations => "#10B981",
            PolicyStage::Advisory => "#F59E0B",
            PolicyStage::Restrictions => "#EF4444",
            PolicyStage::Emergency => "#7C3AED",
            PolicyStage::SevereEmergency => "#991B1B",
        }
    }
}

/// Full policy recommendation set for an AQI level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecommendations {
    pub stage: PolicyStage,
    pub level: String,
    pub color: String,
    pub policies: Vec<String>,
    pub public_advisory: String,
    pub target_groups: Vec<String>,
}

/// Policy recommendations for the current pollution index
#[must_use]
pub fn recommendations_for(aqi: u16) -> PolicyRecommendations {
    let stage = PolicyStage::from_index(aqi);

    let (policies, public_advisory, target_groups): (Vec<&str>, &str, Vec<&str>) = match stage {
        PolicyStage::NormalOperations => (
            vec![
                "Continue regular monitoring",
                "Maintain green cover",
                "Promote public transport usage",
            ],
            "Air quality is satisfactory. Normal outdoor activities are safe.",
            vec!["General public: No restrictions"],
        ),
        PolicyStage::Advisory => (
            vec![
                "Issue public health advisory",
                "Increase frequency of air quality monitoring",
                "Reduce construction dust through water spraying",
                "Enforce strict pollution control in industries",
            ],
            "Air quality may cause breathing discomfort. Sensitive groups should limit outdoor exertion.",
            vec![
                "Children and elderly: Limit outdoor activities",
                "People with asthma/respiratory issues: Take precautions",
                "General public: Reduce prolonged exposure",
            ],
        ),
        PolicyStage::Restrictions => (
            vec![
                "Implement odd-even vehicle restrictions",
                "Ban diesel generators",
                "Stop/regulate construction activities",
                "Increase public transport frequency",
                "Deploy water sprinklers at major roads",
                "Enforce strict penalties for open burning",
                "Close schools if AQI persists",
            ],
            "Air quality is unhealthy for everyone. Reduce outdoor exertion. Wear N95 masks.",
            vec![
                "Schools: Consider closure or indoor activities only",
                "Outdoor workers: Provide protective equipment",
                "Vulnerable groups: Stay indoors",
                "General public: Minimize outdoor exposure",
            ],
        ),
        PolicyStage::Emergency => (
            vec![
                "Declare air quality emergency",
                "Close schools and educational institutions",
                "Implement complete vehicle restrictions",
                "Halt all construction and demolition",
                "Shut down polluting industries",
                "Deploy anti-smog guns",
                "Emergency road cleaning and water sprinkling",
                "Ban entry of heavy vehicles",
                "Work from home advisory for offices",
            ],
            "Health alert: Everyone may experience health effects. Stay indoors and use air purifiers.",
            vec![
                "Schools: Mandatory closure",
                "Offices: Work from home",
                "Hospitals: Increase emergency preparedness",
                "All citizens: Stay indoors, use air purifiers",
            ],
        ),
        PolicyStage::SevereEmergency => (
            vec![
                "Declare public health emergency",
                "Complete lockdown of non-essential activities",
                "Close all schools, colleges, and offices",
                "Ban all construction activities indefinitely",
                "Restrict all vehicles except emergency services",
                "Deploy cloud seeding if feasible",
                "Distribute masks to vulnerable populations",
                "Set up medical camps",
                "Coordinate with neighboring states",
            ],
            "SEVERE HEALTH EMERGENCY: Remain indoors at all times. Seal windows. Use air purifiers.",
            vec![
                "All citizens: Stay indoors mandatory",
                "Hospitals: Emergency mode",
                "Essential services only: Provide N95+ masks",
            ],
        ),
    };

    let mut policies: Vec<String> = policies.into_iter().map(String::from).collect();

    // Common alert machinery once the advisory threshold is crossed
    if aqi >= ADVISORY_THRESHOLD {
        policies.extend(
            [
                "Real-time AQI display at public places",
                "SMS/app alerts to citizens",
                "Increase medical staff at hospitals",
            ]
            .map(String::from),
        );
    }

    PolicyRecommendations {
        stage,
        level: stage.label().to_string(),
        color: stage.color().to_string(),
        policies,
        public_advisory: public_advisory.to_string(),
        target_groups: target_groups.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, PolicyStage::NormalOperations)]
    #[case(100, PolicyStage::NormalOperations)]
    #[case(101, PolicyStage::Advisory)]
    #[case(150, PolicyStage::Advisory)]
    #[case(151, PolicyStage::Restrictions)]
    #[case(200, PolicyStage::Restrictions)]
    #[case(201, PolicyStage::Emergency)]
    #[case(300, PolicyStage::Emergency)]
    #[case(301, PolicyStage::SevereEmergency)]
    #[case(500, PolicyStage::SevereEmergency)]
    fn test_stage_thresholds(#[case] aqi: u16, #[case] expected: PolicyStage) {
        assert_eq!(PolicyStage::from_index(aqi), expected);
    }

    #[test]
    fn test_normal_operations_skip_alert_machinery() {
        let recommendations = recommendations_for(80);
        assert_eq!(recommendations.stage, PolicyStage::NormalOperations);
        assert!(
            !recommendations
                .policies
                .iter()
                .any(|p| p.contains("SMS/app alerts"))
        );
    }

    #[test]
    fn test_advisory_adds_alert_machinery() {
        let recommendations = recommendations_for(120);
        assert_eq!(recommendations.stage, PolicyStage::Advisory);
        assert!(
            recommendations
                .policies
                .iter()
                .any(|p| p.contains("SMS/app alerts"))
        );
    }

    #[test]
    fn test_severe_emergency_content() {
        let recommendations = recommendations_for(450);
        assert_eq!(recommendations.level, "Severe Emergency");
        assert!(recommendations.public_advisory.contains("SEVERE"));
        assert!(!recommendations.target_groups.is_empty());
    }
}
