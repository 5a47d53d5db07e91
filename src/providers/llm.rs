//! LLM-backed personalized suggestions
//!
//! Asks an OpenAI-compatible chat endpoint (Groq) for exactly five short
//! recommendations tailored to the user's exposure result. The provider is
//! optional and unreliable by nature, so every failure mode lands on a
//! fixed tier-aware fallback list; callers always get five suggestions.

use async_trait::async_trait;
use anyhow::Result;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::AirImpactError;
use crate::config::LlmConfig;
use crate::exposure::ExposureResult;
use crate::models::aqi::AqiObservation;
use crate::models::profile::{Activity, HealthCondition, UserExposureProfile};
use crate::providers::http_client;

const SERVICE_NAME: &str = "Groq";
const SUGGESTION_COUNT: usize = 5;

/// Everything the suggestion prompt needs about the current situation
#[derive(Debug, Clone)]
pub struct SuggestionContext<'a> {
    pub profile: &'a UserExposureProfile,
    pub observation: &'a AqiObservation,
    pub exposure: &'a ExposureResult,
    pub activity: Activity,
    pub duration_minutes: f64,
}

/// Source of personalized suggestion text
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggestions(&self, context: &SuggestionContext<'_>) -> Result<Vec<String>>;
}

pub struct GroqClient {
    http: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GroqClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            http: http_client(config.timeout_seconds, 1)?,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_user_prompt(context: &SuggestionContext<'_>) -> String {
        let conditions = if context.profile.health_conditions.is_empty()
            || context
                .profile
                .health_conditions
                .iter()
                .all(|c| *c == HealthCondition::None)
        {
            "none reported".to_string()
        } else {
            context
                .profile
                .health_conditions
                .iter()
                .filter(|c| **c != HealthCondition::None)
                .map(|c| format!("{c:?}").to_lowercase())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let age = context
            .profile
            .age
            .map_or_else(|| context.profile.age_group.label().to_string(), |a| {
                a.to_string()
            });

        format!(
            "City: {city}\n\
             Current AQI: {aqi} ({category})\n\
             Dominant pollutant: {pollutant}\n\
             Planned activity: {activity} for {minutes:.0} minutes\n\
             Age: {age}\n\
             Health conditions: {conditions}\n\
             Computed exposure score: {score} (risk level: {tier:?})\n\n\
             Give exactly {count} short, specific, actionable suggestions for this person.",
            city = context.observation.city,
            aqi = context.observation.index,
            category = context.observation.category.label(),
            pollutant = context.observation.dominant_pollutant,
            activity = context.activity.label(),
            minutes = context.duration_minutes,
            score = context.exposure.score,
            tier = context.exposure.risk_tier,
            count = SUGGESTION_COUNT,
        )
    }
}

#[async_trait]
impl SuggestionProvider for GroqClient {
    #[instrument(skip(self, context), fields(city = %context.observation.city))]
    async fn suggestions(&self, context: &SuggestionContext<'_>) -> Result<Vec<String>> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: format!(
                        "You are an air-quality health advisor. Respond with ONLY a JSON \
                         array of exactly {SUGGESTION_COUNT} strings, each a single \
                         practical suggestion under 120 characters. No markdown, no \
                         surrounding text."
                    ),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_user_prompt(context),
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AirImpactError::upstream(SERVICE_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AirImpactError::upstream(
                SERVICE_NAME,
                format!("completion failed with HTTP {}", response.status()),
            )
            .into());
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            AirImpactError::upstream(SERVICE_NAME, format!("malformed completion payload: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AirImpactError::upstream(SERVICE_NAME, "completion has no choices"))?;

        let suggestions = parse_suggestions(&content).ok_or_else(|| {
            AirImpactError::upstream(SERVICE_NAME, "completion was not a usable suggestion list")
        })?;

        debug!("Provider produced {} suggestions", suggestions.len());
        Ok(suggestions)
    }
}

/// Extract exactly five suggestion strings from model output.
///
/// Tries the whole content as a JSON array first, then the substring
/// between the first '[' and the last ']' since models like to wrap the
/// array in prose or code fences. Anything short of five usable strings
/// is rejected.
pub(crate) fn parse_suggestions(content: &str) -> Option<Vec<String>> {
    let candidates = std::iter::once(content.trim()).chain(
        content
            .find('[')
            .zip(content.rfind(']'))
            .filter(|(start, end)| start < end)
            .map(|(start, end)| &content[start..=end]),
    );

    for candidate in candidates {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(candidate) {
            let items: Vec<String> = items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if items.len() >= SUGGESTION_COUNT {
                return Some(items.into_iter().take(SUGGESTION_COUNT).collect());
            }
        }
    }

    None
}

/// Fixed suggestions for when no LLM is configured or the call fails
#[must_use]
pub fn fallback_suggestions(context: &SuggestionContext<'_>) -> Vec<String> {
    use crate::exposure::RiskTier;

    let mut suggestions: Vec<String> = match context.exposure.risk_tier {
        RiskTier::Low => vec![
            "Air quality is acceptable for your planned activity.".to_string(),
            "Stay hydrated during outdoor activities.".to_string(),
        ],
        RiskTier::Moderate => vec![
            "Consider shortening your outdoor activity if you feel discomfort.".to_string(),
            "Prefer less busy roads to reduce direct exhaust exposure.".to_string(),
        ],
        RiskTier::High => vec![
            "Wear an N95 mask for your outdoor activity.".to_string(),
            "Reduce the intensity of your activity to lower your breathing rate.".to_string(),
        ],
        RiskTier::VeryHigh | RiskTier::Hazardous => vec![
            "Postpone outdoor activities until air quality improves.".to_string(),
            "Stay indoors with windows closed and use an air purifier if available.".to_string(),
        ],
    };

    if context
        .profile
        .health_conditions
        .iter()
        .any(|c| matches!(c, HealthCondition::Asthma | HealthCondition::Copd))
    {
        suggestions.push("Keep your inhaler or prescribed medication with you.".to_string());
    } else {
        suggestions.push("Monitor how you feel and move indoors if symptoms appear.".to_string());
    }

    suggestions.push(format!(
        "Check the AQI again before heading out; it is currently {} in {}.",
        context.observation.index, context.observation.city
    ));
    suggestions.push("Plan outdoor time for early morning when pollution tends to dip.".to_string());

    suggestions.truncate(SUGGESTION_COUNT);
    suggestions
}

/// Personalized suggestions that never fail: the provider result when it
/// yields a usable list, the fixed fallback otherwise.
pub async fn personalized_suggestions(
    provider: Option<&dyn SuggestionProvider>,
    context: &SuggestionContext<'_>,
) -> Vec<String> {
    if let Some(provider) = provider {
        match provider.suggestions(context).await {
            Ok(suggestions) if suggestions.len() == SUGGESTION_COUNT => return suggestions,
            Ok(suggestions) => {
                warn!(
                    "Suggestion provider returned {} items, using fallback",
                    suggestions.len()
                );
            }
            Err(e) => {
                warn!("Suggestion provider failed, using fallback: {e}");
            }
        }
    }

    fallback_suggestions(context)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::compute_exposure;
    use crate::models::aqi::{AqiCategory, AqiObservation, Pollutants};
    use crate::models::profile::AgeGroup;
    use chrono::Utc;

    fn observation(index: u16) -> AqiObservation {
        AqiObservation {
            city: "Delhi".to_string(),
            index,
            category: AqiCategory::from_index(index),
            dominant_pollutant: "pm25".to_string(),
            pollutants: Pollutants::default(),
            timestamp: Utc::now(),
            source: "WAQI".to_string(),
        }
    }

    #[test]
    fn test_parse_suggestions_plain_array() {
        let content = r#"["a", "b", "c", "d", "e"]"#;
        let parsed = parse_suggestions(content).unwrap();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0], "a");
    }

    #[test]
    fn test_parse_suggestions_wrapped_in_prose() {
        let content = "Here are your suggestions:\n```json\n[\"one\", \"two\", \"three\", \"four\", \"five\"]\n```";
        let parsed = parse_suggestions(content).unwrap();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[4], "five");
    }

    #[test]
    fn test_parse_suggestions_truncates_extras() {
        let content = r#"["1", "2", "3", "4", "5", "6", "7"]"#;
        assert_eq!(parse_suggestions(content).unwrap().len(), 5);
    }

    #[test]
    fn test_parse_suggestions_rejects_short_lists() {
        assert!(parse_suggestions(r#"["only", "three", "items"]"#).is_none());
        assert!(parse_suggestions("no json here").is_none());
        assert!(parse_suggestions("[1, 2, 3, 4, 5]").is_none());
    }

    #[tokio::test]
    async fn test_fallback_always_yields_five() {
        let profile = UserExposureProfile::default();
        let observation = observation(180);

        for (index, minutes) in [(50u16, 10.0), (180, 60.0), (400, 240.0)] {
            let exposure = compute_exposure(index, minutes, Activity::Running, AgeGroup::Adult, &[]);
            let context = SuggestionContext {
                profile: &profile,
                observation: &observation,
                exposure: &exposure,
                activity: Activity::Running,
                duration_minutes: minutes,
            };
            let suggestions = personalized_suggestions(None, &context).await;
            assert_eq!(suggestions.len(), 5);
        }
    }

    #[test]
    fn test_fallback_mentions_medication_for_respiratory_conditions() {
        let profile = UserExposureProfile {
            age_group: AgeGroup::Adult,
            health_conditions: vec![HealthCondition::Asthma],
            age: Some(34),
            city: Some("Delhi".to_string()),
        };
        let observation = observation(220);
        let exposure = compute_exposure(
            220,
            45.0,
            Activity::Cycling,
            AgeGroup::Adult,
            &profile.health_conditions,
        );
        let context = SuggestionContext {
            profile: &profile,
            observation: &observation,
            exposure: &exposure,
            activity: Activity::Cycling,
            duration_minutes: 45.0,
        };

        let suggestions = fallback_suggestions(&context);
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions.iter().any(|s| s.contains("inhaler")));
    }

    #[test]
    fn test_user_prompt_carries_profile_details() {
        let profile = UserExposureProfile {
            age_group: AgeGroup::Senior,
            health_conditions: vec![HealthCondition::Copd],
            age: Some(68),
            city: Some("Delhi".to_string()),
        };
        let observation = observation(260);
        let exposure = compute_exposure(
            260,
            30.0,
            Activity::Walking,
            AgeGroup::Senior,
            &profile.health_conditions,
        );
        let context = SuggestionContext {
            profile: &profile,
            observation: &observation,
            exposure: &exposure,
            activity: Activity::Walking,
            duration_minutes: 30.0,
        };

        let prompt = GroqClient::build_user_prompt(&context);
        assert!(prompt.contains("Current AQI: 260"));
        assert!(prompt.contains("copd"));
        assert!(prompt.contains("Age: 68"));
        assert!(prompt.contains("walking for 30 minutes"));
    }
}
