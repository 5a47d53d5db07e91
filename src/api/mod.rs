//! HTTP API surface
//!
//! JSON endpoints over the exposure, route, policy, intervention, and
//! suggestion cores. Every response uses the same envelope: `{"success":
//! true, "data": ...}` on success, `{"success": false, "message": ...}`
//! with an appropriate status code on failure. Request validation happens
//! here; the cores below assume validated input.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AirImpactError;
use crate::cache::PersistentCache;
use crate::exposure::{compute_exposure, health_impact};
use crate::intervention::{
    self, InterventionKind, cost_effectiveness, recommended_interventions,
};
use crate::models::aqi::{AqiCategory, AqiObservation, Pollutants};
use crate::models::profile::{Activity, AgeGroup, HealthCondition, UserExposureProfile};
use crate::policy::recommendations_for;
use crate::providers::llm::{
    GroqClient, SuggestionContext, SuggestionProvider, personalized_suggestions,
};
use crate::providers::mapbox::MapboxClient;
use crate::providers::waqi::WaqiClient;
use crate::routes::{TravelMode, find_clean_routes};
use crate::zones::{NamedZoneRoute, ZoneLeg, compare_routes, route_cost};

/// Shared handler state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<PersistentCache>,
    pub mapbox: Arc<MapboxClient>,
    /// Present only when an AQI API key is configured
    pub waqi: Option<Arc<WaqiClient>>,
    /// Present only when an LLM API key is configured
    pub llm: Option<Arc<GroqClient>>,
}

impl AppState {
    fn waqi(&self) -> Result<&WaqiClient, ApiError> {
        self.waqi.as_deref().ok_or_else(|| {
            ApiError::from(AirImpactError::config(
                "AQI API key is not configured; live air-quality data is unavailable",
            ))
        })
    }
}

/// Error wrapper that renders the failure envelope.
///
/// Validation errors map to 400, upstream-provider failures to 502,
/// everything else to 500. The wire message is always the user-facing one;
/// the full chain goes to the log.
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.downcast_ref::<AirImpactError>() {
            Some(err @ AirImpactError::Validation { .. }) => {
                (StatusCode::BAD_REQUEST, err.user_message())
            }
            Some(err @ AirImpactError::Upstream { .. }) => {
                (StatusCode::BAD_GATEWAY, err.user_message())
            }
            Some(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.user_message()),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred. Please try again later.".to_string(),
            ),
        };

        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

fn ok(data: serde_json::Value) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

fn validation(message: impl Into<String>) -> ApiError {
    ApiError::from(AirImpactError::validation(message))
}

/// All `/api` routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/aqi/{city}", get(city_aqi))
        .route("/exposure/calculate", post(calculate_exposure))
        .route("/routes/find", post(find_routes))
        .route("/routes/cost", post(zone_route_cost))
        .route("/routes/compare", post(zone_route_compare))
        .route("/policy/{city}", get(city_policy))
        .route("/interventions/simulate", post(simulate_intervention))
        .route("/suggestions", post(suggestions))
        .with_state(state)
}

async fn city_aqi(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if city.trim().is_empty() {
        return Err(validation("City name is required"));
    }

    let observation = state.waqi()?.city_feed(&city).await?;

    Ok(ok(json!({
        "city": observation.city,
        "aqi": observation.index,
        "category": observation.category.label(),
        "color": observation.category.color(),
        "dominant_pollutant": observation.dominant_pollutant,
        "pollutants": observation.pollutants,
        "timestamp": observation.timestamp,
        "source": observation.source,
    })))
}

#[derive(Debug, Deserialize)]
struct ExposureRequest {
    city: Option<String>,
    aqi: Option<u16>,
    time_minutes: Option<f64>,
    activity: Option<String>,
    #[serde(default)]
    age_group: Option<AgeGroup>,
    #[serde(default)]
    health_conditions: Vec<HealthCondition>,
}

impl ExposureRequest {
    /// Resolve the pollution index: an explicit AQI wins, otherwise the
    /// city's live reading.
    async fn resolve_index(&self, state: &AppState) -> Result<u16, ApiError> {
        if let Some(aqi) = self.aqi {
            if aqi > 500 {
                return Err(validation("AQI must be between 0 and 500"));
            }
            return Ok(aqi);
        }

        let city = self
            .city
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| validation("Either a city or an AQI value is required"))?;

        Ok(state.waqi()?.city_feed(city).await?.index)
    }

    fn resolve_duration(&self) -> Result<f64, ApiError> {
        match self.time_minutes {
            Some(minutes) if minutes > 0.0 && minutes.is_finite() => Ok(minutes),
            Some(_) => Err(validation("Exposure time must be a positive number of minutes")),
            None => Err(validation("Exposure time in minutes is required")),
        }
    }

    fn resolve_activity(&self) -> Result<Activity, ApiError> {
        let tag = self
            .activity
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| validation("Activity is required"))?;
        Ok(Activity::parse(tag))
    }
}

async fn calculate_exposure(
    State(state): State<AppState>,
    Json(request): Json<ExposureRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let index = request.resolve_index(&state).await?;
    let duration = request.resolve_duration()?;
    let activity = request.resolve_activity()?;
    let age_group = request.age_group.unwrap_or(AgeGroup::Unspecified);

    let result = compute_exposure(
        index,
        duration,
        activity,
        age_group,
        &request.health_conditions,
    );
    let impact = health_impact(result.score, age_group, &request.health_conditions);

    Ok(ok(json!({
        "exposure_score": result.score,
        "risk_level": result.risk_tier,
        "explanation": result.risk_tier.explanation(),
        "health_impact": impact,
        "breakdown": result.breakdown,
    })))
}

#[derive(Debug, Deserialize)]
struct FindRoutesRequest {
    from: Option<String>,
    to: Option<String>,
    mode: Option<String>,
    mapbox_token: Option<String>,
    #[serde(default)]
    profile: UserExposureProfile,
}

async fn find_routes(
    State(state): State<AppState>,
    Json(request): Json<FindRoutesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let from = request
        .from
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| validation("Origin location is required"))?;
    let to = request
        .to
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| validation("Destination location is required"))?;
    let token = request
        .mapbox_token
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| validation("A Mapbox access token is required"))?;
    let mode = request
        .mode
        .as_deref()
        .and_then(TravelMode::parse)
        .ok_or_else(|| validation("Mode must be: driving, walking, or cycling"))?;

    let waqi = state.waqi()?;
    let plan = find_clean_routes(
        &state.mapbox,
        waqi,
        from,
        to,
        mode,
        &request.profile,
        token,
    )
    .await?;

    Ok(ok(json!({
        "from": plan.from,
        "to": plan.to,
        "routes": plan.routes,
        "stations_used": plan.stations.len(),
    })))
}

#[derive(Debug, Deserialize)]
struct ZoneCostRequest {
    #[serde(default)]
    zones: Vec<ZoneLeg>,
    activity: Option<String>,
}

async fn zone_route_cost(
    Json(request): Json<ZoneCostRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.zones.is_empty() {
        return Err(validation("At least one zone is required"));
    }

    let activity = request
        .activity
        .as_deref()
        .map_or(Activity::Walking, Activity::parse);
    let cost = route_cost(&request.zones, activity);

    Ok(ok(serde_json::to_value(cost)?))
}

#[derive(Debug, Deserialize)]
struct CompareRoutesRequest {
    #[serde(default)]
    routes: Vec<NamedZoneRoute>,
}

async fn zone_route_compare(
    Json(request): Json<CompareRoutesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.routes.len() < 2 {
        return Err(validation("At least two routes are required for comparison"));
    }

    if request.routes.iter().any(|route| route.zones.is_empty()) {
        return Err(validation("Every route must contain at least one zone"));
    }

    let comparison = compare_routes(&request.routes);

    Ok(ok(serde_json::to_value(comparison)?))
}

async fn city_policy(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if city.trim().is_empty() {
        return Err(validation("City name is required"));
    }

    let observation = state.waqi()?.city_feed(&city).await?;
    let recommendations = recommendations_for(observation.index);
    let interventions = recommended_interventions(observation.index);

    Ok(ok(json!({
        "city": observation.city,
        "current_aqi": observation.index,
        "recommendations": recommendations,
        "suggested_interventions": interventions,
    })))
}

#[derive(Debug, Deserialize)]
struct SimulateRequest {
    action_type: Option<String>,
    city: Option<String>,
    aqi_before: Option<i64>,
    description: Option<String>,
    zone: Option<String>,
    duration_minutes: Option<u32>,
}

async fn simulate_intervention(
    Json(request): Json<SimulateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let action_tag = request
        .action_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| validation("Action type is required"))?;
    let city = request
        .city
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| validation("City is required"))?;
    request
        .description
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| validation("Description is required"))?;

    let aqi_before = match request.aqi_before {
        Some(aqi) if (1..=500).contains(&aqi) => aqi as u16,
        Some(_) => return Err(validation("AQI must be a positive value between 1 and 500")),
        None => return Err(validation("Current AQI is required")),
    };

    let action = InterventionKind::parse(action_tag).ok_or_else(|| {
        validation(
            "Action type must be one of: water_spray, traffic_control, construction_halt, \
             vehicle_restriction, public_advisory, other",
        )
    })?;

    let outcome = intervention::simulate(
        action,
        aqi_before,
        request.zone.as_deref(),
        request.duration_minutes,
    );
    let effectiveness_score = cost_effectiveness(&outcome);
    let priority_zones = intervention::priority_zones(city);

    Ok(ok(json!({
        "simulation": outcome,
        "cost_effectiveness_score": effectiveness_score,
        "priority_zones": priority_zones,
    })))
}

#[derive(Debug, Deserialize)]
struct SuggestionsRequest {
    city: Option<String>,
    aqi: Option<u16>,
    time_minutes: Option<f64>,
    activity: Option<String>,
    #[serde(default)]
    profile: UserExposureProfile,
}

async fn suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let duration = match request.time_minutes {
        Some(minutes) if minutes > 0.0 && minutes.is_finite() => minutes,
        Some(_) => return Err(validation("Exposure time must be a positive number of minutes")),
        None => return Err(validation("Exposure time in minutes is required")),
    };
    let activity = request
        .activity
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .map_or(Activity::Walking, Activity::parse);

    // An explicit AQI becomes a synthetic observation; otherwise live data
    let observation = match request.aqi {
        Some(aqi) if aqi <= 500 => {
            let city = request
                .city
                .clone()
                .or_else(|| request.profile.city.clone())
                .unwrap_or_else(|| "your area".to_string());
            AqiObservation {
                city,
                index: aqi,
                category: AqiCategory::from_index(aqi),
                dominant_pollutant: "PM2.5".to_string(),
                pollutants: Pollutants::default(),
                timestamp: Utc::now(),
                source: "user-supplied".to_string(),
            }
        }
        Some(_) => return Err(validation("AQI must be between 0 and 500")),
        None => {
            let city = request
                .city
                .as_deref()
                .or(request.profile.city.as_deref())
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| validation("Either a city or an AQI value is required"))?;
            state.waqi()?.city_feed(city).await?
        }
    };

    let exposure = compute_exposure(
        observation.index,
        duration,
        activity,
        request.profile.age_group,
        &request.profile.health_conditions,
    );

    let context = SuggestionContext {
        profile: &request.profile,
        observation: &observation,
        exposure: &exposure,
        activity,
        duration_minutes: duration,
    };

    let provider = state.llm.as_deref().map(|c| c as &dyn SuggestionProvider);
    let suggestions = personalized_suggestions(provider, &context).await;

    Ok(ok(json!({
        "suggestions": suggestions,
        "exposure_score": exposure.score,
        "risk_level": exposure.risk_tier,
        "aqi": observation.index,
        "city": observation.city,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate_request(action: &str) -> SimulateRequest {
        SimulateRequest {
            action_type: Some(action.to_string()),
            city: Some("Delhi".to_string()),
            aqi_before: Some(200),
            description: Some("scheduled road wash".to_string()),
            zone: None,
            duration_minutes: None,
        }
    }

    fn is_validation(err: &ApiError) -> bool {
        matches!(
            err.0.downcast_ref::<AirImpactError>(),
            Some(AirImpactError::Validation { .. })
        )
    }

    #[tokio::test]
    async fn test_simulate_rejects_unknown_action_type() {
        let result = simulate_intervention(Json(simulate_request("cloud_seeding"))).await;
        let err = result.err().expect("unknown action must be rejected");
        assert!(is_validation(&err));
    }

    #[tokio::test]
    async fn test_simulate_accepts_literal_other_action() {
        let result = simulate_intervention(Json(simulate_request("other"))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_simulate_rejects_out_of_range_aqi() {
        let mut request = simulate_request("water_spray");
        request.aqi_before = Some(900);
        let err = simulate_intervention(Json(request))
            .await
            .err()
            .expect("AQI above 500 must be rejected");
        assert!(is_validation(&err));
    }
}
