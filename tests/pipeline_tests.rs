//! End-to-end tests over the pure exposure pipeline: formula, station
//! resolution, route aggregation, ranking, and zone comparison, wired
//! together the way the HTTP handlers use them.

use rstest::rstest;

use airimpact::exposure::{RiskTier, compute_exposure};
use airimpact::models::aqi::StationReading;
use airimpact::models::geo::{GeoPoint, RouteGeometry};
use airimpact::models::profile::{Activity, AgeGroup, HealthCondition};
use airimpact::routes::cost::{
    FALLBACK_POLLUTION_INDEX, aggregate_route_exposure, nearest_pollution_index,
};
use airimpact::routes::finder::PlannedRoute;
use airimpact::routes::rank::{
    BALANCED_ROUTE_LABEL, CLEANEST_ROUTE_LABEL, FASTEST_ROUTE_LABEL, rank_routes,
};
use airimpact::routes::{RouteExposureResult, TravelMode};
use airimpact::zones::{NamedZoneRoute, ZoneLeg, compare_routes};

fn station(lat: f64, lng: f64, index: u16) -> StationReading {
    StationReading::new(GeoPoint::new(lat, lng), index, "station")
}

fn planned_route(id: usize, score: u32) -> PlannedRoute {
    PlannedRoute {
        id,
        name: format!("Alternative {id}"),
        mode: TravelMode::Cycling,
        recommended: false,
        duration_minutes: 20,
        exposure: RouteExposureResult {
            exposure_score: score,
            average_index: 140,
            min_index: 90,
            max_index: 220,
            distance_km: 4.0,
        },
        geometry: RouteGeometry::new(vec![]),
    }
}

#[test]
fn reference_walk_is_low_risk() {
    // AQI 100, 30 minutes of walking, healthy adult: 100 * 30 * 1.3 = 3900
    let result = compute_exposure(100, 30.0, Activity::Walking, AgeGroup::Adult, &[]);
    assert_eq!(result.score, 3900);
    assert_eq!(result.risk_tier, RiskTier::Low);
}

#[test]
fn worst_condition_dominates_and_crosses_tier() {
    let result = compute_exposure(
        100,
        30.0,
        Activity::Walking,
        AgeGroup::Adult,
        &[HealthCondition::Asthma, HealthCondition::Copd],
    );
    // max(1.6, 1.8), never the product: 3900 * 1.8 = 7020
    assert_eq!(result.score, 7020);
    assert_eq!(result.risk_tier, RiskTier::Moderate);
}

#[rstest]
#[case("flying")]
#[case("swimming")]
#[case("")]
fn unknown_activity_tags_degrade_to_neutral(#[case] tag: &str) {
    let unknown = compute_exposure(180, 45.0, Activity::parse(tag), AgeGroup::Adult, &[]);
    let resting = compute_exposure(180, 45.0, Activity::Resting, AgeGroup::Adult, &[]);
    assert_eq!(unknown.score, resting.score);
}

#[test]
fn empty_station_list_resolves_to_fallback_index() {
    let point = GeoPoint::new(28.61, 77.20);
    assert_eq!(
        nearest_pollution_index(&point, &[]),
        FALLBACK_POLLUTION_INDEX
    );
}

#[test]
fn single_point_route_has_zero_distance_and_fallback_average() {
    let geometry = RouteGeometry::new(vec![GeoPoint::new(28.61, 77.20)]);
    let stations = vec![station(28.62, 77.21, 250)];

    let result = aggregate_route_exposure(&geometry, &stations, &[]);
    assert_eq!(result.distance_km, 0.0);
    assert_eq!(result.exposure_score, 0);
    assert_eq!(result.average_index, FALLBACK_POLLUTION_INDEX);
}

#[test]
fn route_through_cleaner_air_scores_lower() {
    let clean = RouteGeometry::new(vec![
        GeoPoint::new(28.6000, 77.1000),
        GeoPoint::new(28.6300, 77.1000),
    ]);
    let dirty = RouteGeometry::new(vec![
        GeoPoint::new(28.6000, 77.3000),
        GeoPoint::new(28.6300, 77.3000),
    ]);
    let stations = vec![station(28.615, 77.10, 60), station(28.615, 77.30, 320)];

    let clean_result = aggregate_route_exposure(&clean, &stations, &[]);
    let dirty_result = aggregate_route_exposure(&dirty, &stations, &[]);

    assert!(clean_result.exposure_score < dirty_result.exposure_score);
    assert_eq!(clean_result.average_index, 60);
    assert_eq!(dirty_result.average_index, 320);
}

#[test]
fn health_conditions_scale_route_exposure() {
    let geometry = RouteGeometry::new(vec![
        GeoPoint::new(28.6000, 77.2000),
        GeoPoint::new(28.6300, 77.2000),
    ]);
    let stations = vec![station(28.615, 77.20, 100)];

    let healthy = aggregate_route_exposure(&geometry, &stations, &[]);
    let asthmatic = aggregate_route_exposure(&geometry, &stations, &[HealthCondition::Asthma]);

    let ratio = f64::from(asthmatic.exposure_score) / f64::from(healthy.exposure_score);
    assert!((ratio - 1.6).abs() < 0.02, "ratio was {ratio}");
}

#[test]
fn ranking_orders_by_score_and_relabels_top_three() {
    let ranked = rank_routes(vec![
        planned_route(0, 8000),
        planned_route(1, 3000),
        planned_route(2, 12000),
    ]);

    let scores: Vec<u32> = ranked.iter().map(|r| r.exposure.exposure_score).collect();
    assert_eq!(scores, vec![3000, 8000, 12000]);
    assert_eq!(ranked[0].name, CLEANEST_ROUTE_LABEL);
    assert!(ranked[0].recommended);
    assert_eq!(ranked[1].name, BALANCED_ROUTE_LABEL);
    assert_eq!(ranked[2].name, FASTEST_ROUTE_LABEL);
    assert_eq!(ranked.iter().filter(|r| r.recommended).count(), 1);
}

#[test]
fn ranking_is_stable_for_tied_scores() {
    let ranked = rank_routes(vec![planned_route(0, 5000), planned_route(1, 5000)]);
    assert_eq!(ranked[0].id, 0);
    assert_eq!(ranked[1].id, 1);
}

#[test]
fn zone_comparison_prefers_lower_cumulative_cost() {
    let leg = |name: &str, aqi: u16, minutes: f64| ZoneLeg {
        name: name.to_string(),
        aqi,
        time_minutes: minutes,
    };

    let comparison = compare_routes(&[
        NamedZoneRoute {
            name: "Highway".to_string(),
            zones: vec![leg("Industrial belt", 280, 15.0), leg("Ring road", 190, 10.0)],
            activity: Activity::Cycling,
        },
        NamedZoneRoute {
            name: "Riverside".to_string(),
            zones: vec![leg("Park strip", 90, 20.0), leg("Old town", 120, 12.0)],
            activity: Activity::Cycling,
        },
    ]);

    assert_eq!(comparison.best_route, "Riverside");
    let best = comparison
        .comparison
        .iter()
        .find(|r| r.route_name == "Riverside")
        .unwrap();
    assert_eq!(best.percentage_diff, 0);
    let other = comparison
        .comparison
        .iter()
        .find(|r| r.route_name == "Highway")
        .unwrap();
    assert!(other.percentage_diff > 0);
}

#[rstest]
#[case(TravelMode::Walking, 5.0, 60)]
#[case(TravelMode::Cycling, 15.0, 60)]
#[case(TravelMode::Driving, 30.0, 60)]
fn duration_estimates_follow_mode_speed(
    #[case] mode: TravelMode,
    #[case] distance_km: f64,
    #[case] expected_minutes: u32,
) {
    assert_eq!(mode.estimate_minutes(distance_km), expected_minutes);
}
