//! Route ranking and labeling
//!
//! Orders candidate routes by ascending exposure score and relabels the top
//! three positionally, overwriting whatever names the routing provider
//! assigned.

use crate::routes::finder::PlannedRoute;

pub const CLEANEST_ROUTE_LABEL: &str = "Cleanest Air Route";
pub const BALANCED_ROUTE_LABEL: &str = "Balanced Route";
pub const FASTEST_ROUTE_LABEL: &str = "Fastest Route";

/// Stable sort by ascending exposure score, then positional relabeling:
/// the cleanest route is flagged as recommended, the next two get fixed
/// labels, and any further routes keep their provider-assigned names.
#[must_use]
pub fn rank_routes(mut routes: Vec<PlannedRoute>) -> Vec<PlannedRoute> {
    routes.sort_by_key(|route| route.exposure.exposure_score);

    if let Some(first) = routes.first_mut() {
        first.name = CLEANEST_ROUTE_LABEL.to_string();
        first.recommended = true;
    }
    if let Some(second) = routes.get_mut(1) {
        second.name = BALANCED_ROUTE_LABEL.to_string();
    }
    if let Some(third) = routes.get_mut(2) {
        third.name = FASTEST_ROUTE_LABEL.to_string();
    }

    routes
}
