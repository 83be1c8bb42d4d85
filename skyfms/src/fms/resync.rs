//! Active-leg resynchronization.
//!
//! Runs once per installed plan, on the first valid position fix, and
//! reconciles the active-leg index with where the aircraft actually is.
//! Covers mid-flight restarts: a plan installed while airborne must not
//! restart guidance from the first waypoint.

use tracing::info;

use super::state::FmsState;
use crate::geo;
use crate::telemetry::TelemetrySample;

/// Half-plane test: bearings within this of the leg course mean the
/// nearest waypoint is behind the aircraft, degrees.
const PASSED_COURSE_DIFF_DEG: f64 = 90.0;

/// Point the active-leg index at the waypoint the aircraft should be
/// flying toward.
///
/// Picks the nearest waypoint, then decides whether it has already been
/// passed: if the aircraft lies in the forward half-plane of the segment
/// leaving it, or is simply closer to the following waypoint, the index
/// advances by one. Route endpoints are taken directly.
pub(super) fn resync_active_leg(state: &mut FmsState, sample: &TelemetrySample) {
    let Some(last_idx) = state.plan.last_index() else {
        return;
    };

    let dist_to = |leg: &crate::plan::Leg| {
        geo::distance_nm(sample.latitude, sample.longitude, leg.latitude, leg.longitude)
    };

    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (i, leg) in state.plan.legs.iter().enumerate() {
        let d = dist_to(leg);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }

    if best_idx == 0 || best_idx == last_idx {
        state.active_idx = best_idx;
        state.position_synced = true;
        return;
    }

    let nearest = &state.plan.legs[best_idx];
    let next = &state.plan.legs[best_idx + 1];

    let dist_nearest = dist_to(nearest);
    let dist_next = dist_to(next);

    let course_out = geo::bearing_deg(
        nearest.latitude,
        nearest.longitude,
        next.latitude,
        next.longitude,
    );
    let bearing_to_aircraft = geo::bearing_deg(
        nearest.latitude,
        nearest.longitude,
        sample.latitude,
        sample.longitude,
    );
    let diff = geo::angle_difference_deg(course_out, bearing_to_aircraft);

    if diff < PASSED_COURSE_DIFF_DEG || dist_next < dist_nearest {
        info!(
            waypoint = %nearest.ident,
            dist_nm = dist_nearest,
            "Position resync: nearest waypoint already passed"
        );
        best_idx += 1;
    }

    state.active_idx = best_idx;
    state.position_synced = true;
}
