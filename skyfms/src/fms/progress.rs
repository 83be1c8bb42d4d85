//! Lateral route progress.
//!
//! Ground-speed smoothing, active-leg refresh, waypoint sequencing and
//! the cumulative route walk that produces the distance, time and fuel
//! aggregates for the displays.
//!
//! # Design
//!
//! Sequencing deliberately leaves the freshly advanced leg's dynamic
//! fields stale for one cycle; the next update refreshes them. Distances
//! shown on the displays therefore lag an advance by at most one sample.

use std::time::Duration;

use tracing::info;

use super::state::FmsState;
use crate::config::FmsConfig;
use crate::geo;
use crate::telemetry::TelemetrySample;

/// Minimum inter-sample gap used for the acceleration quotient, seconds.
const MIN_SAMPLE_DT_S: f64 = 0.001;

/// EMA weight given to the previous acceleration estimate.
const ACCEL_SMOOTHING: f64 = 0.8;

/// Decay applied when the raw acceleration is effectively zero.
const ACCEL_IDLE_DECAY: f64 = 0.9;

/// Raw-acceleration magnitude below which the estimate decays, kt/s.
const ACCEL_IDLE_BAND_KT_S: f64 = 0.1;

/// Fold the sample's ground speed into the smoothed acceleration estimate.
///
/// Runs on every sample, valid fix or not, so the estimate tracks real
/// speed changes through brief position dropouts.
pub(super) fn update_smoothing(state: &mut FmsState, sample: &TelemetrySample) {
    let dt_s = match state.last_update {
        Some(last) => ((sample.timestamp - last).num_milliseconds() as f64 / 1000.0)
            .max(MIN_SAMPLE_DT_S),
        None => MIN_SAMPLE_DT_S,
    };

    let raw_accel = (sample.ground_speed_kt - state.last_gs_kt) / dt_s;
    state.acceleration_kt_s =
        state.acceleration_kt_s * ACCEL_SMOOTHING + raw_accel * (1.0 - ACCEL_SMOOTHING);
    if raw_accel.abs() < ACCEL_IDLE_BAND_KT_S {
        state.acceleration_kt_s *= ACCEL_IDLE_DECAY;
    }

    state.last_gs_kt = sample.ground_speed_kt;
    state.last_update = Some(sample.timestamp);
    state.current_gs_kt = sample.ground_speed_kt;
}

/// Refresh the active leg's distance, bearing and display target altitude
/// from the current fix.
pub(super) fn refresh_active_leg(state: &mut FmsState, sample: &TelemetrySample) {
    let cruise_alt_ft = state.plan.cruise_alt_ft;
    let dest_elev_ft = state.plan.destination.elevation_ft;
    let Some(leg) = state.plan.legs.get_mut(state.active_idx) else {
        return;
    };

    leg.dist_to_go_nm =
        geo::distance_nm(sample.latitude, sample.longitude, leg.latitude, leg.longitude);
    leg.bearing_deg =
        geo::bearing_deg(sample.latitude, sample.longitude, leg.latitude, leg.longitude);
    leg.target_alt_ft = if leg.plan_alt_ft > 0.0 {
        leg.plan_alt_ft
    } else if cruise_alt_ft > 0.0 {
        cruise_alt_ft
    } else {
        dest_elev_ft
    };
}

/// Advance the active leg on waypoint capture or overshoot.
///
/// Capture: inside the capture radius of a non-final leg. Overshoot: the
/// following waypoint is already closer while the active one is still
/// well outside capture, limited to a sane next-leg distance so a
/// mid-route position jump cannot trigger it. The index only ever moves
/// forward, one leg per cycle.
pub(super) fn sequence_waypoints(
    state: &mut FmsState,
    config: &FmsConfig,
    sample: &TelemetrySample,
) {
    let Some(last_idx) = state.plan.last_index() else {
        return;
    };
    if state.active_idx >= last_idx {
        return;
    }

    let active = &state.plan.legs[state.active_idx];
    let dist_active = active.dist_to_go_nm;

    if dist_active < config.sequence_capture_nm {
        info!(
            waypoint = %active.ident,
            dist_nm = dist_active,
            "Waypoint sequenced"
        );
        state.active_idx += 1;
        return;
    }

    let next = &state.plan.legs[state.active_idx + 1];
    let dist_next =
        geo::distance_nm(sample.latitude, sample.longitude, next.latitude, next.longitude);
    if dist_next < dist_active
        && dist_active > config.overshoot_min_active_nm
        && dist_next < config.overshoot_max_next_nm
    {
        info!(
            waypoint = %active.ident,
            dist_nm = dist_active,
            next_dist_nm = dist_next,
            "Waypoint sequenced on overshoot"
        );
        state.active_idx += 1;
    }
}

/// Walk the remaining route, stamping per-leg time estimates and filling
/// the destination aggregates.
///
/// Uses a floored ground speed so the estimates stay finite while slow or
/// parked. Fuel prediction only runs with the engines clearly burning;
/// otherwise the current quantity is carried through unchanged.
pub(super) fn walk_route(state: &mut FmsState, config: &FmsConfig, sample: &TelemetrySample) {
    let calc_gs_kt = sample.ground_speed_kt.max(config.min_calc_ground_speed_kt);

    let mut cum_dist_nm = 0.0;
    let mut cum_time_s = 0.0;

    if state.active_idx < state.plan.legs.len() {
        {
            let active = &mut state.plan.legs[state.active_idx];
            cum_dist_nm = active.dist_to_go_nm;
            cum_time_s = active.dist_to_go_nm / calc_gs_kt * 3600.0;
            active.ete = Some(Duration::from_secs_f64(cum_time_s.max(0.0)));
        }

        for i in state.active_idx + 1..state.plan.legs.len() {
            let leg = &mut state.plan.legs[i];
            cum_dist_nm += leg.leg_dist_static_nm;
            cum_time_s += leg.leg_dist_static_nm / calc_gs_kt * 3600.0;
            leg.ete = Some(Duration::from_secs_f64(cum_time_s.max(0.0)));
            leg.dist_to_go_nm = leg.leg_dist_static_nm;
        }
    }

    state.dist_to_dest_nm = cum_dist_nm;
    state.time_to_dest = Duration::from_secs_f64(cum_time_s.max(0.0));

    if sample.fuel_flow_kg_hr > config.fuel_flow_gate_kg_hr {
        state.fuel_pred_dest_kg =
            sample.fuel_kg - cum_time_s / 3600.0 * sample.fuel_flow_kg_hr;
    } else {
        state.fuel_pred_dest_kg = sample.fuel_kg;
    }

    if state.plan.total_dist_static_nm > 0.0 {
        state.progress_pct =
            (100.0 * (1.0 - cum_dist_nm / state.plan.total_dist_static_nm)).clamp(0.0, 100.0);
    }
}
