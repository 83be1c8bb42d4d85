//! Vertical navigation.
//!
//! Locates the top-of-descent point on the remaining route and produces
//! target altitude, required vertical speed and path deviation for the
//! active leg, per flight phase. Everything is derived from a fixed
//! descent gradient; there is no performance model.

use std::time::Duration;

use super::phase::FlightPhase;
use super::state::FmsState;
use crate::config::FmsConfig;
use crate::telemetry::TelemetrySample;

/// Planned leg altitudes closer than this below cruise are treated as
/// noise, not step-down constraints, feet.
const STEP_DOWN_BELOW_CRUISE_FT: f64 = 500.0;

/// A step-down constraint must sit this far above the field to count, feet.
const STEP_DOWN_ABOVE_DEST_FT: f64 = 100.0;

/// Guidance is suppressed inside this distance of the target, NM.
const MIN_GUIDANCE_DIST_NM: f64 = 0.5;

/// Planned leg altitudes at or below this are "no constraint" in climb, feet.
const CLIMB_TARGET_MIN_FT: f64 = 100.0;

/// Recompute the top-of-descent point from the fixed gradient.
///
/// Runs before the phase machine so the descent test sees a current
/// value. Negative distance means T/D is behind the aircraft.
pub(super) fn update_descent_point(
    state: &mut FmsState,
    config: &FmsConfig,
    sample: &TelemetrySample,
) {
    let height_to_lose_ft =
        (state.plan.cruise_alt_ft - state.plan.destination.elevation_ft).max(0.0);
    let descent_dist_nm = height_to_lose_ft / config.descent_gradient_ft_per_nm;

    state.dist_to_td_nm = state.dist_to_dest_nm - descent_dist_nm;

    if state.dist_to_td_nm > 0.0 {
        let calc_gs_kt = sample.ground_speed_kt.max(config.min_calc_ground_speed_kt);
        state.time_to_td =
            Duration::from_secs_f64(state.dist_to_td_nm / calc_gs_kt * 3600.0);
    } else {
        state.time_to_td = Duration::ZERO;
    }
}

/// Fill the active leg's vertical guidance for the current phase.
///
/// Climb and descent produce a target altitude and required vertical
/// speed; descent additionally produces the path deviation. Ground and
/// cruise leave the previous guidance in place.
pub(super) fn update_guidance(state: &mut FmsState, config: &FmsConfig, sample: &TelemetrySample) {
    if state.active_idx >= state.plan.legs.len() {
        return;
    }

    match state.phase {
        FlightPhase::TakeoffClimb | FlightPhase::Climb => {
            climb_guidance(state, config, sample)
        }
        FlightPhase::Descent => descent_guidance(state, config, sample),
        FlightPhase::Ground | FlightPhase::Cruise => {}
    }
}

/// Climb: aim for the active leg's planned altitude, or cruise when the
/// leg carries no constraint. Only positive climb rates are commanded;
/// once above the target the commanded rate drops to zero.
fn climb_guidance(state: &mut FmsState, config: &FmsConfig, sample: &TelemetrySample) {
    let cruise_alt_ft = state.plan.cruise_alt_ft;
    let calc_gs_kt = sample.ground_speed_kt.max(config.min_calc_ground_speed_kt);
    let leg = &mut state.plan.legs[state.active_idx];

    let target_alt_ft = if leg.plan_alt_ft > CLIMB_TARGET_MIN_FT {
        leg.plan_alt_ft
    } else {
        cruise_alt_ft
    };
    leg.target_alt_ft = target_alt_ft;
    state.vnav_deviation_ft = 0.0;

    if leg.dist_to_go_nm > MIN_GUIDANCE_DIST_NM
        && sample.ground_speed_kt > config.min_calc_ground_speed_kt
    {
        let time_to_target_min = leg.dist_to_go_nm / calc_gs_kt * 60.0;
        let height_diff_ft = target_alt_ft - sample.altitude_ft;
        leg.target_vs_fpm = if height_diff_ft > 0.0 {
            (height_diff_ft / time_to_target_min) as i32
        } else {
            0
        };
    } else {
        leg.target_vs_fpm = 0;
    }
}

/// Descent: scan the remaining route for the next step-down constraint,
/// defaulting to the field elevation, then derive the path deviation and
/// a required sink rate clamped to the descent envelope.
fn descent_guidance(state: &mut FmsState, config: &FmsConfig, sample: &TelemetrySample) {
    let cruise_alt_ft = state.plan.cruise_alt_ft;
    let dest_elev_ft = state.plan.destination.elevation_ft;
    let calc_gs_kt = sample.ground_speed_kt.max(config.min_calc_ground_speed_kt);

    let mut target_alt_ft = dest_elev_ft;
    let mut dist_to_target_nm = state.plan.legs[state.active_idx].dist_to_go_nm;

    for i in state.active_idx..state.plan.legs.len() {
        let leg = &state.plan.legs[i];
        if cruise_alt_ft - leg.plan_alt_ft > STEP_DOWN_BELOW_CRUISE_FT
            && leg.plan_alt_ft > dest_elev_ft + STEP_DOWN_ABOVE_DEST_FT
        {
            target_alt_ft = leg.plan_alt_ft;
            break;
        }
        if let Some(next) = state.plan.legs.get(i + 1) {
            dist_to_target_nm += next.leg_dist_static_nm;
        }
    }

    let ideal_alt_ft = target_alt_ft + dist_to_target_nm * config.descent_gradient_ft_per_nm;
    state.vnav_deviation_ft = sample.altitude_ft - ideal_alt_ft;

    let leg = &mut state.plan.legs[state.active_idx];
    leg.target_alt_ft = target_alt_ft;

    if dist_to_target_nm > MIN_GUIDANCE_DIST_NM
        && sample.ground_speed_kt > config.min_calc_ground_speed_kt
    {
        let time_to_target_min = dist_to_target_nm / calc_gs_kt * 60.0;
        let required_vs_fpm = ((target_alt_ft - sample.altitude_ft) / time_to_target_min) as i32;
        leg.target_vs_fpm = required_vs_fpm.clamp(-(config.max_descent_vs_fpm as i32), 0);
    } else {
        leg.target_vs_fpm = 0;
    }
}
