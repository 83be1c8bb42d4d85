//! Flight-phase state machine and cockpit alerts.
//!
//! Derives a coarse flight phase from altitude above the origin field,
//! ground speed and route position, raises the cruise-altitude soft check,
//! and manages the barometric-setting reminder around the transition
//! altitude and level.
//!
//! # Phase ladder
//!
//! ```text
//! GND → TO/CLB → CLB → CRZ → DES      (GND → CLB directly is possible)
//! ```
//!
//! There is no terminal state: descent persists until a new plan install
//! resets the machine to ground.

use chrono::{DateTime, Utc};
use tracing::info;

use super::state::FmsState;
use crate::config::FmsConfig;
use crate::telemetry::TelemetrySample;

/// Highest active-leg index that still counts as the departure segment.
const TAKEOFF_MAX_LEG_INDEX: usize = 2;

/// Coarse flight-state classification driving the guidance computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightPhase {
    /// Parked, taxiing or on the takeoff roll.
    #[default]
    Ground,
    /// Initial climb on the departure segment.
    TakeoffClimb,
    /// En-route climb toward cruise altitude.
    Climb,
    /// Level at cruise altitude.
    Cruise,
    /// Descending toward the destination.
    Descent,
}

impl FlightPhase {
    /// Short annunciator label as shown on the flight displays.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightPhase::Ground => "GND",
            FlightPhase::TakeoffClimb => "TO/CLB",
            FlightPhase::Climb => "CLB",
            FlightPhase::Cruise => "CRZ",
            FlightPhase::Descent => "DES",
        }
    }

    /// Human-readable description for logging.
    pub fn description(&self) -> &'static str {
        match self {
            FlightPhase::Ground => "on ground",
            FlightPhase::TakeoffClimb => "initial climb",
            FlightPhase::Climb => "climb",
            FlightPhase::Cruise => "cruise",
            FlightPhase::Descent => "descent",
        }
    }
}

impl std::fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Barometric-setting reminder raised at a transition crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaroAlert {
    /// Climbed through the origin transition altitude: set standard.
    SetStd,
    /// Descended through the destination transition level: set QNH.
    SetQnh,
}

impl BaroAlert {
    /// Annunciator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            BaroAlert::SetStd => "SET STD",
            BaroAlert::SetQnh => "SET QNH",
        }
    }
}

impl std::fmt::Display for BaroAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raised baro alert and when it went up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RaisedBaroAlert {
    pub(crate) kind: BaroAlert,
    pub(crate) raised_at: DateTime<Utc>,
}

/// Re-derive the flight phase and the cruise-altitude soft check.
///
/// Runs after the route walk so the descent test can use the current
/// distance to T/D and to destination.
pub(super) fn update_phase(state: &mut FmsState, config: &FmsConfig, sample: &TelemetrySample) {
    let agl_ft = sample.altitude_ft - state.plan.origin.elevation_ft;
    let gs_kt = sample.ground_speed_kt;

    let new_phase = if agl_ft < config.ground_agl_ceiling_ft
        && gs_kt < config.ground_speed_threshold_kt
    {
        FlightPhase::Ground
    } else if agl_ft < config.takeoff_agl_ceiling_ft
        && gs_kt >= config.ground_speed_threshold_kt
        && state.active_idx <= TAKEOFF_MAX_LEG_INDEX
    {
        FlightPhase::TakeoffClimb
    } else if state.dist_to_td_nm < 0.0 || state.dist_to_dest_nm < config.descent_capture_dist_nm {
        FlightPhase::Descent
    } else if (sample.altitude_ft - state.plan.cruise_alt_ft).abs() < config.cruise_capture_band_ft
    {
        FlightPhase::Cruise
    } else {
        FlightPhase::Climb
    };

    state.cruise_check = if new_phase == FlightPhase::Cruise {
        let deviation_ft = (sample.altitude_ft - state.plan.cruise_alt_ft).abs();
        if deviation_ft > config.cruise_warn_band_ft {
            Some(format!("CHK FL{}", (sample.altitude_ft / 100.0) as i32))
        } else {
            None
        }
    } else {
        None
    };

    if new_phase != state.phase {
        info!(
            from = %state.phase,
            to = %new_phase,
            agl_ft,
            ground_speed_kt = gs_kt,
            "Flight phase transition"
        );
        state.phase = new_phase;
    }
}

/// Raise or clear the barometric-setting reminder.
///
/// Raised the instant altitude crosses the origin transition altitude
/// upward or the destination transition level downward; self-clears after
/// the configured delay. Uses the previous cycle's altitude for crossing
/// detection, so it must run before `last_alt_ft` is refreshed.
pub(super) fn update_baro_alert(
    state: &mut FmsState,
    config: &FmsConfig,
    sample: &TelemetrySample,
) {
    match state.baro_alert {
        None => {
            let trans_alt = state.plan.origin.transition_alt_ft;
            let trans_level = state.plan.destination.transition_level_ft;

            let raised = if state.last_alt_ft <= trans_alt && sample.altitude_ft > trans_alt {
                Some(BaroAlert::SetStd)
            } else if state.last_alt_ft >= trans_level && sample.altitude_ft < trans_level {
                Some(BaroAlert::SetQnh)
            } else {
                None
            };

            if let Some(kind) = raised {
                info!(alert = kind.as_str(), altitude_ft = sample.altitude_ft, "Baro alert raised");
                state.baro_alert = Some(RaisedBaroAlert {
                    kind,
                    raised_at: sample.timestamp,
                });
            }
        }
        Some(raised) => {
            let elapsed = (sample.timestamp - raised.raised_at)
                .to_std()
                .unwrap_or_default();
            if elapsed > config.baro_alert_clear {
                info!(alert = raised.kind.as_str(), "Baro alert cleared");
                state.baro_alert = None;
            }
        }
    }
}
