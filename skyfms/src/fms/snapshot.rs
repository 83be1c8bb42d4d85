//! Point-in-time view of the core for the display surfaces.
//!
//! A snapshot is captured under the core's lock and then owned by the
//! caller, so renderers never hold the lock while drawing.

use std::time::Duration;

use super::phase::{BaroAlert, FlightPhase};
use super::state::FmsState;

/// Owned copy of everything the flight displays read each frame.
#[derive(Debug, Clone)]
pub struct FmsSnapshot {
    /// Whether a plan is installed.
    pub loaded: bool,
    /// Status surface text (`NO F-PLN`, `LOADED`, ...).
    pub status: String,
    /// Index of the active leg.
    pub active_index: usize,
    /// Departure airport ICAO.
    pub origin_icao: String,
    /// Arrival airport ICAO.
    pub destination_icao: String,
    /// Planned cruise altitude, feet.
    pub cruise_alt_ft: f64,

    /// Latest raw ground speed, knots.
    pub ground_speed_kt: f64,
    /// Smoothed acceleration estimate, knots per second.
    pub acceleration_kt_s: f64,
    /// Latest fuel on board, kilograms.
    pub fuel_kg: f64,
    /// Latest total fuel flow, kilograms per hour.
    pub fuel_flow_kg_hr: f64,

    /// Remaining distance to the destination, NM.
    pub dist_to_dest_nm: f64,
    /// Estimated time to the destination.
    pub time_to_dest: Duration,
    /// Distance to the top-of-descent point, NM. Negative once passed.
    pub dist_to_td_nm: f64,
    /// Estimated time to the top-of-descent point.
    pub time_to_td: Duration,
    /// Route completion, 0 to 100 percent.
    pub progress_pct: f64,
    /// Predicted fuel at destination, kilograms.
    pub fuel_pred_dest_kg: f64,
    /// Deviation from the ideal descent path, feet. Positive is high.
    pub vnav_deviation_ft: f64,

    /// Current flight phase.
    pub phase: FlightPhase,
    /// Cruise-altitude soft check (`CHK FLxxx`), when raised.
    pub cruise_check: Option<String>,
    /// Barometric-setting reminder, when raised.
    pub baro_alert: Option<BaroAlert>,
}

impl FmsSnapshot {
    pub(super) fn capture(state: &FmsState) -> Self {
        Self {
            loaded: state.loaded,
            status: state.status.clone(),
            active_index: state.active_idx,
            origin_icao: state.plan.origin.icao.clone(),
            destination_icao: state.plan.destination.icao.clone(),
            cruise_alt_ft: state.plan.cruise_alt_ft,
            ground_speed_kt: state.current_gs_kt,
            acceleration_kt_s: state.acceleration_kt_s,
            fuel_kg: state.fuel_kg,
            fuel_flow_kg_hr: state.fuel_flow_kg_hr,
            dist_to_dest_nm: state.dist_to_dest_nm,
            time_to_dest: state.time_to_dest,
            dist_to_td_nm: state.dist_to_td_nm,
            time_to_td: state.time_to_td,
            progress_pct: state.progress_pct,
            fuel_pred_dest_kg: state.fuel_pred_dest_kg,
            vnav_deviation_ft: state.vnav_deviation_ft,
            phase: state.phase,
            cruise_check: state.cruise_check.clone(),
            baro_alert: state.baro_alert.map(|raised| raised.kind),
        }
    }

    /// Annunciator text for the baro alert, empty when none is raised.
    pub fn baro_alert_text(&self) -> &'static str {
        self.baro_alert.map(|alert| alert.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fms::phase::RaisedBaroAlert;
    use crate::fms::status;
    use chrono::Utc;

    #[test]
    fn test_capture_of_fresh_state() {
        let snapshot = FmsSnapshot::capture(&FmsState::new());
        assert!(!snapshot.loaded);
        assert_eq!(snapshot.status, status::NO_PLAN);
        assert_eq!(snapshot.active_index, 0);
        assert_eq!(snapshot.baro_alert, None);
        assert_eq!(snapshot.baro_alert_text(), "");
    }

    #[test]
    fn test_baro_alert_text_when_raised() {
        let mut state = FmsState::new();
        state.baro_alert = Some(RaisedBaroAlert {
            kind: BaroAlert::SetStd,
            raised_at: Utc::now(),
        });
        let snapshot = FmsSnapshot::capture(&state);
        assert_eq!(snapshot.baro_alert, Some(BaroAlert::SetStd));
        assert_eq!(snapshot.baro_alert_text(), "SET STD");
    }
}
