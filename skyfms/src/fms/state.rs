//! Internal mutable state of the FMS core.
//!
//! Everything the update pipeline reads and writes lives here, behind the
//! single lock owned by [`super::Fms`]. The submodules (`progress`,
//! `phase`, `vnav`, `resync`) operate on this struct directly; nothing
//! outside the `fms` module sees it.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::phase::{FlightPhase, RaisedBaroAlert};
use super::status;
use crate::plan::FlightPlan;

/// Distance-to-T/D placeholder while no route progress has been computed.
///
/// Large positive so the phase machine does not infer descent before the
/// first update cycle.
pub(crate) const DIST_TO_TD_UNSET_NM: f64 = 9999.0;

#[derive(Debug)]
pub(crate) struct FmsState {
    /// The owned route. Replaced wholesale on plan install.
    pub(crate) plan: FlightPlan,
    /// Whether a plan has been installed.
    pub(crate) loaded: bool,
    /// Status surface for the UI (`NO F-PLN`, `LOADED`, ...).
    pub(crate) status: String,
    /// Index of the leg currently being flown toward.
    pub(crate) active_idx: usize,
    /// Whether the active leg has been reconciled with a position fix
    /// since the plan was installed.
    pub(crate) position_synced: bool,

    // Speed smoothing.
    pub(crate) acceleration_kt_s: f64,
    pub(crate) current_gs_kt: f64,
    pub(crate) last_gs_kt: f64,
    pub(crate) last_alt_ft: f64,
    pub(crate) last_update: Option<DateTime<Utc>>,

    // Cached fuel figures from the latest sample.
    pub(crate) fuel_kg: f64,
    pub(crate) fuel_flow_kg_hr: f64,

    // Derived aggregates, recomputed every valid cycle.
    pub(crate) dist_to_dest_nm: f64,
    pub(crate) time_to_dest: Duration,
    pub(crate) dist_to_td_nm: f64,
    pub(crate) time_to_td: Duration,
    pub(crate) progress_pct: f64,
    pub(crate) fuel_pred_dest_kg: f64,
    pub(crate) vnav_deviation_ft: f64,

    // Phase machine outputs.
    pub(crate) phase: FlightPhase,
    pub(crate) cruise_check: Option<String>,
    pub(crate) baro_alert: Option<RaisedBaroAlert>,
}

impl FmsState {
    pub(crate) fn new() -> Self {
        Self {
            plan: FlightPlan::default(),
            loaded: false,
            status: status::NO_PLAN.to_string(),
            active_idx: 0,
            position_synced: false,
            acceleration_kt_s: 0.0,
            current_gs_kt: 0.0,
            last_gs_kt: 0.0,
            last_alt_ft: 0.0,
            last_update: None,
            fuel_kg: 0.0,
            fuel_flow_kg_hr: 0.0,
            dist_to_dest_nm: 0.0,
            time_to_dest: Duration::ZERO,
            dist_to_td_nm: DIST_TO_TD_UNSET_NM,
            time_to_td: Duration::ZERO,
            progress_pct: 0.0,
            fuel_pred_dest_kg: 0.0,
            vnav_deviation_ft: 0.0,
            phase: FlightPhase::Ground,
            cruise_check: None,
            baro_alert: None,
        }
    }

    /// Install a freshly built plan, resetting all per-flight state.
    pub(crate) fn install_plan(&mut self, plan: FlightPlan) {
        self.plan = plan;
        self.loaded = true;
        self.status = status::LOADED.to_string();
        self.active_idx = 0;
        // Re-derive the active leg from the next fix instead of assuming leg 0
        self.position_synced = false;
        self.phase = FlightPhase::Ground;
        self.cruise_check = None;
        self.baro_alert = None;
        self.dist_to_dest_nm = 0.0;
        self.time_to_dest = Duration::ZERO;
        self.dist_to_td_nm = DIST_TO_TD_UNSET_NM;
        self.time_to_td = Duration::ZERO;
        self.progress_pct = 0.0;
        self.vnav_deviation_ft = 0.0;
    }
}
