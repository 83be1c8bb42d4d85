//! The flight-management core.
//!
//! [`Fms`] owns the installed flight plan and all derived navigation
//! state behind a single lock, and exposes three surfaces:
//!
//! - [`Fms::update`] runs one full derivation cycle per telemetry sample
//!   (smoothing, sequencing, route walk, descent point, phase, alerts,
//!   vertical guidance),
//! - command methods ([`Fms::set_direct_to`], [`Fms::modify_leg_constraint`])
//!   edit the route between cycles,
//! - [`Fms::snapshot`] and [`Fms::legs`] hand owned copies to renderers.
//!
//! # Concurrency
//!
//! One coarse mutex guards everything. Every operation is short, bounded
//! arithmetic over the leg list; no I/O ever happens under the lock. Plan
//! acquisition runs on its own thread and swaps a finished plan in
//! through [`Fms::install_plan`].

mod phase;
mod progress;
mod resync;
mod snapshot;
mod state;
mod vnav;

pub use phase::{BaroAlert, FlightPhase};
pub use snapshot::FmsSnapshot;

use parking_lot::Mutex;
use tracing::info;

use crate::config::FmsConfig;
use crate::plan::{FlightPlan, Leg, LegConstraint};
use crate::telemetry::TelemetrySample;
use state::FmsState;

/// Status surface texts shown on the flight displays.
pub mod status {
    /// No plan has been installed.
    pub const NO_PLAN: &str = "NO F-PLN";
    /// A plan fetch is in progress.
    pub const LOADING: &str = "LOADING...";
    /// A plan is installed.
    pub const LOADED: &str = "LOADED";
    /// The last fetch failed at the network layer.
    pub const NET_ERROR: &str = "NET ERROR";
    /// The last fetch returned an unparseable document.
    pub const LOAD_ERROR: &str = "LOAD ERROR";
}

/// The flight-management core.
pub struct Fms {
    config: FmsConfig,
    state: Mutex<FmsState>,
}

impl Default for Fms {
    fn default() -> Self {
        Self::new(FmsConfig::default())
    }
}

impl Fms {
    /// Create a core with the given tuning profile and no plan.
    pub fn new(config: FmsConfig) -> Self {
        Self {
            config,
            state: Mutex::new(FmsState::new()),
        }
    }

    /// The tuning profile the core was built with.
    pub fn config(&self) -> &FmsConfig {
        &self.config
    }

    /// Run one full update cycle against a telemetry sample.
    ///
    /// Without an installed plan this is a no-op. Speed smoothing runs on
    /// every sample; the position-dependent stages are skipped when the
    /// sample carries no fix, leaving the last-known-good derived state
    /// in place.
    pub fn update(&self, sample: &TelemetrySample) {
        let mut state = self.state.lock();
        if !state.loaded || state.plan.is_empty() {
            return;
        }

        state.fuel_kg = sample.fuel_kg;
        state.fuel_flow_kg_hr = sample.fuel_flow_kg_hr;
        progress::update_smoothing(&mut state, sample);

        if !sample.has_valid_fix() {
            return;
        }

        if !state.position_synced {
            resync::resync_active_leg(&mut state, sample);
            // Seed crossing detection so install altitude jumps cannot
            // raise a spurious baro alert
            state.last_alt_ft = sample.altitude_ft;
        }

        progress::refresh_active_leg(&mut state, sample);
        progress::sequence_waypoints(&mut state, &self.config, sample);
        progress::walk_route(&mut state, &self.config, sample);
        vnav::update_descent_point(&mut state, &self.config, sample);
        phase::update_phase(&mut state, &self.config, sample);
        phase::update_baro_alert(&mut state, &self.config, sample);
        vnav::update_guidance(&mut state, &self.config, sample);

        state.last_alt_ft = sample.altitude_ft;
    }

    /// Install a plan, replacing any previous one and resetting all
    /// per-flight state. The active leg is re-derived from the next fix.
    pub fn install_plan(&self, plan: FlightPlan) {
        let mut state = self.state.lock();
        info!(
            origin = %plan.origin.icao,
            destination = %plan.destination.icao,
            legs = plan.len(),
            "Flight plan installed"
        );
        state.install_plan(plan);
    }

    /// Overwrite the status surface text.
    pub fn set_status(&self, status: impl Into<String>) {
        self.state.lock().status = status.into();
    }

    /// Current status surface text.
    pub fn status(&self) -> String {
        self.state.lock().status.clone()
    }

    /// Whether a plan is installed.
    pub fn is_loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// Index of the active leg.
    pub fn active_index(&self) -> usize {
        self.state.lock().active_idx
    }

    /// Jump the active leg to the given index.
    ///
    /// Out-of-range indices are ignored; the route is left untouched.
    pub fn set_direct_to(&self, leg_index: usize) {
        let mut state = self.state.lock();
        if leg_index < state.plan.legs.len() {
            info!(index = leg_index, "Direct-to engaged");
            state.active_idx = leg_index;
        }
    }

    /// Apply a speed/altitude constraint edit to one leg.
    ///
    /// Out-of-range indices are ignored; the route is left untouched.
    pub fn modify_leg_constraint(&self, leg_index: usize, constraint: &LegConstraint) {
        let mut state = self.state.lock();
        if let Some(leg) = state.plan.legs.get_mut(leg_index) {
            leg.apply_constraint(constraint);
        }
    }

    /// Owned copy of the route legs, in flight order.
    pub fn legs(&self) -> Vec<Leg> {
        self.state.lock().plan.legs.clone()
    }

    /// Owned copy of the installed plan.
    pub fn plan(&self) -> FlightPlan {
        self.state.lock().plan.clone()
    }

    /// Capture an owned point-in-time view for the displays.
    pub fn snapshot(&self) -> FmsSnapshot {
        FmsSnapshot::capture(&self.state.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::AirportInfo;
    use chrono::{TimeZone, Utc};

    fn northbound_plan() -> FlightPlan {
        FlightPlan::new(
            vec![
                Leg::new("A", 50.0, 10.0),
                Leg::new("B", 51.0, 10.0),
                Leg::new("C", 52.0, 10.0),
            ],
            AirportInfo::new("AAAA", 0.0),
            AirportInfo::new("BBBB", 0.0),
            34_000.0,
        )
    }

    fn fix(lat: f64, lon: f64, alt_ft: f64, gs_kt: f64, secs: i64) -> TelemetrySample {
        TelemetrySample::at(
            lat,
            lon,
            alt_ft,
            gs_kt,
            8000.0,
            2400.0,
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(secs),
        )
    }

    #[test]
    fn test_update_without_plan_is_noop() {
        let fms = Fms::default();
        fms.update(&fix(50.0, 10.0, 10_000.0, 400.0, 0));

        let snapshot = fms.snapshot();
        assert!(!snapshot.loaded);
        assert_eq!(snapshot.status, status::NO_PLAN);
        assert_eq!(snapshot.dist_to_dest_nm, 0.0);
    }

    #[test]
    fn test_install_resets_state() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        fms.set_direct_to(2);

        fms.install_plan(northbound_plan());
        assert_eq!(fms.active_index(), 0);
        assert_eq!(fms.status(), status::LOADED);
        assert!(fms.is_loaded());
    }

    #[test]
    fn test_update_drives_progress() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        fms.update(&fix(50.6, 10.0, 34_000.0, 420.0, 0));

        let snapshot = fms.snapshot();
        // Resync picks B inbound; 24 NM to B plus the two static segments
        assert_eq!(snapshot.active_index, 1);
        assert!((snapshot.dist_to_dest_nm - 144.0).abs() < 1.5);
        assert!(snapshot.progress_pct > 15.0);
    }

    #[test]
    fn test_fixless_sample_keeps_derived_state() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        fms.update(&fix(50.5, 10.0, 34_000.0, 420.0, 0));
        let before = fms.snapshot();

        fms.update(&fix(0.0, 0.0, 0.0, 0.0, 1));
        let after = fms.snapshot();

        assert_eq!(after.active_index, before.active_index);
        assert_eq!(after.dist_to_dest_nm, before.dist_to_dest_nm);
        assert_eq!(after.progress_pct, before.progress_pct);
    }

    #[test]
    fn test_direct_to_in_range() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        fms.set_direct_to(2);
        assert_eq!(fms.active_index(), 2);
    }

    #[test]
    fn test_direct_to_out_of_range_ignored() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        fms.set_direct_to(1);
        fms.set_direct_to(99);
        assert_eq!(fms.active_index(), 1);
    }

    #[test]
    fn test_constraint_modification() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        fms.modify_leg_constraint(1, &LegConstraint::altitude(12_000.0, false));
        assert_eq!(fms.legs()[1].plan_alt_ft, 12_000.0);
    }

    #[test]
    fn test_constraint_out_of_range_leaves_route_untouched() {
        let fms = Fms::default();
        fms.install_plan(northbound_plan());
        let before = fms.plan();

        fms.modify_leg_constraint(99, &LegConstraint::altitude(12_000.0, false));

        assert_eq!(fms.plan(), before);
    }

    #[test]
    fn test_no_spurious_baro_alert_on_airborne_install() {
        // Installing a plan at cruise must not read the altitude jump
        // from 0 as a transition crossing
        let fms = Fms::default();
        let mut plan = northbound_plan();
        plan.origin.transition_alt_ft = 18_000.0;
        fms.install_plan(plan);

        fms.update(&fix(50.5, 10.0, 34_000.0, 420.0, 0));
        assert_eq!(fms.snapshot().baro_alert, None);
    }
}
