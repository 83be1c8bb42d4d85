//! End-to-end flight scenarios through the public API.
//!
//! Each test drives the core with a scripted telemetry stream, the way a
//! data link would, and checks the externally visible navigation state.

use chrono::{DateTime, TimeZone, Utc};
use skyfms::fms::status;
use skyfms::plan::AirportInfo;
use skyfms::{FlightPhase, FlightPlan, Fms, Leg, LegConstraint, TelemetrySample};

fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap() + chrono::Duration::seconds(secs)
}

fn sample(lat: f64, alt_ft: f64, gs_kt: f64, ff_kg_hr: f64, secs: i64) -> TelemetrySample {
    TelemetrySample::at(lat, 10.0, alt_ft, gs_kt, 8000.0, ff_kg_hr, t(secs))
}

/// Four waypoints up the 10E meridian, 60 NM apart, 180 NM total.
fn meridian_plan() -> FlightPlan {
    let mut plan = FlightPlan::new(
        vec![
            Leg::new("ALPHA", 50.0, 10.0),
            Leg::new("BRAVO", 51.0, 10.0),
            Leg::new("CHARL", 52.0, 10.0),
            Leg::new("DELTA", 53.0, 10.0),
        ],
        AirportInfo::new("EDDH", 0.0),
        AirportInfo::new("EDDM", 0.0),
        34_000.0,
    );
    plan.origin.transition_alt_ft = 18_000.0;
    plan.destination.transition_level_ft = 7_000.0;
    plan
}

#[test]
fn full_flight_sequences_waypoints_and_phases() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());
    assert_eq!(fms.status(), status::LOADED);

    // On the ramp just short of ALPHA
    fms.update(&sample(49.95, 0.0, 5.0, 0.0, 0));
    assert_eq!(fms.snapshot().phase, FlightPhase::Ground);
    assert_eq!(fms.active_index(), 0);

    // Initial climb, capturing ALPHA
    fms.update(&sample(50.02, 1_200.0, 160.0, 3000.0, 60));
    assert_eq!(fms.snapshot().phase, FlightPhase::TakeoffClimb);
    assert_eq!(fms.active_index(), 1);

    // En-route climb toward BRAVO
    fms.update(&sample(50.5, 20_000.0, 420.0, 2800.0, 600));
    assert_eq!(fms.snapshot().phase, FlightPhase::Climb);

    // Level at cruise, still before the top of descent
    fms.update(&sample(50.9, 34_000.0, 450.0, 2400.0, 900));
    let cruise = fms.snapshot();
    assert_eq!(cruise.phase, FlightPhase::Cruise);
    assert_eq!(cruise.cruise_check, None);
    assert!(cruise.dist_to_td_nm > 0.0);

    // Capture BRAVO
    fms.update(&sample(50.99, 34_000.0, 450.0, 2400.0, 960));
    assert_eq!(fms.active_index(), 2);

    // Past the top of descent
    fms.update(&sample(51.5, 34_000.0, 450.0, 2400.0, 1500));
    let descent = fms.snapshot();
    assert_eq!(descent.phase, FlightPhase::Descent);
    assert!(descent.dist_to_td_nm < 0.0);

    // Descending through CHARL toward the final waypoint
    fms.update(&sample(51.99, 20_000.0, 380.0, 1800.0, 2000));
    assert_eq!(fms.active_index(), 3);

    // Short final: the last leg never sequences away
    fms.update(&sample(52.99, 2_000.0, 160.0, 900.0, 3000));
    assert_eq!(fms.active_index(), 3);
    assert_eq!(fms.snapshot().phase, FlightPhase::Descent);
}

#[test]
fn progress_and_active_index_never_regress() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());

    let mut last_progress = -1.0;
    let mut last_index = 0;
    for step in 0..60 {
        let lat = 49.95 + step as f64 * 0.05;
        fms.update(&sample(lat, 30_000.0, 430.0, 2400.0, step * 30));

        let snapshot = fms.snapshot();
        assert!(
            snapshot.progress_pct + 1e-9 >= last_progress,
            "progress regressed at step {step}: {} -> {}",
            last_progress,
            snapshot.progress_pct
        );
        assert!(
            snapshot.active_index >= last_index,
            "active index regressed at step {step}"
        );
        last_progress = snapshot.progress_pct;
        last_index = snapshot.active_index;
    }
    assert_eq!(last_index, 3);
    assert!(last_progress > 90.0);
}

#[test]
fn baro_alert_raised_on_crossing_and_cleared_after_delay() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());

    // Climbing below the transition altitude
    fms.update(&sample(50.3, 17_900.0, 400.0, 2800.0, 0));
    assert_eq!(fms.snapshot().baro_alert_text(), "");

    // Crossing 18 000 ft upward raises SET STD
    fms.update(&sample(50.31, 18_100.0, 400.0, 2800.0, 5));
    assert_eq!(fms.snapshot().baro_alert_text(), "SET STD");

    // Still raised inside the clear delay
    fms.update(&sample(50.35, 19_500.0, 410.0, 2800.0, 40));
    assert_eq!(fms.snapshot().baro_alert_text(), "SET STD");

    // Self-clears once the delay has elapsed
    fms.update(&sample(50.4, 21_000.0, 420.0, 2800.0, 70));
    assert_eq!(fms.snapshot().baro_alert_text(), "");
}

#[test]
fn fuel_prediction_gated_when_engines_idle() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());

    // Engines clearly burning: prediction subtracts the en-route burn
    fms.update(&sample(50.5, 30_000.0, 400.0, 2400.0, 0));
    assert!(fms.snapshot().fuel_pred_dest_kg < 8000.0);

    // Flow at zero: the current quantity is carried through unchanged
    fms.update(&sample(50.55, 30_000.0, 400.0, 0.0, 30));
    assert_eq!(fms.snapshot().fuel_pred_dest_kg, 8000.0);
}

#[test]
fn airborne_restart_resumes_mid_route() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());

    // First fix arrives at cruise, past BRAVO: guidance must not restart
    // from the first waypoint
    fms.update(&sample(51.2, 34_000.0, 450.0, 2400.0, 0));
    assert_eq!(fms.active_index(), 2);
    // And the altitude jump from the fresh state must not look like a
    // transition crossing
    assert_eq!(fms.snapshot().baro_alert_text(), "");
}

#[test]
fn out_of_range_commands_leave_route_untouched() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());
    fms.update(&sample(50.5, 30_000.0, 400.0, 2400.0, 0));

    let before = fms.plan();
    let before_index = fms.active_index();

    fms.set_direct_to(17);
    fms.modify_leg_constraint(17, &LegConstraint::altitude(10_000.0, false));

    assert_eq!(fms.plan(), before);
    assert_eq!(fms.active_index(), before_index);
}

#[test]
fn direct_to_redirects_guidance() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());
    fms.update(&sample(50.1, 10_000.0, 350.0, 2600.0, 0));

    fms.set_direct_to(3);
    fms.update(&sample(50.15, 10_200.0, 350.0, 2600.0, 10));

    let snapshot = fms.snapshot();
    assert_eq!(snapshot.active_index, 3);
    // Remaining distance is now the direct distance to DELTA
    assert!((snapshot.dist_to_dest_nm - 171.0).abs() < 2.0);
}

#[test]
fn dropped_fix_keeps_last_known_good_state() {
    let fms = Fms::default();
    fms.install_plan(meridian_plan());
    fms.update(&sample(50.5, 30_000.0, 400.0, 2400.0, 0));
    let before = fms.snapshot();

    // Data link loses the fix but keeps reporting speeds
    fms.update(&TelemetrySample::at(0.0, 0.0, 0.0, 398.0, 7990.0, 2400.0, t(30)));

    let after = fms.snapshot();
    assert_eq!(after.dist_to_dest_nm, before.dist_to_dest_nm);
    assert_eq!(after.progress_pct, before.progress_pct);
    assert_eq!(after.active_index, before.active_index);
}
