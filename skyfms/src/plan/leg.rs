//! One waypoint of the active flight plan.
//!
//! A leg carries static planned geometry (set once at plan load) and the
//! dynamic navigation fields the progress tracker overwrites every update
//! cycle. Static fields change only through an explicit constraint
//! modification command; dynamic fields are owned by the update pipeline
//! and must not be mutated elsewhere.

use std::time::Duration;

/// Kilometres per hour in one knot.
pub const KMH_PER_KNOT: f64 = 1.852;

/// Kilometres per hour per Mach at sea level (ISA).
pub const KMH_PER_MACH: f64 = 1225.0;

/// Feet per metre.
const FEET_PER_METRE: f64 = 1.0 / 0.3048;

/// Longest ETE the display surface can show.
const MAX_DISPLAY_ETE: Duration = Duration::from_secs(99 * 3600 + 59 * 60);

/// One route waypoint with planned geometry and live navigation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    /// Waypoint identifier (e.g. `AMLUH`).
    pub ident: String,
    /// Waypoint type tag from the planning source (`wpt`, `apt`, `vor`, ...).
    pub kind: String,
    /// Route stage tag (`CLB`, `CRZ`, `DSC`, ...), empty when unknown.
    pub stage: String,
    /// Tuned radio frequency for navaid waypoints.
    pub frequency: Option<String>,

    // Static geometry, set at plan load.
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Planned crossing altitude in feet, 0 when unconstrained.
    pub plan_alt_ft: f64,
    /// Planned speed in km/h, 0 when unconstrained.
    pub plan_speed_kmh: f64,
    /// Planned Mach number, 0 when the constraint is a linear speed.
    pub plan_mach: f64,
    /// Minimum safe altitude for the segment, feet.
    pub msa_ft: f64,
    /// Course of the segment arriving at this leg, degrees.
    pub leg_course_deg: f64,
    /// Static length of the segment arriving at this leg, NM.
    pub leg_dist_static_nm: f64,

    // Dynamic fields, overwritten by the update pipeline.
    /// Distance from the aircraft to this leg, NM.
    pub dist_to_go_nm: f64,
    /// Bearing from the aircraft to this leg, degrees.
    pub bearing_deg: f64,
    /// Estimated time en route to this leg.
    pub ete: Option<Duration>,
    /// Altitude the vertical guidance currently targets at this leg, feet.
    pub target_alt_ft: f64,
    /// Required vertical speed to meet the target altitude, ft/min.
    pub target_vs_fpm: i32,
}

impl Leg {
    /// Create a leg at a position with all constraints unset.
    pub fn new(ident: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            ident: ident.into(),
            kind: "wpt".to_string(),
            stage: String::new(),
            frequency: None,
            latitude,
            longitude,
            plan_alt_ft: 0.0,
            plan_speed_kmh: 0.0,
            plan_mach: 0.0,
            msa_ft: 0.0,
            leg_course_deg: 0.0,
            leg_dist_static_nm: 0.0,
            dist_to_go_nm: 0.0,
            bearing_deg: 0.0,
            ete: None,
            target_alt_ft: 0.0,
            target_vs_fpm: 0,
        }
    }

    /// Set the planned crossing altitude (feet).
    pub fn with_plan_alt(mut self, feet: f64) -> Self {
        self.plan_alt_ft = feet;
        self
    }

    /// Set the planned indicated airspeed (knots); stored as km/h.
    pub fn with_plan_speed_kt(mut self, knots: f64) -> Self {
        self.plan_speed_kmh = if knots > 0.0 { knots * KMH_PER_KNOT } else { 0.0 };
        self
    }

    /// Apply a speed/altitude constraint modification.
    pub fn apply_constraint(&mut self, constraint: &LegConstraint) {
        if let Some(speed) = constraint.speed {
            if constraint.is_mach {
                self.plan_mach = speed;
                self.plan_speed_kmh = speed * KMH_PER_MACH;
            } else {
                self.plan_mach = 0.0;
                self.plan_speed_kmh = speed;
            }
        }
        if let Some(alt) = constraint.altitude {
            self.plan_alt_ft = if constraint.is_metric {
                alt * FEET_PER_METRE
            } else {
                alt
            };
        }
    }

    /// Render the ETE as `HH:MM`, `--:--` when not yet computed.
    ///
    /// Capped at `99:59`, matching the field width of navigation displays.
    pub fn ete_display(&self) -> String {
        match self.ete {
            None => "--:--".to_string(),
            Some(ete) => {
                let ete = ete.min(MAX_DISPLAY_ETE);
                let total_minutes = ete.as_secs() / 60;
                format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
            }
        }
    }
}

/// A speed and/or altitude constraint edit for one leg.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegConstraint {
    /// New planned speed: Mach when `is_mach`, otherwise km/h.
    pub speed: Option<f64>,
    /// New planned altitude: metres when `is_metric`, otherwise feet.
    pub altitude: Option<f64>,
    /// Interpret `speed` as a Mach number.
    pub is_mach: bool,
    /// Interpret `altitude` as metres.
    pub is_metric: bool,
}

impl LegConstraint {
    /// Constraint setting only the planned speed.
    pub fn speed(value: f64, is_mach: bool) -> Self {
        Self {
            speed: Some(value),
            is_mach,
            ..Self::default()
        }
    }

    /// Constraint setting only the planned altitude.
    pub fn altitude(value: f64, is_metric: bool) -> Self {
        Self {
            altitude: Some(value),
            is_metric,
            ..Self::default()
        }
    }
}
