//! Tuning configuration for the flight-management core.
//!
//! Every numeric threshold the core uses is injected through [`FmsConfig`]
//! rather than compiled in, so operators can adapt the profile to the
//! aircraft being flown without touching the update pipeline.

use std::time::Duration;

/// Default idle-descent gradient in feet per nautical mile.
///
/// Models a constant flight-path angle of roughly 3 degrees; the
/// top-of-descent point and the ideal descent-path altitude are both
/// derived from this slope.
pub const DEFAULT_DESCENT_GRADIENT_FT_PER_NM: f64 = 318.0;

/// Default floor applied to ground speed in time calculations (knots).
///
/// Keeps ETE and required-vertical-speed math bounded while taxiing or
/// parked, where raw ground speed approaches zero.
pub const DEFAULT_MIN_CALC_GROUND_SPEED_KT: f64 = 50.0;

/// Default waypoint capture radius for auto-sequencing (NM).
pub const DEFAULT_SEQUENCE_CAPTURE_NM: f64 = 2.0;

/// Default minimum distance to the active leg before overshoot protection
/// may fire (NM). Guards against oscillation near the capture radius.
pub const DEFAULT_OVERSHOOT_MIN_ACTIVE_NM: f64 = 5.0;

/// Default maximum distance to the next leg for overshoot protection (NM).
pub const DEFAULT_OVERSHOOT_MAX_NEXT_NM: f64 = 20.0;

/// Default delay after which a barometric-setting alert self-clears.
pub const DEFAULT_BARO_ALERT_CLEAR: Duration = Duration::from_secs(60);

/// Default fuel-flow gate (kg/hr) below which fuel prediction is skipped
/// and fuel on board is carried through unchanged.
pub const DEFAULT_FUEL_FLOW_GATE_KG_HR: f64 = 100.0;

/// Runtime configuration for the FMS core.
///
/// Construct with [`FmsConfig::default`] and adjust individual fields with
/// the `with_*` setters where a non-standard profile is needed.
#[derive(Debug, Clone)]
pub struct FmsConfig {
    /// Descent gradient in ft/NM used for T/D and path-deviation math.
    pub descent_gradient_ft_per_nm: f64,

    /// Ground-speed floor (kt) for ETE and vertical-speed calculations.
    pub min_calc_ground_speed_kt: f64,

    /// Capture radius (NM) that advances the active leg.
    pub sequence_capture_nm: f64,

    /// Minimum active-leg distance (NM) before overshoot protection applies.
    pub overshoot_min_active_nm: f64,

    /// Maximum next-leg distance (NM) for overshoot protection.
    pub overshoot_max_next_nm: f64,

    /// How long a barometric alert stays up before clearing itself.
    pub baro_alert_clear: Duration,

    /// Fuel flow (kg/hr) below which destination fuel is not predicted.
    pub fuel_flow_gate_kg_hr: f64,

    /// AGL ceiling (ft) below which a slow aircraft is considered on ground.
    pub ground_agl_ceiling_ft: f64,

    /// AGL ceiling (ft) for the initial takeoff-climb phase.
    pub takeoff_agl_ceiling_ft: f64,

    /// Ground speed (kt) separating taxi from the takeoff roll.
    pub ground_speed_threshold_kt: f64,

    /// Altitude band (ft) around cruise altitude that counts as cruise.
    pub cruise_capture_band_ft: f64,

    /// Deviation from cruise altitude (ft) that raises the soft check alert.
    pub cruise_warn_band_ft: f64,

    /// Distance to destination (NM) inside which descent is assumed.
    pub descent_capture_dist_nm: f64,

    /// Magnitude limit for the commanded descent rate (ft/min).
    pub max_descent_vs_fpm: f64,
}

impl Default for FmsConfig {
    fn default() -> Self {
        Self {
            descent_gradient_ft_per_nm: DEFAULT_DESCENT_GRADIENT_FT_PER_NM,
            min_calc_ground_speed_kt: DEFAULT_MIN_CALC_GROUND_SPEED_KT,
            sequence_capture_nm: DEFAULT_SEQUENCE_CAPTURE_NM,
            overshoot_min_active_nm: DEFAULT_OVERSHOOT_MIN_ACTIVE_NM,
            overshoot_max_next_nm: DEFAULT_OVERSHOOT_MAX_NEXT_NM,
            baro_alert_clear: DEFAULT_BARO_ALERT_CLEAR,
            fuel_flow_gate_kg_hr: DEFAULT_FUEL_FLOW_GATE_KG_HR,
            ground_agl_ceiling_ft: 1500.0,
            takeoff_agl_ceiling_ft: 3000.0,
            ground_speed_threshold_kt: 60.0,
            cruise_capture_band_ft: 2000.0,
            cruise_warn_band_ft: 300.0,
            descent_capture_dist_nm: 50.0,
            max_descent_vs_fpm: 4000.0,
        }
    }
}

impl FmsConfig {
    /// Set the descent gradient (ft/NM).
    pub fn with_descent_gradient(mut self, ft_per_nm: f64) -> Self {
        self.descent_gradient_ft_per_nm = ft_per_nm;
        self
    }

    /// Set the ground-speed floor for time calculations (kt).
    pub fn with_min_calc_ground_speed(mut self, kt: f64) -> Self {
        self.min_calc_ground_speed_kt = kt;
        self
    }

    /// Set the waypoint capture radius (NM).
    pub fn with_sequence_capture(mut self, nm: f64) -> Self {
        self.sequence_capture_nm = nm;
        self
    }

    /// Set the baro-alert self-clear delay.
    pub fn with_baro_alert_clear(mut self, delay: Duration) -> Self {
        self.baro_alert_clear = delay;
        self
    }
}
