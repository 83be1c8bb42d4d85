//! Live telemetry sample consumed by the FMS core.
//!
//! One sample is delivered per data-link frame and drives a full update
//! cycle. Samples are ephemeral: the core keeps only what it needs for
//! smoothing and crossing detection, never the samples themselves.

use chrono::{DateTime, Utc};

use crate::geo;

/// A point-in-time snapshot of the aircraft state.
#[derive(Debug, Clone, Copy)]
pub struct TelemetrySample {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude above mean sea level in feet.
    pub altitude_ft: f64,
    /// Ground speed in knots.
    pub ground_speed_kt: f64,
    /// Total fuel on board in kilograms.
    pub fuel_kg: f64,
    /// Total fuel flow in kilograms per hour.
    pub fuel_flow_kg_hr: f64,
    /// Wall-clock time the sample was taken.
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySample {
    /// Create a sample stamped with the current wall-clock time.
    pub fn new(
        latitude: f64,
        longitude: f64,
        altitude_ft: f64,
        ground_speed_kt: f64,
        fuel_kg: f64,
        fuel_flow_kg_hr: f64,
    ) -> Self {
        Self {
            latitude,
            longitude,
            altitude_ft,
            ground_speed_kt,
            fuel_kg,
            fuel_flow_kg_hr,
            timestamp: Utc::now(),
        }
    }

    /// Create a sample with an explicit timestamp.
    pub fn at(
        latitude: f64,
        longitude: f64,
        altitude_ft: f64,
        ground_speed_kt: f64,
        fuel_kg: f64,
        fuel_flow_kg_hr: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            altitude_ft,
            ground_speed_kt,
            fuel_kg,
            fuel_flow_kg_hr,
            timestamp,
        }
    }

    /// Whether the position looks like a real fix.
    ///
    /// A source that has not acquired a fix reports zeros; a sample without
    /// a fix suppresses the whole progress/VNAV cycle so the core keeps its
    /// last-known-good derived state.
    pub fn has_valid_fix(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && !geo::is_degenerate(self.latitude, self.longitude)
    }
}
