//! Flight-plan model and ingestion.
//!
//! A [`FlightPlan`] is an ordered, owned sequence of [`Leg`]s plus the static
//! route totals and airport metadata. It is built wholesale by ingestion and
//! swapped into the core atomically; the core never mutates a plan
//! incrementally while a newer one is being fetched.

mod airport;
pub mod ingest;
mod leg;
pub mod source;

pub use airport::{AirportInfo, DEFAULT_TRANSITION_FT};
pub use ingest::{PlanError, PlanResult};
pub use leg::{Leg, LegConstraint, KMH_PER_KNOT, KMH_PER_MACH};
pub use source::PlanSource;

use chrono::{DateTime, Utc};

use crate::geo;

/// Planned aircraft weights, kilograms unless noted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanWeights {
    /// Estimated takeoff weight.
    pub tow_kg: f64,
    /// Estimated zero-fuel weight.
    pub zfw_kg: f64,
    /// Payload.
    pub payload_kg: f64,
    /// Passenger count.
    pub pax: u32,
    /// Cargo.
    pub cargo_kg: f64,
    /// Block (ramp) fuel.
    pub block_fuel_kg: f64,
}

/// Planned fuel figures, kilograms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuelPlan {
    /// Taxi fuel.
    pub taxi_kg: f64,
    /// Final reserve fuel.
    pub reserve_kg: f64,
    /// Planned fuel at landing.
    pub plan_landing_kg: f64,
}

/// Cruise conditions from the planning source, kept as published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CruiseData {
    /// Average wind direction, degrees true (as text, e.g. `270`).
    pub avg_wind_dir: String,
    /// Average wind speed, knots (as text).
    pub avg_wind_spd: String,
    /// Average ISA temperature deviation (as text).
    pub avg_isa_dev: String,
}

/// The ordered route plus its static totals and airport metadata.
///
/// Insertion order is flight order; legs are never reordered. Segment
/// courses, static segment distances and the route total are stamped by
/// [`FlightPlan::stamp_segments`] after the leg list is assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightPlan {
    /// Route waypoints in flight order.
    pub legs: Vec<Leg>,
    /// Departure airport metadata.
    pub origin: AirportInfo,
    /// Arrival airport metadata.
    pub destination: AirportInfo,
    /// Planned cruise altitude, feet.
    pub cruise_alt_ft: f64,
    /// Sum of all static segment lengths, NM.
    pub total_dist_static_nm: f64,
    /// Planned weights.
    pub weights: PlanWeights,
    /// Planned fuel figures.
    pub fuel: FuelPlan,
    /// Cruise conditions.
    pub cruise: CruiseData,
    /// Scheduled off-block time, when the source supplies one.
    pub sched_out: Option<DateTime<Utc>>,
}

impl FlightPlan {
    /// Build a plan from a leg list and airport records, stamping segment
    /// geometry and the route total.
    pub fn new(
        legs: Vec<Leg>,
        origin: AirportInfo,
        destination: AirportInfo,
        cruise_alt_ft: f64,
    ) -> Self {
        let mut plan = Self {
            legs,
            origin,
            destination,
            cruise_alt_ft,
            ..Self::default()
        };
        plan.stamp_segments();
        plan
    }

    /// Recompute each leg's arrival course and static segment length from
    /// its predecessor, and the route's total static distance.
    ///
    /// The first leg has no arriving segment; its course and length stay 0.
    pub fn stamp_segments(&mut self) {
        let mut total = 0.0;
        for i in 1..self.legs.len() {
            let (prev_lat, prev_lon) = {
                let prev = &self.legs[i - 1];
                (prev.latitude, prev.longitude)
            };
            let leg = &mut self.legs[i];
            leg.leg_course_deg =
                geo::bearing_deg(prev_lat, prev_lon, leg.latitude, leg.longitude);
            leg.leg_dist_static_nm =
                geo::distance_nm(prev_lat, prev_lon, leg.latitude, leg.longitude);
            total += leg.leg_dist_static_nm;
        }
        self.total_dist_static_nm = total;
    }

    /// Number of legs in the route.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Whether the route has no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Index of the last leg, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.legs.len().checked_sub(1)
    }
}
