//! SkyFMS - Flight-management core for cockpit instrument suites
//!
//! This library derives live lateral and vertical navigation state from
//! an operational flight plan and a telemetry feed: waypoint sequencing,
//! route progress, top-of-descent, flight phase, cockpit alerts and
//! vertical guidance. Display surfaces read owned snapshots; a single
//! coarse lock keeps every operation short and I/O-free.

pub mod config;
pub mod fms;
pub mod geo;
pub mod plan;
pub mod telemetry;

pub use config::FmsConfig;
pub use fms::{BaroAlert, FlightPhase, Fms, FmsSnapshot};
pub use plan::{FlightPlan, Leg, LegConstraint, PlanError, PlanResult, PlanSource};
pub use telemetry::TelemetrySample;
