//! Flight-plan (OFP) ingestion.
//!
//! The planning service exports a loosely-typed JSON document: numeric
//! fields arrive as strings, optional sections are missing entirely, and
//! list-valued fields collapse to a single object when only one entry
//! exists. Ingestion maps that onto the closed, typed [`FlightPlan`] schema
//! with explicit defaults, so the core never sees a partially-formed value.
//!
//! Parsing is all-or-nothing: a malformed document yields a [`PlanError`]
//! and the previously loaded plan stays untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use super::airport::{AirportInfo, DEFAULT_TRANSITION_FT};
use super::leg::Leg;
use super::{CruiseData, FlightPlan, FuelPlan, PlanWeights};

/// Result type for plan ingestion and acquisition.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised while acquiring or parsing a flight plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The OFP document was not valid JSON.
    #[error("failed to parse flight plan: {0}")]
    Parse(#[from] serde_json::Error),

    /// The HTTP request to the planning service failed.
    #[error("plan request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The planning service answered with a non-success status.
    #[error("plan service returned HTTP {status}")]
    HttpStatus { status: u16 },
}

/// Parse an OFP JSON document into a fully built [`FlightPlan`].
pub fn parse_ofp(json: &str) -> PlanResult<FlightPlan> {
    let raw: RawOfp = serde_json::from_str(json)?;
    Ok(build_plan(raw))
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw document schema (lenient)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawOfp {
    #[serde(default)]
    origin: RawAirport,
    #[serde(default)]
    destination: RawAirport,
    #[serde(default)]
    general: RawGeneral,
    #[serde(default)]
    navlog: RawNavlog,
    #[serde(default)]
    weights: RawWeights,
    #[serde(default)]
    fuel: RawFuel,
    #[serde(default)]
    weather: RawWeather,
    #[serde(default)]
    times: RawTimes,
}

#[derive(Debug, Default, Deserialize)]
struct RawAirport {
    #[serde(default, deserialize_with = "lenient_string")]
    icao_code: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    elevation: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    plan_rwy: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    trans_alt: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    trans_level: f64,
    #[serde(default)]
    atis: Value,
    #[serde(default)]
    notam: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawGeneral {
    #[serde(default, deserialize_with = "lenient_f64")]
    initial_altitude: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    avg_wind_dir: String,
    #[serde(default, deserialize_with = "lenient_string")]
    avg_wind_spd: String,
    #[serde(default, deserialize_with = "lenient_string")]
    avg_temp_dev: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawNavlog {
    #[serde(default, deserialize_with = "one_or_many")]
    fix: Vec<RawFix>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFix {
    #[serde(default, deserialize_with = "lenient_string")]
    ident: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    kind: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pos_lat: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pos_long: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    altitude_feet: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    ind_airspeed: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    mach: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    mora: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    stage: String,
    #[serde(default, deserialize_with = "lenient_string")]
    frequency: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawWeights {
    #[serde(default, deserialize_with = "lenient_f64")]
    est_tow: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    est_zfw: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    payload: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pax_count: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    cargo: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawFuel {
    #[serde(default, deserialize_with = "lenient_f64")]
    plan_ramp: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    taxi: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    reserve: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    plan_landing: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawWeather {
    #[serde(default, deserialize_with = "lenient_string")]
    dest_metar: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawTimes {
    #[serde(default, deserialize_with = "lenient_f64")]
    sched_out: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
// ─────────────────────────────────────────────────────────────────────────────

/// Accept a number, a numeric string, or anything else (yielding 0.0).
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

/// Accept a string or a number (rendered as text); anything else is empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Accept either a single object or a list of objects.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(serde::de::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        single => serde_json::from_value(single)
            .map(|item| vec![item])
            .map_err(serde::de::Error::custom),
    }
}

fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document → FlightPlan
// ─────────────────────────────────────────────────────────────────────────────

fn build_plan(raw: RawOfp) -> FlightPlan {
    let fixes = raw.navlog.fix;

    let origin_mora = fixes.first().map(|f| scale_mora(f.mora)).unwrap_or(0.0);
    let dest_mora = fixes.last().map(|f| scale_mora(f.mora)).unwrap_or(0.0);

    let (origin_atis, origin_atis_letter) = parse_atis(&raw.origin.atis);

    let origin = AirportInfo {
        icao: non_empty(raw.origin.icao_code, "----"),
        elevation_ft: raw.origin.elevation,
        runway: non_empty(raw.origin.plan_rwy, "--"),
        mora_ft: origin_mora,
        transition_alt_ft: transition_or_default(raw.origin.trans_alt),
        transition_level_ft: transition_or_default(raw.origin.trans_level),
        atis: origin_atis,
        atis_letter: origin_atis_letter,
        metar: "NO DATA".to_string(),
        notams: parse_notams(&raw.origin.notam),
    };

    let destination = AirportInfo {
        icao: non_empty(raw.destination.icao_code, "----"),
        elevation_ft: raw.destination.elevation,
        runway: non_empty(raw.destination.plan_rwy, "--"),
        mora_ft: dest_mora,
        transition_alt_ft: transition_or_default(raw.destination.trans_alt),
        transition_level_ft: transition_or_default(raw.destination.trans_level),
        atis: "NO ATIS DATA".to_string(),
        atis_letter: "-".to_string(),
        metar: non_empty(raw.weather.dest_metar, "N/A"),
        notams: parse_notams(&raw.destination.notam),
    };

    let legs = fixes.into_iter().map(leg_from_fix).collect();

    let mut plan = FlightPlan {
        legs,
        origin,
        destination,
        cruise_alt_ft: raw.general.initial_altitude,
        total_dist_static_nm: 0.0,
        weights: PlanWeights {
            tow_kg: raw.weights.est_tow,
            zfw_kg: raw.weights.est_zfw,
            payload_kg: raw.weights.payload,
            pax: raw.weights.pax_count.max(0.0) as u32,
            cargo_kg: raw.weights.cargo,
            block_fuel_kg: raw.fuel.plan_ramp,
        },
        fuel: FuelPlan {
            taxi_kg: raw.fuel.taxi,
            reserve_kg: raw.fuel.reserve,
            plan_landing_kg: raw.fuel.plan_landing,
        },
        cruise: CruiseData {
            avg_wind_dir: non_empty(raw.general.avg_wind_dir, "000"),
            avg_wind_spd: non_empty(raw.general.avg_wind_spd, "00"),
            avg_isa_dev: non_empty(raw.general.avg_temp_dev, "0"),
        },
        sched_out: sched_out_time(raw.times.sched_out),
    };
    plan.stamp_segments();
    plan
}

fn leg_from_fix(fix: RawFix) -> Leg {
    let mut leg = Leg::new(non_empty(fix.ident, "WPT"), fix.pos_lat, fix.pos_long)
        .with_plan_alt(fix.altitude_feet)
        .with_plan_speed_kt(fix.ind_airspeed);
    leg.kind = non_empty(fix.kind, "wpt");
    leg.stage = fix.stage;
    leg.plan_mach = fix.mach;
    leg.msa_ft = fix.mora;
    leg.frequency = if fix.frequency.is_empty() {
        None
    } else {
        Some(fix.frequency)
    };
    leg
}

/// MORA values under 300 are published in hundreds of feet.
fn scale_mora(mora: f64) -> f64 {
    if mora > 0.0 && mora < 300.0 {
        mora * 100.0
    } else {
        mora
    }
}

fn transition_or_default(feet: f64) -> f64 {
    if feet > 0.0 {
        feet
    } else {
        DEFAULT_TRANSITION_FT
    }
}

fn non_empty(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn sched_out_time(unix_secs: f64) -> Option<DateTime<Utc>> {
    if unix_secs > 0.0 {
        DateTime::<Utc>::from_timestamp(unix_secs as i64, 0)
    } else {
        None
    }
}

/// ATIS arrives as an object with `message` and `letter`, or as junk.
fn parse_atis(value: &Value) -> (String, String) {
    match value {
        Value::Object(map) => {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("NO ATIS DATA")
                .replace('\n', " ");
            let letter = map
                .get("letter")
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string();
            (message, letter)
        }
        _ => ("N/A".to_string(), "-".to_string()),
    }
}

/// NOTAMs arrive as a list of objects, a single object, or plain strings.
fn parse_notams(value: &Value) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Value::Array(list) => list.iter().collect(),
        Value::Null => Vec::new(),
        single => vec![single],
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => {
                let id = map.get("notam_id").and_then(Value::as_str).unwrap_or("??");
                let text = map.get("notam_text").and_then(Value::as_str).unwrap_or("");
                Some(format!("{}: {}", id, text).replace('\n', " "))
            }
            Value::String(s) => Some(s.replace('\n', " ")),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect()
}
