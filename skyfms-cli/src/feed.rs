//! X-Plane UDP data-output decoding.
//!
//! The simulator's "Data Output" feature sends datagrams starting with
//! `DATA` plus one index byte, followed by 36-byte rows: a little-endian
//! `i32` row index and eight `f32` values. Only the rows the FMS needs
//! are decoded; everything else is skipped.

use skyfms::TelemetrySample;

/// Datagram magic for data-output packets.
const PACKET_MAGIC: &[u8] = b"DATA";

/// Header length: magic plus the internal-use byte.
const HEADER_LEN: usize = 5;

/// One row: `i32` index + 8 `f32` values.
const ROW_LEN: usize = 36;

/// Row carrying indicated/true/ground speeds.
const ROW_SPEEDS: i32 = 3;

/// Row carrying latitude, longitude and MSL altitude.
const ROW_POSITION: i32 = 20;

/// Row carrying per-engine fuel flow.
const ROW_FUEL_FLOW: i32 = 45;

/// Row carrying fuel and gross weights.
const ROW_WEIGHTS: i32 = 63;

const KG_PER_LB: f64 = 0.453592;

/// Scale from the simulator's fuel-flow units to kg/hr.
const FUEL_FLOW_TO_KG_HR: f64 = 3.02;

/// Latest decoded aircraft state, accumulated across datagrams.
///
/// The simulator spreads the fields over several rows that may arrive in
/// separate packets, so the decoder keeps the last value of each and
/// stamps a fresh sample on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedState {
    latitude: f64,
    longitude: f64,
    altitude_ft: f64,
    ground_speed_kt: f64,
    fuel_kg: f64,
    fuel_flow_kg_hr: f64,
}

impl FeedState {
    /// Fold one datagram into the accumulated state.
    ///
    /// Returns whether the packet was a well-formed data-output packet;
    /// unrelated traffic on the port is ignored.
    pub fn ingest(&mut self, packet: &[u8]) -> bool {
        if packet.len() < HEADER_LEN || &packet[..PACKET_MAGIC.len()] != PACKET_MAGIC {
            return false;
        }

        let body = &packet[HEADER_LEN..];
        for row in body.chunks_exact(ROW_LEN) {
            let index = i32::from_le_bytes([row[0], row[1], row[2], row[3]]);
            let value = |i: usize| -> f64 {
                let off = 4 + i * 4;
                f32::from_le_bytes([row[off], row[off + 1], row[off + 2], row[off + 3]]) as f64
            };

            match index {
                ROW_SPEEDS => self.ground_speed_kt = value(3),
                ROW_POSITION => {
                    self.latitude = value(0);
                    self.longitude = value(1);
                    self.altitude_ft = value(5);
                }
                ROW_FUEL_FLOW => {
                    self.fuel_flow_kg_hr =
                        (value(0) + value(1) + value(2)) * FUEL_FLOW_TO_KG_HR;
                }
                ROW_WEIGHTS => self.fuel_kg = value(2) * KG_PER_LB,
                _ => {}
            }
        }
        true
    }

    /// Stamp the accumulated state as a telemetry sample.
    pub fn sample(&self) -> TelemetrySample {
        TelemetrySample::new(
            self.latitude,
            self.longitude,
            self.altitude_ft,
            self.ground_speed_kt,
            self.fuel_kg,
            self.fuel_flow_kg_hr,
        )
    }
}
