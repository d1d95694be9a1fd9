//! Sun-synchronous orbit crossings.
//!
//! The equation of time is ignored, which puts the local times off by roughly
//! -14 to +16 minutes.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::Node;

/// Orbit inclination in degrees (EOS AM-1 / Terra).
pub const ORBIT_INCLINATION: f32 = 98.3;

/// Ascending node crossing time, in hours, that older tooling assumed.
pub const LEGACY_ASCENDING_NODE_TIME: f32 = 22.5;

/// Orbit description needed to locate a crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParameters {
    /// Inclination of the orbit in degrees.
    pub inclination: f32,
    /// Local time, in decimal hours, at which the satellite crosses the
    /// ascending node.
    pub ascending_node_time: f32,
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Self::new(LEGACY_ASCENDING_NODE_TIME)
    }
}

impl OrbitParameters {
    /// Terra-like orbit with the given ascending node crossing time in hours.
    pub fn new(ascending_node_time: f32) -> Self {
        Self {
            inclination: ORBIT_INCLINATION,
            ascending_node_time,
        }
    }

    /// The crossing of latitude `lat` (degrees) on the given `node`.
    pub fn crossing(&self, node: Node, lat: f32) -> Option<Crossing> {
        local_time(self.inclination, self.ascending_node_time, node, lat)
    }
}

/// Where and when the satellite crosses a latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Local solar time of the crossing in decimal hours, in [0, 24).
    pub local_time: f32,
    /// Orbital anomaly at the crossing in degrees.
    pub anomaly: f32,
}

/// Local time and anomaly at which a sun-synchronous satellite crosses a
/// latitude.
///
/// `inc` is the orbit inclination in degrees, `node_time` the local time (in
/// hours) of the ascending node crossing, and `lat` the latitude in degrees.
/// Returns `None` if the orbit never reaches `lat`.
pub fn local_time(inc: f32, node_time: f32, node: Node, lat: f32) -> Option<Crossing> {
    // Highest latitude reached, and which way the ground track runs
    let (check, sign_inc) = if inc > 90.0 {
        (180.0 - inc, 1.0)
    } else {
        (inc, -1.0)
    };

    if lat.abs() > check {
        return None;
    }

    let inc = inc.to_radians();
    let lat = lat.to_radians();
    let sign_lat = if lat >= 0.0 { 1.0 } else { -1.0 };

    // From the spherical law of sines. Rounding right at the envelope can push
    // the ratios a hair past 1.
    let pi_minus_anom = f32::asin((lat.sin() / (PI - inc).sin()).clamp(-1.0, 1.0));
    let mut anom = PI - pi_minus_anom;
    if node == Node::Ascending {
        anom -= sign_lat * 2.0 * (anom - FRAC_PI_2);
    }

    let del_lon = f32::acos((pi_minus_anom.cos() / lat.cos()).clamp(-1.0, 1.0));

    let wnode = match node {
        Node::Ascending => 0.0,
        Node::Descending => 1.0,
    };
    let node_sign = f32::from(node.sign());

    let local_time =
        node_time - wnode * 12.0 - sign_inc * node_sign * sign_lat * 24.0 * del_lon / TAU;
    // Ascending crossings south of the equator run past midnight
    let local_time = match local_time.rem_euclid(24.0) {
        wrapped if wrapped >= 24.0 => 0.0,
        wrapped => wrapped,
    };

    Some(Crossing {
        local_time,
        anomaly: anom.to_degrees(),
    })
}
