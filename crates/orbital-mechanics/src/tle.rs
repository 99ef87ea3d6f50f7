//! SGP4 TLE adaptor
//!
//! Wraps the `sgp4` crate behind the [`Propagator`] trait so TLE-defined
//! satellites can drive the contact detector and the pass engine. Time zero
//! is the TLE epoch. The TEME output frame is treated as inertial.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::constants::{EARTH_RADIUS_M, MU_EARTH_M3_S2, SECONDS_PER_DAY};
use crate::{OrbitState, OrbitalError, Propagator, Result};

pub struct TleOrbit {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl TleOrbit {
    pub fn from_tle(tle_line1: &str, tle_line2: &str) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(
            None,
            tle_line1.trim_end().as_bytes(),
            tle_line2.trim_end().as_bytes(),
        )
        .map_err(|e| OrbitalError::InvalidTle(format!("{:?}", e)))?;

        if elements.mean_motion <= 0.0 {
            return Err(OrbitalError::InvalidElements(format!(
                "mean motion must be positive, got {} rev/day",
                elements.mean_motion
            )));
        }

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        Ok(Self {
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(self.elements.datetime, Utc)
    }

    pub fn inclination_deg(&self) -> f64 {
        self.elements.inclination
    }

    /// Mean motion from the element set [rev/day]
    pub fn mean_motion_rev_day(&self) -> f64 {
        self.elements.mean_motion
    }

    /// Altitude above the spherical Earth implied by the mean motion [m]
    pub fn mean_altitude_m(&self) -> f64 {
        let n = self.elements.mean_motion * 2.0 * PI / SECONDS_PER_DAY;
        (MU_EARTH_M3_S2 / (n * n)).cbrt() - EARTH_RADIUS_M
    }
}

impl Propagator for TleOrbit {
    fn propagate(&self, time_s: f64) -> Result<OrbitState> {
        let prediction = self
            .constants
            .propagate(time_s / 60.0)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        // sgp4 works in km and km/s
        let [x, y, z] = prediction.position;
        let [vx, vy, vz] = prediction.velocity;

        Ok(OrbitState {
            time_s,
            position_eci: Vector3::new(x, y, z) * 1e3,
            velocity_eci: Vector3::new(vx, vy, vz) * 1e3,
        })
    }

    fn period_s(&self) -> f64 {
        SECONDS_PER_DAY / self.elements.mean_motion
    }
}
