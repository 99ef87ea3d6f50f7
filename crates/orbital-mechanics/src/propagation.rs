//! Circular Orbit Propagator
//!
//! Zero-eccentricity Keplerian motion with optional first-order secular J2
//! drift of the ascending node and of the argument of latitude. No periodic
//! terms are modelled.
//!
//! Inputs are not validated here: a negative altitude or an inclination
//! outside [0°, 180°] simply produces numerically meaningless states.
//! Mission configuration is checked before an orbit is built.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::{EARTH_RADIUS_M, J2_EARTH, MU_EARTH_M3_S2};
use crate::{OrbitState, Propagator, Result};
use nalgebra::Vector3;

fn default_j2() -> bool {
    true
}

/// Elements of a circular orbit, as supplied by mission configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CircularElements {
    pub altitude_km: f64,
    pub inclination_deg: f64,
    #[serde(default)]
    pub raan_deg: f64,
    /// Argument of latitude at epoch
    #[serde(default)]
    pub arg_latitude_deg: f64,
    #[serde(default)]
    pub epoch_s: f64,
    #[serde(default = "default_j2")]
    pub j2: bool,
}

impl CircularElements {
    pub fn new(altitude_km: f64, inclination_deg: f64) -> Self {
        Self {
            altitude_km,
            inclination_deg,
            raan_deg: 0.0,
            arg_latitude_deg: 0.0,
            epoch_s: 0.0,
            j2: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    altitude_m: f64,
    inclination_rad: f64,
    raan_rad: f64,
    arg_latitude_rad: f64,
    epoch_s: f64,
    j2_enabled: bool,
    semi_major_axis_m: f64,
    mean_motion_rad_s: f64,
    raan_rate_rad_s: f64,
    arg_latitude_rate_correction_rad_s: f64,
}

impl CircularOrbit {
    pub fn new(elements: &CircularElements) -> Self {
        let semi_major_axis_m = EARTH_RADIUS_M + elements.altitude_km * 1e3;
        let mean_motion_rad_s = (MU_EARTH_M3_S2 / semi_major_axis_m.powi(3)).sqrt();
        let inclination_rad = elements.inclination_deg.to_radians();

        let (raan_rate_rad_s, arg_latitude_rate_correction_rad_s) = if elements.j2 {
            let k = mean_motion_rad_s * J2_EARTH * (EARTH_RADIUS_M / semi_major_axis_m).powi(2);
            let cos_i = inclination_rad.cos();
            (-1.5 * k * cos_i, 0.75 * k * (5.0 * cos_i * cos_i - 1.0))
        } else {
            (0.0, 0.0)
        };

        Self {
            altitude_m: elements.altitude_km * 1e3,
            inclination_rad,
            raan_rad: elements.raan_deg.to_radians(),
            arg_latitude_rad: elements.arg_latitude_deg.to_radians(),
            epoch_s: elements.epoch_s,
            j2_enabled: elements.j2,
            semi_major_axis_m,
            mean_motion_rad_s,
            raan_rate_rad_s,
            arg_latitude_rate_correction_rad_s,
        }
    }

    /// Circular orbit with zero argument of latitude at epoch 0.
    pub fn circular(altitude_km: f64, inclination_deg: f64, raan_deg: f64, j2: bool) -> Self {
        Self::new(&CircularElements {
            raan_deg,
            j2,
            ..CircularElements::new(altitude_km, inclination_deg)
        })
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn inclination_rad(&self) -> f64 {
        self.inclination_rad
    }

    pub fn semi_major_axis_m(&self) -> f64 {
        self.semi_major_axis_m
    }

    pub fn mean_motion_rad_s(&self) -> f64 {
        self.mean_motion_rad_s
    }

    /// Circular orbital speed √(μ/a) [m/s]
    pub fn speed_m_s(&self) -> f64 {
        (MU_EARTH_M3_S2 / self.semi_major_axis_m).sqrt()
    }

    pub fn period_s(&self) -> f64 {
        2.0 * PI / self.mean_motion_rad_s
    }

    pub fn j2_enabled(&self) -> bool {
        self.j2_enabled
    }

    /// Secular RAAN drift Ω′ [rad/s]
    pub fn raan_rate_rad_s(&self) -> f64 {
        self.raan_rate_rad_s
    }

    /// Secular correction added to the mean motion [rad/s]
    pub fn arg_latitude_rate_correction_rad_s(&self) -> f64 {
        self.arg_latitude_rate_correction_rad_s
    }

    /// Inertial state at `time_s`. Valid for any time, including before epoch.
    pub fn state_at(&self, time_s: f64) -> OrbitState {
        let dt = time_s - self.epoch_s;
        let u_dot = self.mean_motion_rad_s + self.arg_latitude_rate_correction_rad_s;
        let u = self.arg_latitude_rad + u_dot * dt;
        let raan = self.raan_rad + self.raan_rate_rad_s * dt;
        let r = self.semi_major_axis_m;

        let (sin_u, cos_u) = u.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_inc, cos_inc) = self.inclination_rad.sin_cos();

        // In-plane position and its rate
        let x_orb = r * cos_u;
        let y_orb = r * sin_u;
        let vx_orb = -r * sin_u * u_dot;
        let vy_orb = r * cos_u * u_dot;

        let x = x_orb * cos_raan - y_orb * sin_raan * cos_inc;
        let y = x_orb * sin_raan + y_orb * cos_raan * cos_inc;
        let z = y_orb * sin_inc;

        // d/dt of the rotation includes the Ω′ cross term: ∂x/∂Ω = -y, ∂y/∂Ω = x
        let raan_dot = self.raan_rate_rad_s;
        let vx = vx_orb * cos_raan - vy_orb * sin_raan * cos_inc - y * raan_dot;
        let vy = vx_orb * sin_raan + vy_orb * cos_raan * cos_inc + x * raan_dot;
        let vz = vy_orb * sin_inc;

        OrbitState {
            time_s,
            position_eci: Vector3::new(x, y, z),
            velocity_eci: Vector3::new(vx, vy, vz),
        }
    }
}

impl Propagator for CircularOrbit {
    fn propagate(&self, time_s: f64) -> Result<OrbitState> {
        Ok(self.state_at(time_s))
    }

    fn period_s(&self) -> f64 {
        CircularOrbit::period_s(self)
    }
}
