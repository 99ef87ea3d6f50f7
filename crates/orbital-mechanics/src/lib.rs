//! Orbital Mechanics Library
//!
//! Analytic circular-orbit propagation with first-order secular J2 drift,
//! an SGP4 adaptor for TLE-defined satellites, and Doppler geometry.
//!
//! All positions and velocities are expressed in the inertial frame in
//! metres and metres per second. Times are seconds relative to the
//! simulation origin.

use nalgebra::Vector3;
use thiserror::Error;

pub mod constants;
pub mod doppler;
pub mod propagation;
pub mod tle;

pub use propagation::{CircularElements, CircularOrbit};
pub use tle::TleOrbit;

#[derive(Error, Debug)]
pub enum OrbitalError {
    #[error("Invalid TLE format: {0}")]
    InvalidTle(String),
    #[error("Propagation failed: {0}")]
    PropagationFailed(String),
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Satellite state at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub time_s: f64,
    /// Inertial position [m]
    pub position_eci: Vector3<f64>,
    /// Inertial velocity [m/s]
    pub velocity_eci: Vector3<f64>,
}

impl OrbitState {
    pub fn radius_m(&self) -> f64 {
        self.position_eci.norm()
    }

    pub fn speed_m_s(&self) -> f64 {
        self.velocity_eci.norm()
    }
}

/// Anything that yields a satellite state as a pure function of time.
///
/// Implementations must not mutate shared state: the contact detector and
/// the pass engine call `propagate` from several threads at once when
/// passes are sampled in parallel.
pub trait Propagator {
    fn propagate(&self, time_s: f64) -> Result<OrbitState>;

    /// Nominal orbital period [s].
    fn period_s(&self) -> f64;
}

impl<P: Propagator + ?Sized> Propagator for Box<P> {
    fn propagate(&self, time_s: f64) -> Result<OrbitState> {
        (**self).propagate(time_s)
    }

    fn period_s(&self) -> f64 {
        (**self).period_s()
    }
}

impl<P: Propagator + ?Sized> Propagator for &P {
    fn propagate(&self, time_s: f64) -> Result<OrbitState> {
        (**self).propagate(time_s)
    }

    fn period_s(&self) -> f64 {
        (**self).period_s()
    }
}
