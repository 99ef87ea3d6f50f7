//! Free-space path loss, slant range geometry and dB conversions

use orbital_mechanics::constants::{EARTH_RADIUS_M, SPEED_OF_LIGHT_M_S};
use std::f64::consts::PI;

/// FSPL = 20·log10(4π·d·f / c) [dB]
///
/// Callers are responsible for passing positive distance and frequency;
/// [`crate::compute_link_budget`] validates both.
pub fn free_space_path_loss_db(distance_m: f64, frequency_hz: f64) -> f64 {
    20.0 * (4.0 * PI * distance_m * frequency_hz / SPEED_OF_LIGHT_M_S).log10()
}

/// Geometric slant range to a satellite at `altitude_m` seen at
/// `elevation_deg` from a sea-level station on a spherical Earth [m].
///
/// Only for single-point budgets. The pass engine always uses the distance
/// between propagated positions instead.
pub fn slant_range_m(altitude_m: f64, elevation_deg: f64) -> f64 {
    let sin_el = elevation_deg.to_radians().sin();
    let r_sat = EARTH_RADIUS_M + altitude_m;
    let re_sin = EARTH_RADIUS_M * sin_el;
    -re_sin + (re_sin * re_sin + r_sat * r_sat - EARTH_RADIUS_M * EARTH_RADIUS_M).sqrt()
}

pub fn to_db(linear: f64) -> f64 {
    10.0 * linear.log10()
}

pub fn from_db(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

pub fn watts_to_dbw(watts: f64) -> f64 {
    to_db(watts)
}

pub fn dbw_to_watts(dbw: f64) -> f64 {
    from_db(dbw)
}

pub fn dbm_to_dbw(dbm: f64) -> f64 {
    dbm - 30.0
}

pub fn frequency_to_wavelength_m(frequency_hz: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / frequency_hz
}
