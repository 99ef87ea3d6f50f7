//! Doppler shift calculations
//!
//! Sign convention: positive radial velocity means the satellite is
//! receding from the station, which lowers the received frequency.

use nalgebra::Vector3;

use crate::constants::{EARTH_RADIUS_M, MU_EARTH_M3_S2, SPEED_OF_LIGHT_M_S};

/// Relative velocity projected on the station→satellite line of sight [m/s].
///
/// `station_vel` defaults to zero when not supplied.
pub fn radial_velocity(
    sat_pos: &Vector3<f64>,
    sat_vel: &Vector3<f64>,
    station_pos: &Vector3<f64>,
    station_vel: Option<&Vector3<f64>>,
) -> f64 {
    let line_of_sight = (sat_pos - station_pos).normalize();
    let relative_vel = match station_vel {
        Some(v) => sat_vel - v,
        None => *sat_vel,
    };
    relative_vel.dot(&line_of_sight)
}

/// Δf = -f · v_r / c [Hz]
pub fn doppler_shift_hz(frequency_hz: f64, radial_velocity_m_s: f64) -> f64 {
    -frequency_hz * radial_velocity_m_s / SPEED_OF_LIGHT_M_S
}

/// Upper bound on |Δf| for a circular orbit at `altitude_m` [Hz].
///
/// Takes the full orbital speed as radial velocity. Only meant for sanity
/// checks and receiver tuning-range sizing.
pub fn max_doppler_shift_hz(altitude_m: f64, frequency_hz: f64) -> f64 {
    let orbital_speed = (MU_EARTH_M3_S2 / (EARTH_RADIUS_M + altitude_m)).sqrt();
    frequency_hz * orbital_speed / SPEED_OF_LIGHT_M_S
}
