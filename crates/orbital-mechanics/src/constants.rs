//! Physical and orbital constants (SI units)

/// Speed of light [m/s]
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Boltzmann constant [J/K]
pub const BOLTZMANN_J_PER_K: f64 = 1.380649e-23;

/// Boltzmann constant [dBW/K/Hz], 10·log10(k)
pub const BOLTZMANN_DBW: f64 = -228.599_167_173_217_67;

/// Earth mean equatorial radius [m]
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Earth gravitational parameter [m³/s²]
pub const MU_EARTH_M3_S2: f64 = 3.986004418e14;

/// Second zonal harmonic (oblateness)
pub const J2_EARTH: f64 = 1.08263e-3;

/// Earth rotation rate [rad/s]
pub const EARTH_ROTATION_RATE_RAD_S: f64 = 7.2921159e-5;

/// Reference temperature for noise figure [K]
pub const T_REF_K: f64 = 290.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boltzmann_dbw_matches_linear_constant() {
        assert!((BOLTZMANN_DBW - 10.0 * BOLTZMANN_J_PER_K.log10()).abs() < 1e-9);
    }
}
