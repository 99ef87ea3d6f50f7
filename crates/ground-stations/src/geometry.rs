//! Station geometry on a spherical rotating Earth
//!
//! The sidereal angle is always supplied by the caller so every function
//! here is a pure function of its arguments.

use nalgebra::Vector3;
use orbital_mechanics::constants::{EARTH_RADIUS_M, EARTH_ROTATION_RATE_RAD_S};
use std::f64::consts::FRAC_PI_2;

use crate::GroundStation;

/// Sidereal angle at `time_s`, zero at the simulation origin [rad].
pub fn sidereal_angle_rad(time_s: f64) -> f64 {
    EARTH_ROTATION_RATE_RAD_S * time_s
}

fn spherical_to_cartesian(radius: f64, lat_rad: f64, lon_rad: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    Vector3::new(
        radius * cos_lat * cos_lon,
        radius * cos_lat * sin_lon,
        radius * sin_lat,
    )
}

impl GroundStation {
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude rotated into the inertial frame [rad].
    pub fn inertial_longitude_rad(&self, sidereal_angle_rad: f64) -> f64 {
        self.longitude_deg.to_radians() + sidereal_angle_rad
    }

    fn geocentric_radius_m(&self) -> f64 {
        EARTH_RADIUS_M + self.altitude_m
    }

    /// Earth-fixed position [m].
    pub fn ecef_position(&self) -> Vector3<f64> {
        spherical_to_cartesian(
            self.geocentric_radius_m(),
            self.latitude_rad(),
            self.longitude_deg.to_radians(),
        )
    }

    /// Inertial position for the given sidereal angle [m].
    pub fn eci_position(&self, sidereal_angle_rad: f64) -> Vector3<f64> {
        spherical_to_cartesian(
            self.geocentric_radius_m(),
            self.latitude_rad(),
            self.inertial_longitude_rad(sidereal_angle_rad),
        )
    }

    /// Inertial velocity from Earth rotation alone [m/s].
    pub fn eci_velocity(&self, sidereal_angle_rad: f64) -> Vector3<f64> {
        let lon = self.inertial_longitude_rad(sidereal_angle_rad);
        let v = EARTH_ROTATION_RATE_RAD_S * self.geocentric_radius_m() * self.latitude_rad().cos();
        Vector3::new(-v * lon.sin(), v * lon.cos(), 0.0)
    }

    /// Azimuth of `sat_pos_eci` seen from this station [deg].
    pub fn azimuth_to(&self, sat_pos_eci: &Vector3<f64>, sidereal_angle_rad: f64) -> f64 {
        azimuth_angle(
            sat_pos_eci,
            &self.eci_position(sidereal_angle_rad),
            self.latitude_rad(),
            self.inertial_longitude_rad(sidereal_angle_rad),
        )
    }
}

/// Elevation of the satellite above the local horizon [deg], in [-90, 90].
///
/// Computed as 90° minus the angle between the line of sight and the local
/// zenith (the station's geocentric unit vector).
pub fn elevation_angle(sat_pos_eci: &Vector3<f64>, station_pos_eci: &Vector3<f64>) -> f64 {
    let range_vec = sat_pos_eci - station_pos_eci;
    let zenith = station_pos_eci.normalize();

    // Clamp guards acos against rounding just outside [-1, 1] at zenith/nadir
    let cos_zenith_angle = (range_vec.dot(&zenith) / range_vec.norm()).clamp(-1.0, 1.0);
    (FRAC_PI_2 - cos_zenith_angle.acos()).to_degrees()
}

/// Azimuth of the satellite, clockwise from north [deg], in [0, 360).
///
/// `station_lon_rad` is the station longitude already rotated by the
/// sidereal angle.
pub fn azimuth_angle(
    sat_pos_eci: &Vector3<f64>,
    station_pos_eci: &Vector3<f64>,
    station_lat_rad: f64,
    station_lon_rad: f64,
) -> f64 {
    let range_vec = sat_pos_eci - station_pos_eci;

    let (sin_lat, cos_lat) = station_lat_rad.sin_cos();
    let (sin_lon, cos_lon) = station_lon_rad.sin_cos();

    let east_unit = Vector3::new(-sin_lon, cos_lon, 0.0);
    let north_unit = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);

    let east = range_vec.dot(&east_unit);
    let north = range_vec.dot(&north_unit);

    let azimuth = east.atan2(north).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if azimuth >= 360.0 {
        0.0
    } else {
        azimuth
    }
}
