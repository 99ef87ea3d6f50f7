//! Ground Stations Library
//!
//! Fixed ground terminals on a spherical, uniformly rotating Earth:
//! rotating- and inertial-frame position/velocity, look angles to a
//! satellite, contact window detection, and a registry of reference sites.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod contact;
pub mod geometry;

pub use contact::{find_contacts, ContactAnalysis, ContactWindow};
pub use geometry::{azimuth_angle, elevation_angle, sidereal_angle_rad};

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Station not found: {name} (available: {available})")]
    NotFound { name: String, available: String },
}

pub type Result<T> = std::result::Result<T, StationError>;

fn default_min_elevation() -> f64 {
    5.0
}

/// Ground station with geographic coordinates. Immutable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroundStation {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
    #[serde(default = "default_min_elevation")]
    pub min_elevation_deg: f64,
}

impl GroundStation {
    pub fn new(
        name: impl Into<String>,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        min_elevation_deg: f64,
    ) -> Self {
        Self {
            name: name.into(),
            latitude_deg,
            longitude_deg,
            altitude_m,
            min_elevation_deg,
        }
    }
}

pub struct StationRegistry {
    stations: Vec<GroundStation>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
        }
    }

    pub fn with_reference_network() -> Self {
        let mut registry = Self::new();
        registry.load_reference_network();
        registry
    }

    fn load_reference_network(&mut self) {
        let sites = [
            ("Svalbard", 78.23, 15.39, 450.0, 5.0),
            ("Kiruna", 67.86, 20.96, 402.0, 5.0),
            ("Fairbanks", 64.86, -147.85, 160.0, 5.0),
            ("Wallops", 37.94, -75.46, 10.0, 5.0),
            ("Hartebeesthoek", -25.89, 27.69, 1540.0, 5.0),
            ("Santiago", -33.15, -70.67, 723.0, 5.0),
            ("McMurdo", -77.84, 166.67, 10.0, 5.0),
        ];

        for (name, lat, lon, alt, min_el) in sites {
            self.stations
                .push(GroundStation::new(name, lat, lon, alt, min_el));
        }
    }

    pub fn insert(&mut self, station: GroundStation) {
        self.stations.retain(|s| !s.name.eq_ignore_ascii_case(&station.name));
        self.stations.push(station);
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Result<&GroundStation> {
        self.stations
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StationError::NotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroundStation> {
        self.stations.iter()
    }
}

impl Default for StationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_network_lookup() {
        let registry = StationRegistry::with_reference_network();
        let svalbard = registry.get("svalbard").unwrap();
        assert_eq!(svalbard.name, "Svalbard");
        assert!((svalbard.latitude_deg - 78.23).abs() < 1e-9);
        assert_eq!(svalbard.min_elevation_deg, 5.0);
    }

    #[test]
    fn test_unknown_station() {
        let registry = StationRegistry::with_reference_network();
        let err = registry.get("Atlantis").unwrap_err();
        assert!(err.to_string().starts_with("Station not found: Atlantis"), "{}", err);
        match err {
            StationError::NotFound { name, available } => {
                assert_eq!(name, "Atlantis");
                assert!(available.contains("Kiruna"));
                assert!(available.contains("Svalbard"));
            }
        }
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut registry = StationRegistry::with_reference_network();
        let count = registry.names().len();
        registry.insert(GroundStation::new("KIRUNA", 67.0, 21.0, 0.0, 10.0));
        assert_eq!(registry.names().len(), count);
        assert_eq!(registry.get("kiruna").unwrap().min_elevation_deg, 10.0);
    }

    #[test]
    fn test_station_deserialize_defaults() {
        let station: GroundStation =
            serde_json::from_str(r#"{"name": "Custom", "latitude_deg": 45.0, "longitude_deg": 7.0}"#)
                .unwrap();
        assert_eq!(station.altitude_m, 0.0);
        assert_eq!(station.min_elevation_deg, 5.0);
    }
}
