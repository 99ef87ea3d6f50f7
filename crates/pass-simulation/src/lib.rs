//! Pass Simulation Library
//!
//! Time-stepped link budget over every satellite pass of a mission:
//! - One coarse contact scan over the whole horizon
//! - Fine re-sampling inside each detected window (geometry, link, Doppler)
//! - Euler-integrated data volume and mission totals
//! - Text report and JSON mission configuration

use thiserror::Error;

pub mod config;
pub mod engine;
pub mod report;
pub mod results;

pub use config::MissionConfig;
pub use engine::PassSimulation;
pub use report::generate_report;
pub use results::{PassData, PassSimulationResults};

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Orbit error: {0}")]
    Orbital(#[from] orbital_mechanics::OrbitalError),
    #[error("Link budget error: {0}")]
    Link(#[from] link_budget::LinkError),
    #[error("Ground station error: {0}")]
    Station(#[from] ground_stations::StationError),
    #[error("Invalid run parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid mission configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
