//! Mission configuration
//!
//! A JSON mission file names the orbit, the ground station, both RF chains,
//! the modem and the run settings. Range checks live here; the propagator
//! and geometry layers accept any numbers they are given.

use chrono::{DateTime, Utc};
use ground_stations::{GroundStation, StationRegistry};
use link_budget::path_loss::slant_range_m;
use link_budget::validation::{validate_antenna_gain, validate_link_closes, MAX_REASONABLE_GAIN_DBI};
use link_budget::{
    compute_link_budget, AtmosphereConfig, AtmosphereModel, LinkBudgetResult, LinkParams,
    ModemConfig, ModemPerformance, ReceiverChain, TransmitterChain, ValidationResult,
    ATMOSPHERE_ELEVATION_FLOOR_DEG,
};
use orbital_mechanics::{CircularElements, CircularOrbit, Propagator, TleOrbit};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::engine::PassSimulation;
use crate::results::PassSimulationResults;
use crate::{Result, SimulationError};

/// Orbit source chosen at run time.
pub type DynPropagator = Box<dyn Propagator + Send + Sync>;

/// Engine as assembled from a mission file.
pub type MissionSimulation = PassSimulation<DynPropagator, ModemConfig, AtmosphereConfig>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrbitConfig {
    Circular(CircularElements),
    /// Time zero is the TLE epoch
    Tle { line1: String, line2: String },
}

impl OrbitConfig {
    pub fn build(&self) -> Result<DynPropagator> {
        match self {
            OrbitConfig::Circular(elements) => Ok(Box::new(CircularOrbit::new(elements))),
            OrbitConfig::Tle { line1, line2 } => Ok(Box::new(TleOrbit::from_tle(line1, line2)?)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StationConfig {
    /// Entry of the reference network, optionally with a different mask
    Preset {
        name: String,
        #[serde(default)]
        min_elevation_deg: Option<f64>,
    },
    Custom(GroundStation),
}

impl StationConfig {
    pub fn resolve(&self, registry: &StationRegistry) -> Result<GroundStation> {
        match self {
            StationConfig::Preset {
                name,
                min_elevation_deg,
            } => {
                let mut station = registry.get(name)?.clone();
                if let Some(mask) = min_elevation_deg {
                    station.min_elevation_deg = *mask;
                }
                Ok(station)
            }
            StationConfig::Custom(station) => Ok(station.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransmitterConfig {
    pub power_dbm: f64,
    pub antenna_gain_dbi: f64,
    #[serde(default)]
    pub feed_loss_db: f64,
    #[serde(default)]
    pub pointing_loss_db: f64,
    #[serde(default)]
    pub other_loss_db: f64,
}

impl TransmitterConfig {
    pub fn chain(&self) -> TransmitterChain {
        TransmitterChain::from_power_dbm(self.power_dbm, self.antenna_gain_dbi).with_losses(
            self.feed_loss_db,
            self.pointing_loss_db,
            self.other_loss_db,
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModemSettings {
    #[serde(flatten)]
    pub performance: ModemConfig,
    pub data_rate_bps: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub duration_orbits: f64,
    pub fine_step_s: f64,
    pub coarse_step_s: f64,
    /// Sample windows on the rayon pool
    pub parallel: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            duration_orbits: 24.0,
            fine_step_s: 1.0,
            coarse_step_s: 10.0,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionConfig {
    pub name: String,
    pub frequency_hz: f64,
    /// Wall-clock time of t = 0, used only for reporting
    #[serde(default)]
    pub epoch: Option<DateTime<Utc>>,
    pub orbit: OrbitConfig,
    pub ground_station: StationConfig,
    pub transmitter: TransmitterConfig,
    pub receiver: ReceiverChain,
    pub modem: ModemSettings,
    #[serde(default)]
    pub atmosphere: AtmosphereConfig,
    #[serde(default)]
    pub polarization_loss_db: f64,
    #[serde(default)]
    pub misc_loss_db: f64,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

fn ensure(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SimulationError::Config(message()))
    }
}

impl MissionConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading mission from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: MissionConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MissionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the physics layers would silently turn into garbage.
    /// Antenna gains are not checked: negative gains are legitimate.
    pub fn validate(&self) -> Result<()> {
        ensure(self.frequency_hz > 0.0, || {
            format!("frequency_hz must be positive, got {}", self.frequency_hz)
        })?;
        ensure(self.modem.data_rate_bps > 0.0, || {
            format!("data_rate_bps must be positive, got {}", self.modem.data_rate_bps)
        })?;
        ensure(self.receiver.system_noise_temp_k > 0.0, || {
            format!(
                "system_noise_temp_k must be positive, got {}",
                self.receiver.system_noise_temp_k
            )
        })?;
        ensure(
            self.polarization_loss_db >= 0.0 && self.misc_loss_db >= 0.0,
            || "extra losses must not be negative".to_string(),
        )?;

        if let OrbitConfig::Circular(elements) = &self.orbit {
            ensure(elements.altitude_km >= 0.0 && elements.altitude_km.is_finite(), || {
                format!("altitude_km must not be negative, got {}", elements.altitude_km)
            })?;
            ensure((0.0..=180.0).contains(&elements.inclination_deg), || {
                format!(
                    "inclination_deg must be within [0, 180], got {}",
                    elements.inclination_deg
                )
            })?;
        }

        match &self.ground_station {
            StationConfig::Preset {
                min_elevation_deg: Some(mask),
                ..
            } => check_mask(*mask)?,
            StationConfig::Preset { .. } => {}
            StationConfig::Custom(station) => {
                ensure((-90.0..=90.0).contains(&station.latitude_deg), || {
                    format!("latitude_deg must be within [-90, 90], got {}", station.latitude_deg)
                })?;
                ensure((-180.0..=180.0).contains(&station.longitude_deg), || {
                    format!(
                        "longitude_deg must be within [-180, 180], got {}",
                        station.longitude_deg
                    )
                })?;
                check_mask(station.min_elevation_deg)?;
            }
        }

        let sim = &self.simulation;
        ensure(
            sim.duration_orbits > 0.0 && sim.fine_step_s > 0.0 && sim.coarse_step_s > 0.0,
            || {
                format!(
                    "simulation duration and steps must be positive, got {} orbits, fine {} s, coarse {} s",
                    sim.duration_orbits, sim.fine_step_s, sim.coarse_step_s
                )
            },
        )?;

        Ok(())
    }

    /// Assemble the engine. Presets resolve against the reference network.
    pub fn build(&self) -> Result<MissionSimulation> {
        self.validate()?;

        let registry = StationRegistry::with_reference_network();
        let orbit = self.orbit.build()?;
        let station = self.ground_station.resolve(&registry)?;

        Ok(PassSimulation::new(
            orbit,
            station,
            self.transmitter.chain(),
            self.receiver,
            self.modem.performance,
            self.frequency_hz,
            self.modem.data_rate_bps,
        )
        .with_atmosphere(self.atmosphere)
        .with_extra_losses(self.polarization_loss_db, self.misc_loss_db))
    }

    /// Build and run with the configured settings.
    pub fn run(&self) -> Result<PassSimulationResults> {
        let simulation = self.build()?;
        let sim = &self.simulation;
        if sim.parallel {
            simulation.run_parallel(sim.duration_orbits, sim.fine_step_s, sim.coarse_step_s)
        } else {
            simulation.run(sim.duration_orbits, sim.fine_step_s, sim.coarse_step_s)
        }
    }

    /// Wall-clock time of t = 0: the configured epoch, else the TLE epoch.
    pub fn reference_epoch(&self) -> Result<Option<DateTime<Utc>>> {
        if self.epoch.is_some() {
            return Ok(self.epoch);
        }
        match &self.orbit {
            OrbitConfig::Tle { line1, line2 } => Ok(Some(TleOrbit::from_tle(line1, line2)?.epoch())),
            OrbitConfig::Circular(_) => Ok(None),
        }
    }

    /// Nominal altitude for single-point budgets [m].
    pub fn nominal_altitude_m(&self) -> Result<f64> {
        match &self.orbit {
            OrbitConfig::Circular(elements) => Ok(elements.altitude_km * 1e3),
            OrbitConfig::Tle { line1, line2 } => Ok(TleOrbit::from_tle(line1, line2)?.mean_altitude_m()),
        }
    }

    /// Link budget at the geometric slant range for `elevation_deg`.
    pub fn link_budget_at(&self, elevation_deg: f64) -> Result<LinkBudgetResult> {
        self.validate()?;
        if !(0.0..=90.0).contains(&elevation_deg) {
            return Err(SimulationError::InvalidParameter(format!(
                "elevation must be within [0, 90] deg, got {}",
                elevation_deg
            )));
        }

        let distance_m = slant_range_m(self.nominal_altitude_m()?, elevation_deg);
        let params = self.link_params(distance_m, elevation_deg);
        Ok(compute_link_budget(&self.transmitter.chain(), &self.receiver, &params)?)
    }

    /// Antenna gain sanity for both ends and worst-case closure at the
    /// station's elevation mask.
    pub fn design_checks(&self) -> Result<Vec<ValidationResult>> {
        self.validate()?;
        let station = self
            .ground_station
            .resolve(&StationRegistry::with_reference_network())?;
        let mask = station.min_elevation_deg;
        let tx = self.transmitter.chain();

        // distance is replaced by the slant range at the mask
        let params = self.link_params(1.0, mask);
        let closes = validate_link_closes(&tx, &self.receiver, &params, self.nominal_altitude_m()?, mask)?;

        Ok(vec![
            validate_antenna_gain(tx.antenna_gain_dbi, MAX_REASONABLE_GAIN_DBI),
            validate_antenna_gain(self.receiver.antenna_gain_dbi, MAX_REASONABLE_GAIN_DBI),
            closes,
        ])
    }

    fn link_params(&self, distance_m: f64, elevation_deg: f64) -> LinkParams {
        let atmospheric_loss_db = self.atmosphere.total_loss_db(
            self.frequency_hz / 1e9,
            elevation_deg.max(ATMOSPHERE_ELEVATION_FLOOR_DEG),
        );
        LinkParams {
            frequency_hz: self.frequency_hz,
            distance_m,
            data_rate_bps: self.modem.data_rate_bps,
            required_eb_n0_db: self.modem.performance.required_eb_n0_db(),
            atmospheric_loss_db,
            polarization_loss_db: self.polarization_loss_db,
            misc_loss_db: self.misc_loss_db,
        }
    }
}

fn check_mask(min_elevation_deg: f64) -> Result<()> {
    ensure((-90.0..=90.0).contains(&min_elevation_deg), || {
        format!("min_elevation_deg must be within [-90, 90], got {}", min_elevation_deg)
    })
}
