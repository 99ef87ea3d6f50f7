//! Atmospheric loss providers
//!
//! The link evaluator consumes a single aggregate loss per sample. Detailed
//! propagation models plug in through [`AtmosphereModel`]; the providers
//! here cover clear sky, a flat allowance, and an air-mass scaled zenith
//! loss.

use serde::{Deserialize, Serialize};

/// Total atmospheric loss for a slant path [dB], never negative.
///
/// The evaluator never passes an elevation below
/// [`crate::ATMOSPHERE_ELEVATION_FLOOR_DEG`].
pub trait AtmosphereModel {
    fn total_loss_db(&self, frequency_ghz: f64, elevation_deg: f64) -> f64;
}

impl<A: AtmosphereModel + ?Sized> AtmosphereModel for &A {
    fn total_loss_db(&self, frequency_ghz: f64, elevation_deg: f64) -> f64 {
        (**self).total_loss_db(frequency_ghz, elevation_deg)
    }
}

impl<A: AtmosphereModel + ?Sized> AtmosphereModel for Box<A> {
    fn total_loss_db(&self, frequency_ghz: f64, elevation_deg: f64) -> f64 {
        (**self).total_loss_db(frequency_ghz, elevation_deg)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClearSky;

impl AtmosphereModel for ClearSky {
    fn total_loss_db(&self, _frequency_ghz: f64, _elevation_deg: f64) -> f64 {
        0.0
    }
}

/// Constant allowance independent of geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLoss {
    pub loss_db: f64,
}

impl AtmosphereModel for FixedLoss {
    fn total_loss_db(&self, _frequency_ghz: f64, _elevation_deg: f64) -> f64 {
        self.loss_db.max(0.0)
    }
}

/// Zenith loss scaled by relative air mass (Kasten-Young).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirMassLoss {
    pub zenith_loss_db: f64,
}

impl AirMassLoss {
    pub fn air_mass(elevation_deg: f64) -> f64 {
        let zenith_deg = 90.0 - elevation_deg;
        1.0 / (zenith_deg.to_radians().cos() + 0.50572 * (96.07995 - zenith_deg).powf(-1.6364))
    }
}

impl AtmosphereModel for AirMassLoss {
    fn total_loss_db(&self, _frequency_ghz: f64, elevation_deg: f64) -> f64 {
        (self.zenith_loss_db * Self::air_mass(elevation_deg)).max(0.0)
    }
}

/// Serializable atmosphere selection for mission configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum AtmosphereConfig {
    #[default]
    ClearSky,
    Fixed {
        loss_db: f64,
    },
    AirMass {
        zenith_loss_db: f64,
    },
}

impl AtmosphereModel for AtmosphereConfig {
    fn total_loss_db(&self, frequency_ghz: f64, elevation_deg: f64) -> f64 {
        match *self {
            AtmosphereConfig::ClearSky => ClearSky.total_loss_db(frequency_ghz, elevation_deg),
            AtmosphereConfig::Fixed { loss_db } => {
                FixedLoss { loss_db }.total_loss_db(frequency_ghz, elevation_deg)
            }
            AtmosphereConfig::AirMass { zenith_loss_db } => {
                AirMassLoss { zenith_loss_db }.total_loss_db(frequency_ghz, elevation_deg)
            }
        }
    }
}
