//! Link Budget Library
//!
//! RF link budget for satellite-to-ground links. Accounts for:
//! - Transmitter EIRP and receiver G/T
//! - Free space path loss over the true slant range
//! - Atmospheric loss from a pluggable provider
//! - Polarization and miscellaneous losses
//! - Required Eb/N0 from the modem configuration
//! - Design checks: band, EIRP limit, worst-case closure, gain, rate

use thiserror::Error;

pub mod atmosphere;
pub mod budget;
pub mod chain;
pub mod evaluator;
pub mod modem;
pub mod path_loss;
pub mod validation;

pub use atmosphere::{AirMassLoss, AtmosphereConfig, AtmosphereModel, ClearSky, FixedLoss};
pub use budget::{compute_link_budget, max_data_rate_bps, required_power_dbw, LinkBudgetResult, LinkParams};
pub use chain::{ReceiverChain, TransmitterChain};
pub use evaluator::{LinkEvaluator, LinkSample, ATMOSPHERE_ELEVATION_FLOOR_DEG};
pub use modem::{ModemConfig, ModemPerformance};
pub use validation::ValidationResult;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("{quantity} must be positive, got {value}")]
    NonPositive { quantity: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, LinkError>;

pub(crate) fn ensure_positive(quantity: &'static str, value: f64) -> Result<()> {
    // `!(x > 0)` also rejects NaN
    if !(value > 0.0) {
        return Err(LinkError::NonPositive { quantity, value });
    }
    Ok(())
}
