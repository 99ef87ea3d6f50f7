//! Modem requirement
//!
//! The link budget only needs the Eb/N0 the demodulator requires for its
//! target bit error rate. It is read once per simulation run.

use serde::{Deserialize, Serialize};

pub trait ModemPerformance {
    fn required_eb_n0_db(&self) -> f64;
}

fn default_implementation_loss() -> f64 {
    1.0
}

/// Uncoded requirement adjusted for coding gain and implementation loss.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModemConfig {
    /// Uncoded Eb/N0 for the target BER (e.g. 9.6 dB for BPSK at 1e-5)
    pub uncoded_eb_n0_db: f64,
    #[serde(default)]
    pub coding_gain_db: f64,
    #[serde(default = "default_implementation_loss")]
    pub implementation_loss_db: f64,
}

impl ModemConfig {
    pub fn new(uncoded_eb_n0_db: f64, coding_gain_db: f64, implementation_loss_db: f64) -> Self {
        Self {
            uncoded_eb_n0_db,
            coding_gain_db,
            implementation_loss_db,
        }
    }
}

impl ModemPerformance for ModemConfig {
    fn required_eb_n0_db(&self) -> f64 {
        self.uncoded_eb_n0_db - self.coding_gain_db + self.implementation_loss_db
    }
}

/// A fixed requirement in dB
impl ModemPerformance for f64 {
    fn required_eb_n0_db(&self) -> f64 {
        *self
    }
}
