//! Transmit and receive chains
//!
//! EIRP = P_tx + G_tx - L_feed - L_pointing - L_other [dBW]
//! G/T  = G_rx - L_feed - L_pointing - L_other - 10·log10(T_sys) [dB/K]

use orbital_mechanics::constants::T_REF_K;
use serde::{Deserialize, Serialize};

use crate::path_loss::{dbm_to_dbw, from_db, to_db};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransmitterChain {
    pub power_dbw: f64,
    pub antenna_gain_dbi: f64,
    #[serde(default)]
    pub feed_loss_db: f64,
    #[serde(default)]
    pub pointing_loss_db: f64,
    #[serde(default)]
    pub other_loss_db: f64,
}

impl TransmitterChain {
    pub fn new(power_dbw: f64, antenna_gain_dbi: f64) -> Self {
        Self {
            power_dbw,
            antenna_gain_dbi,
            feed_loss_db: 0.0,
            pointing_loss_db: 0.0,
            other_loss_db: 0.0,
        }
    }

    pub fn from_power_dbm(power_dbm: f64, antenna_gain_dbi: f64) -> Self {
        Self::new(dbm_to_dbw(power_dbm), antenna_gain_dbi)
    }

    pub fn with_losses(mut self, feed_loss_db: f64, pointing_loss_db: f64, other_loss_db: f64) -> Self {
        self.feed_loss_db = feed_loss_db;
        self.pointing_loss_db = pointing_loss_db;
        self.other_loss_db = other_loss_db;
        self
    }

    /// Effective isotropic radiated power [dBW]
    pub fn eirp_dbw(&self) -> f64 {
        self.power_dbw + self.antenna_gain_dbi
            - self.feed_loss_db
            - self.pointing_loss_db
            - self.other_loss_db
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReceiverChain {
    pub antenna_gain_dbi: f64,
    pub system_noise_temp_k: f64,
    #[serde(default)]
    pub feed_loss_db: f64,
    #[serde(default)]
    pub pointing_loss_db: f64,
    #[serde(default)]
    pub other_loss_db: f64,
}

impl ReceiverChain {
    pub fn new(antenna_gain_dbi: f64, system_noise_temp_k: f64) -> Self {
        Self {
            antenna_gain_dbi,
            system_noise_temp_k,
            feed_loss_db: 0.0,
            pointing_loss_db: 0.0,
            other_loss_db: 0.0,
        }
    }

    pub fn with_losses(mut self, feed_loss_db: f64, pointing_loss_db: f64, other_loss_db: f64) -> Self {
        self.feed_loss_db = feed_loss_db;
        self.pointing_loss_db = pointing_loss_db;
        self.other_loss_db = other_loss_db;
        self
    }

    /// Figure of merit G/T [dB/K]
    pub fn figure_of_merit_db_per_k(&self) -> f64 {
        let effective_gain =
            self.antenna_gain_dbi - self.feed_loss_db - self.pointing_loss_db - self.other_loss_db;
        figure_of_merit_db(effective_gain, self.system_noise_temp_k)
    }
}

/// Friis cascade: T_sys = T_ant + T_lna + T_next / G_lna [K]
pub fn system_noise_temperature(t_ant_k: f64, t_lna_k: f64, g_lna_db: f64, t_next_k: f64) -> f64 {
    t_ant_k + t_lna_k + t_next_k / from_db(g_lna_db)
}

/// T = T_ref·(10^(NF/10) - 1) [K]
pub fn noise_figure_to_temperature(nf_db: f64) -> f64 {
    T_REF_K * (from_db(nf_db) - 1.0)
}

pub fn figure_of_merit_db(gain_db: f64, t_sys_k: f64) -> f64 {
    gain_db - to_db(t_sys_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eirp() {
        let tx = TransmitterChain::from_power_dbm(33.0, 5.15).with_losses(0.0, 1.0, 0.0);
        assert!((tx.eirp_dbw() - 7.15).abs() < 1e-12);
    }

    #[test]
    fn test_figure_of_merit() {
        let rx = ReceiverChain::new(14.0, 500.0).with_losses(0.5, 0.0, 0.0);
        // 13.5 - 26.99
        assert!((rx.figure_of_merit_db_per_k() + 13.49).abs() < 0.01);
    }

    #[test]
    fn test_noise_figure_conversion() {
        // 3 dB noise figure ≈ 289 K
        assert!((noise_figure_to_temperature(3.0) - 288.6).abs() < 0.5);
        assert_eq!(noise_figure_to_temperature(0.0), 0.0);
    }

    #[test]
    fn test_friis_cascade() {
        let t_sys = system_noise_temperature(100.0, 50.0, 20.0, 1000.0);
        assert!((t_sys - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_chain_deserialize_defaults() {
        let rx: ReceiverChain =
            serde_json::from_str(r#"{"antenna_gain_dbi": 35.0, "system_noise_temp_k": 150.0}"#).unwrap();
        assert_eq!(rx.feed_loss_db, 0.0);
    }
}
