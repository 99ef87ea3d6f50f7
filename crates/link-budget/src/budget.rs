//! Core link budget computation
//!
//! C/N0  = EIRP + G/T - FSPL - L_atm - L_pol - L_misc - k_B(dBW)
//! Eb/N0 = C/N0 - 10·log10(R_b)
//! Margin = Eb/N0 - Eb/N0_required
//!
//! k_B in dBW is about -228.6, so subtracting it raises C/N0.

use orbital_mechanics::constants::BOLTZMANN_DBW;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chain::{ReceiverChain, TransmitterChain};
use crate::path_loss::{free_space_path_loss_db, to_db};
use crate::{ensure_positive, Result};

/// Per-evaluation inputs that are not part of the hardware chains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkParams {
    pub frequency_hz: f64,
    pub distance_m: f64,
    pub data_rate_bps: f64,
    pub required_eb_n0_db: f64,
    pub atmospheric_loss_db: f64,
    pub polarization_loss_db: f64,
    pub misc_loss_db: f64,
}

impl LinkParams {
    pub fn new(frequency_hz: f64, distance_m: f64, data_rate_bps: f64, required_eb_n0_db: f64) -> Self {
        Self {
            frequency_hz,
            distance_m,
            data_rate_bps,
            required_eb_n0_db,
            atmospheric_loss_db: 0.0,
            polarization_loss_db: 0.0,
            misc_loss_db: 0.0,
        }
    }

    fn carrier_to_noise_density(&self, tx: &TransmitterChain, rx: &ReceiverChain, fspl_db: f64) -> f64 {
        tx.eirp_dbw() + rx.figure_of_merit_db_per_k()
            - fspl_db
            - self.atmospheric_loss_db
            - self.polarization_loss_db
            - self.misc_loss_db
            - BOLTZMANN_DBW
    }
}

/// Line-item link budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkBudgetResult {
    pub tx_power_dbw: f64,
    pub tx_antenna_gain_dbi: f64,
    pub tx_losses_db: f64,
    pub eirp_dbw: f64,

    pub frequency_hz: f64,
    pub distance_m: f64,
    pub free_space_path_loss_db: f64,
    pub atmospheric_loss_db: f64,
    pub polarization_loss_db: f64,
    pub misc_loss_db: f64,

    pub rx_antenna_gain_dbi: f64,
    pub rx_losses_db: f64,
    pub system_noise_temp_k: f64,
    pub figure_of_merit_db_per_k: f64,

    pub data_rate_bps: f64,
    pub required_eb_n0_db: f64,

    pub c_over_n0_db_hz: f64,
    pub eb_n0_db: f64,
    pub margin_db: f64,
}

impl LinkBudgetResult {
    pub fn link_closes(&self) -> bool {
        self.margin_db >= 0.0
    }
}

/// Full link budget. Frequency, distance and data rate must be positive.
pub fn compute_link_budget(
    tx: &TransmitterChain,
    rx: &ReceiverChain,
    params: &LinkParams,
) -> Result<LinkBudgetResult> {
    ensure_positive("frequency_hz", params.frequency_hz)?;
    ensure_positive("distance_m", params.distance_m)?;
    ensure_positive("data_rate_bps", params.data_rate_bps)?;

    let fspl = free_space_path_loss_db(params.distance_m, params.frequency_hz);
    let c_over_n0 = params.carrier_to_noise_density(tx, rx, fspl);
    let eb_n0 = c_over_n0 - to_db(params.data_rate_bps);

    Ok(LinkBudgetResult {
        tx_power_dbw: tx.power_dbw,
        tx_antenna_gain_dbi: tx.antenna_gain_dbi,
        tx_losses_db: tx.feed_loss_db + tx.pointing_loss_db + tx.other_loss_db,
        eirp_dbw: tx.eirp_dbw(),
        frequency_hz: params.frequency_hz,
        distance_m: params.distance_m,
        free_space_path_loss_db: fspl,
        atmospheric_loss_db: params.atmospheric_loss_db,
        polarization_loss_db: params.polarization_loss_db,
        misc_loss_db: params.misc_loss_db,
        rx_antenna_gain_dbi: rx.antenna_gain_dbi,
        rx_losses_db: rx.feed_loss_db + rx.pointing_loss_db + rx.other_loss_db,
        system_noise_temp_k: rx.system_noise_temp_k,
        figure_of_merit_db_per_k: rx.figure_of_merit_db_per_k(),
        data_rate_bps: params.data_rate_bps,
        required_eb_n0_db: params.required_eb_n0_db,
        c_over_n0_db_hz: c_over_n0,
        eb_n0_db: eb_n0,
        margin_db: eb_n0 - params.required_eb_n0_db,
    })
}

/// Highest data rate that still leaves `target_margin_db` [bps].
///
/// 10·log10(R_max) = C/N0 - Eb/N0_req - margin; zero when the link
/// cannot close even at 1 bps. `params.data_rate_bps` is ignored.
pub fn max_data_rate_bps(
    tx: &TransmitterChain,
    rx: &ReceiverChain,
    params: &LinkParams,
    target_margin_db: f64,
) -> Result<f64> {
    ensure_positive("frequency_hz", params.frequency_hz)?;
    ensure_positive("distance_m", params.distance_m)?;

    let fspl = free_space_path_loss_db(params.distance_m, params.frequency_hz);
    let c_over_n0 = params.carrier_to_noise_density(tx, rx, fspl);
    let log_rate = c_over_n0 - params.required_eb_n0_db - target_margin_db;
    if log_rate < 0.0 {
        return Ok(0.0);
    }
    Ok(10f64.powf(log_rate / 10.0))
}

/// Minimum transmitter output power closing the link with
/// `target_margin_db` [dBW]. Gain and losses are taken from `tx`; its
/// `power_dbw` is ignored.
pub fn required_power_dbw(
    tx: &TransmitterChain,
    rx: &ReceiverChain,
    params: &LinkParams,
    target_margin_db: f64,
) -> Result<f64> {
    ensure_positive("frequency_hz", params.frequency_hz)?;
    ensure_positive("distance_m", params.distance_m)?;
    ensure_positive("data_rate_bps", params.data_rate_bps)?;

    let fspl = free_space_path_loss_db(params.distance_m, params.frequency_hz);
    let required_c_over_n0 =
        params.required_eb_n0_db + target_margin_db + to_db(params.data_rate_bps);
    let required_eirp = required_c_over_n0 - rx.figure_of_merit_db_per_k()
        + fspl
        + params.atmospheric_loss_db
        + params.polarization_loss_db
        + params.misc_loss_db
        + BOLTZMANN_DBW;

    Ok(required_eirp - (tx.eirp_dbw() - tx.power_dbw))
}

impl fmt::Display for LinkBudgetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "LINK BUDGET ANALYSIS")?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(f, "TRANSMITTER")?;
        writeln!(f, "  TX Power:            {:+8.2} dBW", self.tx_power_dbw)?;
        writeln!(f, "  TX Antenna Gain:     {:+8.2} dBi", self.tx_antenna_gain_dbi)?;
        writeln!(f, "  TX Losses:           {:+8.2} dB", -self.tx_losses_db)?;
        writeln!(f, "  EIRP:                {:+8.2} dBW", self.eirp_dbw)?;
        writeln!(f)?;
        writeln!(f, "PATH")?;
        writeln!(f, "  Frequency:           {:8.3} GHz", self.frequency_hz / 1e9)?;
        writeln!(f, "  Distance:            {:8.1} km", self.distance_m / 1e3)?;
        writeln!(f, "  FSPL:                {:+8.2} dB", -self.free_space_path_loss_db)?;
        writeln!(f, "  Atmospheric Loss:    {:+8.2} dB", -self.atmospheric_loss_db)?;
        writeln!(f, "  Polarization Loss:   {:+8.2} dB", -self.polarization_loss_db)?;
        writeln!(f, "  Misc Loss:           {:+8.2} dB", -self.misc_loss_db)?;
        writeln!(f)?;
        writeln!(f, "RECEIVER")?;
        writeln!(f, "  RX Antenna Gain:     {:+8.2} dBi", self.rx_antenna_gain_dbi)?;
        writeln!(f, "  RX Losses:           {:+8.2} dB", -self.rx_losses_db)?;
        writeln!(f, "  System Noise Temp:   {:8.1} K", self.system_noise_temp_k)?;
        writeln!(f, "  G/T:                 {:+8.2} dB/K", self.figure_of_merit_db_per_k)?;
        writeln!(f)?;
        writeln!(f, "LINK PERFORMANCE")?;
        writeln!(f, "  C/N0:                {:+8.2} dB-Hz", self.c_over_n0_db_hz)?;
        writeln!(f, "  Data Rate:           {:8.0} bps", self.data_rate_bps)?;
        writeln!(f, "  Eb/N0 (received):    {:+8.2} dB", self.eb_n0_db)?;
        writeln!(f, "  Eb/N0 (required):    {:+8.2} dB", self.required_eb_n0_db)?;
        writeln!(f, "  MARGIN:              {:+8.2} dB", self.margin_db)?;
        writeln!(
            f,
            "  Link Closes:         {}",
            if self.link_closes() { "YES" } else { "NO" }
        )?;
        write!(f, "{}", rule)
    }
}
