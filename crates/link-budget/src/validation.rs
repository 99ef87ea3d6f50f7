//! Design checks
//!
//! Sanity checks on a link design before any simulation is run. A failed
//! check is a verdict with a readable message, not an error; only a budget
//! that cannot be computed at all returns `Err`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::budget::{compute_link_budget, LinkParams};
use crate::chain::{ReceiverChain, TransmitterChain};
use crate::path_loss::slant_range_m;
use crate::Result;

/// Below this an antenna gain is considered a configuration mistake [dBi].
pub const MIN_REASONABLE_GAIN_DBI: f64 = -10.0;

/// Upper bound used when the caller has no better figure [dBi].
pub const MAX_REASONABLE_GAIN_DBI: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    fn pass(message: String) -> Self {
        Self { valid: true, message }
    }

    fn fail(message: String) -> Self {
        Self { valid: false, message }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.valid { "PASS" } else { "FAIL" };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// Carrier inside the allocated band, edges included.
pub fn validate_frequency_band(frequency_hz: f64, band_min_hz: f64, band_max_hz: f64) -> ValidationResult {
    if (band_min_hz..=band_max_hz).contains(&frequency_hz) {
        return ValidationResult::pass("Frequency within allocated band".to_string());
    }
    ValidationResult::fail(format!(
        "Frequency {:.1} MHz outside band [{:.1}, {:.1}] MHz",
        frequency_hz / 1e6,
        band_min_hz / 1e6,
        band_max_hz / 1e6
    ))
}

pub fn validate_eirp_limit(eirp_dbw: f64, max_eirp_dbw: f64) -> ValidationResult {
    if eirp_dbw <= max_eirp_dbw {
        return ValidationResult::pass(format!("EIRP {:.1} dBW within limit", eirp_dbw));
    }
    ValidationResult::fail(format!(
        "EIRP {:.1} dBW exceeds limit of {:.1} dBW",
        eirp_dbw, max_eirp_dbw
    ))
}

/// Worst-case check: the budget at the geometric slant range for
/// `min_elevation_deg`. `params.distance_m` is replaced by that range.
pub fn validate_link_closes(
    tx: &TransmitterChain,
    rx: &ReceiverChain,
    params: &LinkParams,
    altitude_m: f64,
    min_elevation_deg: f64,
) -> Result<ValidationResult> {
    let params = LinkParams {
        distance_m: slant_range_m(altitude_m, min_elevation_deg),
        ..*params
    };
    let budget = compute_link_budget(tx, rx, &params)?;

    if budget.link_closes() {
        return Ok(ValidationResult::pass(format!(
            "Link closes with {:.1} dB margin at {}° elevation",
            budget.margin_db, min_elevation_deg
        )));
    }
    Ok(ValidationResult::fail(format!(
        "Link does NOT close at {}° elevation: margin = {:.1} dB",
        min_elevation_deg, budget.margin_db
    )))
}

/// Gain between [`MIN_REASONABLE_GAIN_DBI`] and `max_reasonable_gain_dbi`.
pub fn validate_antenna_gain(gain_dbi: f64, max_reasonable_gain_dbi: f64) -> ValidationResult {
    if gain_dbi < MIN_REASONABLE_GAIN_DBI {
        return ValidationResult::fail(format!("Antenna gain {:.1} dBi is unreasonably low", gain_dbi));
    }
    if gain_dbi > max_reasonable_gain_dbi {
        return ValidationResult::fail(format!(
            "Antenna gain {:.1} dBi exceeds reasonable maximum",
            gain_dbi
        ));
    }
    ValidationResult::pass(format!("Antenna gain {:.1} dBi is reasonable", gain_dbi))
}

/// Rate achievable in `bandwidth_hz` at `spectral_efficiency` bit/s/Hz.
pub fn validate_data_rate(data_rate_bps: f64, bandwidth_hz: f64, spectral_efficiency: f64) -> ValidationResult {
    let max_rate = bandwidth_hz * spectral_efficiency;
    if data_rate_bps <= max_rate {
        return ValidationResult::pass(format!(
            "Data rate {:.0} bps achievable with {:.0} Hz bandwidth",
            data_rate_bps, bandwidth_hz
        ));
    }
    ValidationResult::fail(format!(
        "Data rate {:.0} bps exceeds achievable {:.0} bps with {:.0} Hz and spectral efficiency {:.2}",
        data_rate_bps, max_rate, bandwidth_hz, spectral_efficiency
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinkError;

    fn uhf_tx() -> TransmitterChain {
        TransmitterChain::from_power_dbm(33.0, 5.15).with_losses(0.0, 1.0, 0.0)
    }

    fn uhf_rx() -> ReceiverChain {
        ReceiverChain::new(14.0, 500.0).with_losses(0.5, 0.0, 0.0)
    }

    #[test]
    fn test_frequency_band_edges() {
        // UHF amateur satellite allocation
        assert!(validate_frequency_band(437e6, 435e6, 438e6).valid);
        assert!(validate_frequency_band(435e6, 435e6, 438e6).valid);
        assert!(validate_frequency_band(438e6, 435e6, 438e6).valid);

        let out = validate_frequency_band(2.25e9, 435e6, 438e6);
        assert!(!out.valid);
        assert!(out.message.contains("2250.0 MHz"), "{}", out.message);
    }

    #[test]
    fn test_eirp_limit() {
        let eirp = uhf_tx().eirp_dbw();
        assert!(validate_eirp_limit(eirp, 10.0).valid);
        assert!(validate_eirp_limit(10.0, 10.0).valid);

        let over = validate_eirp_limit(12.34, 10.0);
        assert!(!over.valid);
        assert!(over.message.contains("12.3 dBW exceeds limit of 10.0 dBW"), "{}", over.message);
    }

    #[test]
    fn test_link_closes_at_mask() {
        let params = LinkParams::new(437e6, 1.0, 9600.0, 5.6);
        let check = validate_link_closes(&uhf_tx(), &uhf_rx(), &params, 500e3, 5.0).unwrap();
        assert!(check.valid, "{}", check.message);
        assert!(check.message.contains("at 5° elevation"));
    }

    #[test]
    fn test_link_fails_at_high_rate() {
        // C/N0 near 71 dB-Hz cannot carry 1 Gbps
        let params = LinkParams::new(437e6, 1.0, 1e9, 5.6);
        let check = validate_link_closes(&uhf_tx(), &uhf_rx(), &params, 500e3, 5.0).unwrap();
        assert!(!check.valid);
        assert!(check.message.starts_with("Link does NOT close"));
        assert_eq!(check.to_string(), format!("[FAIL] {}", check.message));
    }

    #[test]
    fn test_worst_case_uses_slant_range() {
        let tx = uhf_tx();
        let rx = uhf_rx();
        let params = LinkParams::new(437e6, 1.0, 9600.0, 5.6);
        let direct = compute_link_budget(
            &tx,
            &rx,
            &LinkParams {
                distance_m: slant_range_m(500e3, 10.0),
                ..params
            },
        )
        .unwrap();
        let check = validate_link_closes(&tx, &rx, &params, 500e3, 10.0).unwrap();
        assert!(check.message.contains(&format!("{:.1} dB", direct.margin_db)));
    }

    #[test]
    fn test_link_check_propagates_bad_inputs() {
        let params = LinkParams::new(0.0, 1.0, 9600.0, 5.6);
        let err = validate_link_closes(&uhf_tx(), &uhf_rx(), &params, 500e3, 5.0).unwrap_err();
        assert_eq!(err, LinkError::NonPositive { quantity: "frequency_hz", value: 0.0 });
    }

    #[test]
    fn test_antenna_gain_bounds() {
        assert!(validate_antenna_gain(-3.0, MAX_REASONABLE_GAIN_DBI).valid);
        assert!(validate_antenna_gain(MIN_REASONABLE_GAIN_DBI, MAX_REASONABLE_GAIN_DBI).valid);
        assert!(!validate_antenna_gain(-12.0, MAX_REASONABLE_GAIN_DBI).valid);
        assert!(!validate_antenna_gain(85.0, MAX_REASONABLE_GAIN_DBI).valid);
        assert!(!validate_antenna_gain(40.0, 35.0).valid);
    }

    #[test]
    fn test_data_rate_vs_bandwidth() {
        // 25 kHz channel, GMSK at ~1 bit/s/Hz
        assert!(validate_data_rate(9600.0, 25e3, 1.0).valid);
        assert!(validate_data_rate(25e3, 25e3, 1.0).valid);

        let over = validate_data_rate(1e6, 25e3, 1.0);
        assert!(!over.valid);
        assert!(over.message.contains("25000 bps"), "{}", over.message);
    }
}
