//! Per-pass records and mission totals

use orbital_mechanics::constants::SECONDS_PER_DAY;
use serde::{Deserialize, Serialize};

/// One fine-sampled pass. All series have the same length, one entry per
/// sample time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PassData {
    /// 1-based, chronological
    pub pass_number: usize,
    pub start_time_s: f64,
    pub end_time_s: f64,
    /// Window duration from the contact detector
    pub duration_s: f64,
    /// Coarse-grid maximum from the contact detector
    pub max_elevation_deg: f64,

    pub times_s: Vec<f64>,
    pub elevations_deg: Vec<f64>,
    pub azimuths_deg: Vec<f64>,
    pub ranges_m: Vec<f64>,
    pub margins_db: Vec<f64>,
    pub cn0_db_hz: Vec<f64>,
    pub doppler_shifts_hz: Vec<f64>,
    pub data_rates_bps: Vec<f64>,

    pub data_volume_bits: f64,
}

impl PassData {
    pub fn sample_count(&self) -> usize {
        self.times_s.len()
    }

    pub fn data_volume_bytes(&self) -> f64 {
        self.data_volume_bits / 8.0
    }

    pub fn data_volume_kbytes(&self) -> f64 {
        self.data_volume_bits / 8.0 / 1024.0
    }

    /// Smallest sampled margin [dB]. Infinite for a pass with no samples,
    /// which the engine never emits.
    pub fn min_margin_db(&self) -> f64 {
        self.margins_db.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_margin_db(&self) -> f64 {
        self.margins_db.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Seconds during which the link closed, at the fine step used.
    pub fn closed_time_s(&self, fine_step_s: f64) -> f64 {
        self.margins_db.iter().filter(|m| **m >= 0.0).count() as f64 * fine_step_s
    }
}

/// Aggregate output of one simulation run. Read-only once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PassSimulationResults {
    pub passes: Vec<PassData>,
    pub total_data_volume_bits: f64,
    /// Sum of detector window durations, not of fine series lengths
    pub total_contact_time_s: f64,
    pub simulation_duration_s: f64,
    pub num_passes: usize,
    pub frequency_hz: f64,
    pub data_rate_bps: f64,
}

impl PassSimulationResults {
    pub fn new(
        passes: Vec<PassData>,
        total_contact_time_s: f64,
        simulation_duration_s: f64,
        frequency_hz: f64,
        data_rate_bps: f64,
    ) -> Self {
        let total_data_volume_bits: f64 = passes.iter().map(|p| p.data_volume_bits).sum();
        Self {
            num_passes: passes.len(),
            passes,
            total_data_volume_bits,
            total_contact_time_s,
            simulation_duration_s,
            frequency_hz,
            data_rate_bps,
        }
    }

    pub fn total_data_volume_bytes(&self) -> f64 {
        self.total_data_volume_bits / 8.0
    }

    pub fn total_data_volume_mbytes(&self) -> f64 {
        self.total_data_volume_bits / 8.0 / 1e6
    }

    pub fn passes_per_day(&self) -> f64 {
        if self.simulation_duration_s <= 0.0 {
            return 0.0;
        }
        self.num_passes as f64 * SECONDS_PER_DAY / self.simulation_duration_s
    }

    pub fn avg_pass_duration_s(&self) -> f64 {
        if self.num_passes == 0 {
            return 0.0;
        }
        self.total_contact_time_s / self.num_passes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(number: usize, margins: Vec<f64>, volume_bits: f64) -> PassData {
        let n = margins.len();
        PassData {
            pass_number: number,
            start_time_s: 0.0,
            end_time_s: n as f64,
            duration_s: n as f64,
            max_elevation_deg: 30.0,
            times_s: (0..n).map(|i| i as f64).collect(),
            margins_db: margins,
            data_volume_bits: volume_bits,
            ..PassData::default()
        }
    }

    #[test]
    fn test_pass_volume_units() {
        let p = pass(1, vec![1.0], 8.0 * 1024.0 * 10.0);
        assert_eq!(p.data_volume_bytes(), 10240.0);
        assert_eq!(p.data_volume_kbytes(), 10.0);
    }

    #[test]
    fn test_margin_extremes() {
        let p = pass(1, vec![-1.5, 4.0, 2.0], 0.0);
        assert_eq!(p.min_margin_db(), -1.5);
        assert_eq!(p.max_margin_db(), 4.0);
        assert_eq!(p.closed_time_s(2.0), 4.0);
    }

    #[test]
    fn test_totals() {
        let results = PassSimulationResults::new(
            vec![pass(1, vec![1.0], 8e6), pass(2, vec![1.0], 16e6)],
            1200.0,
            43_200.0,
            437e6,
            9600.0,
        );
        assert_eq!(results.num_passes, 2);
        assert_eq!(results.total_data_volume_bits, 24e6);
        assert_eq!(results.total_data_volume_bytes(), 3e6);
        assert_eq!(results.total_data_volume_mbytes(), 3.0);
        assert_eq!(results.passes_per_day(), 4.0);
        assert_eq!(results.avg_pass_duration_s(), 600.0);
    }

    #[test]
    fn test_empty_results() {
        let results = PassSimulationResults::new(Vec::new(), 0.0, 0.0, 437e6, 9600.0);
        assert_eq!(results.passes_per_day(), 0.0);
        assert_eq!(results.avg_pass_duration_s(), 0.0);
        assert_eq!(results.total_data_volume_bits, 0.0);
    }
}
