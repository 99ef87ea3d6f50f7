//! Per-sample link evaluation for a moving geometry

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::atmosphere::{AtmosphereModel, ClearSky};
use crate::budget::{compute_link_budget, LinkParams};
use crate::chain::{ReceiverChain, TransmitterChain};
use crate::Result;

/// Elevations below this are raised to it before the atmosphere model is
/// queried. Slant-path models diverge near the horizon.
pub const ATMOSPHERE_ELEVATION_FLOOR_DEG: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkSample {
    pub slant_range_m: f64,
    pub atmospheric_loss_db: f64,
    pub c_over_n0_db_hz: f64,
    pub eb_n0_db: f64,
    pub margin_db: f64,
    /// Full data rate when the link closes, zero otherwise
    pub achieved_rate_bps: f64,
}

impl LinkSample {
    pub fn link_closes(&self) -> bool {
        self.margin_db >= 0.0
    }
}

/// Fixed link configuration evaluated against instantaneous positions.
#[derive(Debug, Clone)]
pub struct LinkEvaluator<A = ClearSky> {
    pub transmitter: TransmitterChain,
    pub receiver: ReceiverChain,
    pub frequency_hz: f64,
    pub data_rate_bps: f64,
    pub required_eb_n0_db: f64,
    pub polarization_loss_db: f64,
    pub misc_loss_db: f64,
    pub atmosphere: A,
}

impl LinkEvaluator<ClearSky> {
    pub fn new(
        transmitter: TransmitterChain,
        receiver: ReceiverChain,
        frequency_hz: f64,
        data_rate_bps: f64,
        required_eb_n0_db: f64,
    ) -> Self {
        Self {
            transmitter,
            receiver,
            frequency_hz,
            data_rate_bps,
            required_eb_n0_db,
            polarization_loss_db: 0.0,
            misc_loss_db: 0.0,
            atmosphere: ClearSky,
        }
    }
}

impl<A: AtmosphereModel> LinkEvaluator<A> {
    pub fn with_atmosphere<B: AtmosphereModel>(self, atmosphere: B) -> LinkEvaluator<B> {
        LinkEvaluator {
            transmitter: self.transmitter,
            receiver: self.receiver,
            frequency_hz: self.frequency_hz,
            data_rate_bps: self.data_rate_bps,
            required_eb_n0_db: self.required_eb_n0_db,
            polarization_loss_db: self.polarization_loss_db,
            misc_loss_db: self.misc_loss_db,
            atmosphere,
        }
    }

    pub fn with_extra_losses(mut self, polarization_loss_db: f64, misc_loss_db: f64) -> Self {
        self.polarization_loss_db = polarization_loss_db;
        self.misc_loss_db = misc_loss_db;
        self
    }

    /// Evaluate the link between two inertial positions [m].
    ///
    /// Fails when the positions coincide or the configured frequency or
    /// rate is not positive.
    pub fn evaluate(
        &self,
        satellite_position: &Vector3<f64>,
        station_position: &Vector3<f64>,
        elevation_deg: f64,
    ) -> Result<LinkSample> {
        let slant_range_m = (satellite_position - station_position).norm();
        let atmospheric_loss_db = self.atmosphere.total_loss_db(
            self.frequency_hz / 1e9,
            elevation_deg.max(ATMOSPHERE_ELEVATION_FLOOR_DEG),
        );

        let budget = compute_link_budget(
            &self.transmitter,
            &self.receiver,
            &LinkParams {
                frequency_hz: self.frequency_hz,
                distance_m: slant_range_m,
                data_rate_bps: self.data_rate_bps,
                required_eb_n0_db: self.required_eb_n0_db,
                atmospheric_loss_db,
                polarization_loss_db: self.polarization_loss_db,
                misc_loss_db: self.misc_loss_db,
            },
        )?;

        let achieved_rate_bps = if budget.link_closes() {
            self.data_rate_bps
        } else {
            0.0
        };

        Ok(LinkSample {
            slant_range_m,
            atmospheric_loss_db,
            c_over_n0_db_hz: budget.c_over_n0_db_hz,
            eb_n0_db: budget.eb_n0_db,
            margin_db: budget.margin_db,
            achieved_rate_bps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::FixedLoss;

    /// Records the elevation the evaluator hands to the model.
    struct ElevationEcho;

    impl AtmosphereModel for ElevationEcho {
        fn total_loss_db(&self, _frequency_ghz: f64, elevation_deg: f64) -> f64 {
            elevation_deg
        }
    }

    fn uhf() -> LinkEvaluator {
        LinkEvaluator::new(
            TransmitterChain::from_power_dbm(33.0, 5.15).with_losses(0.0, 1.0, 0.0),
            ReceiverChain::new(14.0, 500.0).with_losses(0.5, 0.0, 0.0),
            437e6,
            9600.0,
            5.6,
        )
    }

    #[test]
    fn test_range_from_positions() {
        let sat = Vector3::new(7_000e3, 0.0, 0.0);
        let gs = Vector3::new(6_378e3, 0.0, 0.0);
        let sample = uhf().evaluate(&sat, &gs, 90.0).unwrap();
        assert!((sample.slant_range_m - 622e3).abs() < 1e-6);
        assert!(sample.link_closes());
        assert_eq!(sample.achieved_rate_bps, 9600.0);
    }

    #[test]
    fn test_binary_throughput() {
        let sat = Vector3::new(7_000e3, 0.0, 0.0);
        let gs = Vector3::new(6_378e3, 0.0, 0.0);
        // 100 dB of extra loss cannot close
        let lossy = uhf().with_atmosphere(FixedLoss { loss_db: 100.0 });
        let sample = lossy.evaluate(&sat, &gs, 90.0).unwrap();
        assert!(sample.margin_db < 0.0);
        assert_eq!(sample.achieved_rate_bps, 0.0);
    }

    #[test]
    fn test_atmosphere_elevation_floor() {
        let evaluator = uhf().with_atmosphere(ElevationEcho);
        let sat = Vector3::new(7_000e3, 1_000e3, 0.0);
        let gs = Vector3::new(6_378e3, 0.0, 0.0);

        let low = evaluator.evaluate(&sat, &gs, -3.0).unwrap();
        assert_eq!(low.atmospheric_loss_db, ATMOSPHERE_ELEVATION_FLOOR_DEG);

        let high = evaluator.evaluate(&sat, &gs, 42.0).unwrap();
        assert_eq!(high.atmospheric_loss_db, 42.0);
    }

    #[test]
    fn test_extra_losses_lower_margin() {
        let sat = Vector3::new(7_000e3, 0.0, 0.0);
        let gs = Vector3::new(6_378e3, 0.0, 0.0);
        let base = uhf().evaluate(&sat, &gs, 90.0).unwrap();
        let lossy = uhf().with_extra_losses(3.0, 2.0).evaluate(&sat, &gs, 90.0).unwrap();
        assert!((base.margin_db - lossy.margin_db - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_positions_fail() {
        let p = Vector3::new(6_378e3, 0.0, 0.0);
        assert!(uhf().evaluate(&p, &p, 90.0).is_err());
    }
}
