//! Pass Simulation Engine
//!
//! Two-phase sampling: a coarse contact scan over the whole horizon, then
//! fine re-sampling of geometry, link budget and Doppler inside each
//! detected window only. Windows are independent of each other, so the
//! fine phase can run on the rayon pool without changing the output.

use ground_stations::contact::sample_count;
use ground_stations::{
    elevation_angle, find_contacts, sidereal_angle_rad, ContactAnalysis, ContactWindow,
    GroundStation,
};
use link_budget::{
    AtmosphereModel, ClearSky, LinkEvaluator, ModemConfig, ModemPerformance, ReceiverChain,
    TransmitterChain,
};
use orbital_mechanics::doppler::{doppler_shift_hz, radial_velocity};
use orbital_mechanics::Propagator;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::results::{PassData, PassSimulationResults};
use crate::{Result, SimulationError};

/// Time-stepped link budget over the passes of one satellite over one
/// ground station.
pub struct PassSimulation<P, M = ModemConfig, A = ClearSky> {
    orbit: P,
    station: GroundStation,
    transmitter: TransmitterChain,
    receiver: ReceiverChain,
    modem: M,
    frequency_hz: f64,
    data_rate_bps: f64,
    polarization_loss_db: f64,
    misc_loss_db: f64,
    atmosphere: A,
}

/// Output of the coarse phase, shared read-only by every window.
struct Sweep<'a, A> {
    duration_s: f64,
    analysis: ContactAnalysis,
    link: LinkEvaluator<&'a A>,
}

impl<P: Propagator, M: ModemPerformance> PassSimulation<P, M, ClearSky> {
    pub fn new(
        orbit: P,
        station: GroundStation,
        transmitter: TransmitterChain,
        receiver: ReceiverChain,
        modem: M,
        frequency_hz: f64,
        data_rate_bps: f64,
    ) -> Self {
        Self {
            orbit,
            station,
            transmitter,
            receiver,
            modem,
            frequency_hz,
            data_rate_bps,
            polarization_loss_db: 0.0,
            misc_loss_db: 0.0,
            atmosphere: ClearSky,
        }
    }
}

impl<P: Propagator, M: ModemPerformance, A: AtmosphereModel> PassSimulation<P, M, A> {
    pub fn with_atmosphere<B: AtmosphereModel>(self, atmosphere: B) -> PassSimulation<P, M, B> {
        PassSimulation {
            orbit: self.orbit,
            station: self.station,
            transmitter: self.transmitter,
            receiver: self.receiver,
            modem: self.modem,
            frequency_hz: self.frequency_hz,
            data_rate_bps: self.data_rate_bps,
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

    pub fn orbit(&self) -> &P {
        &self.orbit
    }

    pub fn station(&self) -> &GroundStation {
        &self.station
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn data_rate_bps(&self) -> f64 {
        self.data_rate_bps
    }

    /// Simulate `duration_orbits` orbital periods from t = 0.
    ///
    /// `coarse_step_s` drives contact detection only; `fine_step_s` is the
    /// sampling and integration step inside each window.
    pub fn run(
        &self,
        duration_orbits: f64,
        fine_step_s: f64,
        coarse_step_s: f64,
    ) -> Result<PassSimulationResults> {
        let sweep = self.detect(duration_orbits, fine_step_s, coarse_step_s)?;
        let sampled = sweep
            .analysis
            .contacts
            .iter()
            .map(|window| self.sample_window(&sweep.link, window, fine_step_s))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.assemble(sweep, sampled))
    }

    fn detect(&self, duration_orbits: f64, fine_step_s: f64, coarse_step_s: f64) -> Result<Sweep<'_, A>> {
        for (name, value) in [
            ("duration_orbits", duration_orbits),
            ("fine_step_s", fine_step_s),
            ("coarse_step_s", coarse_step_s),
        ] {
            if !(value > 0.0) {
                return Err(SimulationError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let duration_s = duration_orbits * self.orbit.period_s();
        let required_eb_n0_db = self.modem.required_eb_n0_db();

        info!(
            "Simulating {:.1} h ({} orbits) over {}: coarse step {} s, fine step {} s, required Eb/N0 {:.2} dB",
            duration_s / 3600.0,
            duration_orbits,
            self.station.name,
            coarse_step_s,
            fine_step_s,
            required_eb_n0_db
        );

        let analysis = find_contacts(&self.orbit, &self.station, duration_s, coarse_step_s, 0.0)?;

        let link = LinkEvaluator {
            transmitter: self.transmitter,
            receiver: self.receiver,
            frequency_hz: self.frequency_hz,
            data_rate_bps: self.data_rate_bps,
            required_eb_n0_db,
            polarization_loss_db: self.polarization_loss_db,
            misc_loss_db: self.misc_loss_db,
            atmosphere: &self.atmosphere,
        };

        Ok(Sweep {
            duration_s,
            analysis,
            link,
        })
    }

    /// Fine-sample one window over `[start, end)`. `None` when the window
    /// holds no sample; the pass number is assigned later.
    fn sample_window(
        &self,
        link: &LinkEvaluator<&A>,
        window: &ContactWindow,
        fine_step_s: f64,
    ) -> Result<Option<PassData>> {
        let samples = sample_count(window.duration_s(), fine_step_s);
        if samples == 0 {
            return Ok(None);
        }

        debug!(
            "Window {:.0}-{:.0} s: max elevation {:.1} deg, {} samples",
            window.start_time_s,
            window.end_time_s,
            window.max_elevation_deg,
            samples
        );

        let mut pass = PassData {
            pass_number: 0,
            start_time_s: window.start_time_s,
            end_time_s: window.end_time_s,
            duration_s: window.duration_s(),
            max_elevation_deg: window.max_elevation_deg,
            times_s: Vec::with_capacity(samples),
            elevations_deg: Vec::with_capacity(samples),
            azimuths_deg: Vec::with_capacity(samples),
            ranges_m: Vec::with_capacity(samples),
            margins_db: Vec::with_capacity(samples),
            cn0_db_hz: Vec::with_capacity(samples),
            doppler_shifts_hz: Vec::with_capacity(samples),
            data_rates_bps: Vec::with_capacity(samples),
            data_volume_bits: 0.0,
        };

        for i in 0..samples {
            let t = window.start_time_s + i as f64 * fine_step_s;
            let state = self.orbit.propagate(t)?;
            let theta = sidereal_angle_rad(t);
            let station_pos = self.station.eci_position(theta);
            let station_vel = self.station.eci_velocity(theta);

            let elevation = elevation_angle(&state.position_eci, &station_pos);
            let sample = link.evaluate(&state.position_eci, &station_pos, elevation)?;
            let v_r = radial_velocity(
                &state.position_eci,
                &state.velocity_eci,
                &station_pos,
                Some(&station_vel),
            );

            pass.times_s.push(t);
            pass.elevations_deg.push(elevation);
            pass.azimuths_deg.push(self.station.azimuth_to(&state.position_eci, theta));
            pass.ranges_m.push(sample.slant_range_m);
            pass.margins_db.push(sample.margin_db);
            pass.cn0_db_hz.push(sample.c_over_n0_db_hz);
            pass.doppler_shifts_hz.push(doppler_shift_hz(self.frequency_hz, v_r));
            pass.data_rates_bps.push(sample.achieved_rate_bps);
        }

        // Left-rectangle rule
        pass.data_volume_bits = pass.data_rates_bps.iter().sum::<f64>() * fine_step_s;

        Ok(Some(pass))
    }

    fn assemble(&self, sweep: Sweep<'_, A>, sampled: Vec<Option<PassData>>) -> PassSimulationResults {
        let passes: Vec<PassData> = sampled
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, mut pass)| {
                pass.pass_number = i + 1;
                pass
            })
            .collect();

        let results = PassSimulationResults::new(
            passes,
            sweep.analysis.total_duration_s,
            sweep.duration_s,
            self.frequency_hz,
            self.data_rate_bps,
        );

        info!(
            "Simulation complete: {} passes ({:.1}/day), {:.1} min contact, {:.3} MB",
            results.num_passes,
            results.passes_per_day(),
            results.total_contact_time_s / 60.0,
            results.total_data_volume_mbytes()
        );

        results
    }
}

impl<P, M, A> PassSimulation<P, M, A>
where
    P: Propagator + Sync,
    M: ModemPerformance + Sync,
    A: AtmosphereModel + Sync,
{
    /// Same output as [`PassSimulation::run`], with windows fine-sampled
    /// on the rayon pool.
    pub fn run_parallel(
        &self,
        duration_orbits: f64,
        fine_step_s: f64,
        coarse_step_s: f64,
    ) -> Result<PassSimulationResults> {
        let sweep = self.detect(duration_orbits, fine_step_s, coarse_step_s)?;
        let sampled = sweep
            .analysis
            .contacts
            .par_iter()
            .map(|window| self.sample_window(&sweep.link, window, fine_step_s))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.assemble(sweep, sampled))
    }
}
