//! Full-mission scenarios: 500 km sun-synchronous orbit over Svalbard.

use ground_stations::contact::sample_count;
use ground_stations::GroundStation;
use link_budget::{AirMassLoss, ModemConfig, ReceiverChain, TransmitterChain};
use orbital_mechanics::{CircularOrbit, Propagator};
use pass_simulation::{MissionConfig, PassSimulation, PassSimulationResults};

const COARSE_STEP_S: f64 = 10.0;
const ORBITS: f64 = 24.0;

fn svalbard() -> GroundStation {
    GroundStation::new("Svalbard", 78.23, 15.39, 450.0, 5.0)
}

fn uhf_simulation(data_rate_bps: f64) -> PassSimulation<CircularOrbit> {
    PassSimulation::new(
        CircularOrbit::circular(500.0, 97.4, 0.0, true),
        svalbard(),
        TransmitterChain::from_power_dbm(33.0, 5.15).with_losses(0.0, 1.0, 0.0),
        ReceiverChain::new(14.0, 500.0).with_losses(0.5, 0.0, 0.0),
        ModemConfig::new(9.6, 5.0, 1.0),
        437e6,
        data_rate_bps,
    )
}

fn last_coarse_sample_s(sim: &PassSimulation<CircularOrbit>) -> f64 {
    let duration_s = ORBITS * sim.orbit().period_s();
    (sample_count(duration_s, COARSE_STEP_S) - 1) as f64 * COARSE_STEP_S
}

fn run(sim: &PassSimulation<CircularOrbit>, fine_step_s: f64) -> PassSimulationResults {
    sim.run(ORBITS, fine_step_s, COARSE_STEP_S).unwrap()
}

#[test]
fn test_svalbard_scenario() {
    let sim = uhf_simulation(9600.0);
    let results = run(&sim, 2.0);
    let last_sample_s = last_coarse_sample_s(&sim);

    assert!(results.num_passes > 0, "no passes found");
    assert!(
        results.passes_per_day() >= 6.0,
        "only {:.1} passes per day",
        results.passes_per_day()
    );
    assert!(results.total_data_volume_bits > 0.0);

    for pass in &results.passes {
        let truncated = pass.start_time_s == 0.0 || pass.end_time_s == last_sample_s;
        if truncated {
            continue;
        }
        assert!(
            pass.duration_s > 60.0 && pass.duration_s < 1000.0,
            "pass {} lasted {} s",
            pass.pass_number,
            pass.duration_s
        );
    }
    let avg = results.avg_pass_duration_s();
    assert!(avg > 60.0 && avg < 1000.0, "average pass {} s", avg);
}

#[test]
fn test_pass_records_are_consistent() {
    let sim = uhf_simulation(9600.0);
    let results = run(&sim, 2.0);

    let mut previous_end = f64::NEG_INFINITY;
    for (i, pass) in results.passes.iter().enumerate() {
        assert_eq!(pass.pass_number, i + 1, "numbering must be sequential from 1");
        assert!(pass.start_time_s >= previous_end, "passes overlap");
        previous_end = pass.end_time_s;

        let n = pass.sample_count();
        assert_eq!(pass.elevations_deg.len(), n);
        assert_eq!(pass.azimuths_deg.len(), n);
        assert_eq!(pass.ranges_m.len(), n);
        assert_eq!(pass.margins_db.len(), n);
        assert_eq!(pass.cn0_db_hz.len(), n);
        assert_eq!(pass.doppler_shifts_hz.len(), n);
        assert_eq!(pass.data_rates_bps.len(), n);

        assert!(pass.max_elevation_deg >= 5.0);
        assert!(pass.elevations_deg[0] >= 5.0);
        // Samples between the last visible coarse sample and the window end
        // may sit slightly below the mask
        for el in &pass.elevations_deg {
            assert!(*el >= 2.0, "pass {} sampled {} deg", pass.pass_number, el);
        }
        for az in &pass.azimuths_deg {
            assert!((0.0..360.0).contains(az));
        }
        for range in &pass.ranges_m {
            assert!(*range >= 500e3 - 1e3 && *range < 3_000e3, "range {} m", range);
        }
    }
}

#[test]
fn test_margin_lowest_at_lowest_elevation() {
    let sim = uhf_simulation(9600.0).with_atmosphere(AirMassLoss { zenith_loss_db: 0.1 });
    let results = sim.run(ORBITS, 2.0, COARSE_STEP_S).unwrap();
    assert!(results.num_passes > 0);

    for pass in &results.passes {
        let argmin = index_of(&pass.elevations_deg, |a, b| a < b);
        let argmax = index_of(&pass.elevations_deg, |a, b| a > b);
        assert!(
            pass.margins_db[argmin] <= pass.margins_db[argmax],
            "pass {}: margin {} dB at min elevation, {} dB at max",
            pass.pass_number,
            pass.margins_db[argmin],
            pass.margins_db[argmax]
        );
    }
}

fn index_of(values: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if better(*v, values[best]) {
            best = i;
        }
    }
    best
}

#[test]
fn test_doppler_changes_sign_on_high_passes() {
    let sim = uhf_simulation(9600.0);
    let results = run(&sim, 2.0);
    let last_sample_s = last_coarse_sample_s(&sim);

    let mut high_passes = 0;
    for pass in &results.passes {
        if pass.max_elevation_deg <= 30.0 || pass.end_time_s == last_sample_s {
            continue;
        }
        high_passes += 1;
        // approaching first, receding last
        assert!(pass.doppler_shifts_hz[0] > 0.0, "pass {} starts red-shifted", pass.pass_number);
        assert!(
            *pass.doppler_shifts_hz.last().unwrap() < 0.0,
            "pass {} ends blue-shifted",
            pass.pass_number
        );
    }
    assert!(high_passes > 0, "no pass above 30 deg");
}

#[test]
fn test_fine_step_changes_volume_not_detection() {
    // 9.6 Mbps puts the zero-margin crossing near 20 deg elevation
    let sim = uhf_simulation(9.6e6);
    let coarse_fine = run(&sim, 2.0);
    let fine = run(&sim, 1.0);

    assert_eq!(coarse_fine.num_passes, fine.num_passes);
    assert_eq!(coarse_fine.total_contact_time_s, fine.total_contact_time_s);
    for (a, b) in coarse_fine.passes.iter().zip(&fine.passes) {
        assert_eq!(a.start_time_s, b.start_time_s);
        assert_eq!(a.end_time_s, b.end_time_s);
    }

    let crossing = fine
        .passes
        .iter()
        .any(|p| p.min_margin_db() < 0.0 && p.max_margin_db() >= 0.0);
    assert!(crossing, "expected a pass where the link opens and closes");

    // Each pass integrates one contiguous closed interval, so the Euler
    // error is below one step's worth of data per pass.
    let bound = fine.num_passes as f64 * 9.6e6 * (1.0 + 2.0);
    let diff = (coarse_fine.total_data_volume_bits - fine.total_data_volume_bits).abs();
    assert!(diff <= bound, "volume differs by {} bits (bound {})", diff, bound);
}

#[test]
fn test_euler_volume_converges_as_fine_step_shrinks() {
    let sim = uhf_simulation(9.6e6);
    let volume = |step: f64| run(&sim, step).total_data_volume_bits;
    let relative_change = |a: f64, b: f64| (a - b).abs() / b;

    let v8 = volume(8.0);
    let v4 = volume(4.0);
    let v2 = volume(2.0);
    let v1 = volume(1.0);
    let v05 = volume(0.5);
    let v025 = volume(0.25);

    assert_ne!(v2, v1, "halving the fine step left the volume unchanged");

    // Neighbouring halvings can be noisy; compare the ends of the range
    let coarse = relative_change(v8, v4);
    let fine = relative_change(v05, v025);
    assert!(
        coarse > fine,
        "relative change {:.3e} at 8 s vs {:.3e} at 0.5 s",
        coarse,
        fine
    );
}

#[test]
fn test_parallel_run_is_identical() {
    let sim = uhf_simulation(9600.0);
    let sequential = run(&sim, 2.0);
    let parallel = sim.run_parallel(ORBITS, 2.0, COARSE_STEP_S).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_bundled_missions_load() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/missions");

    let uhf = MissionConfig::from_json_file(format!("{}/cubesat_uhf_svalbard.json", dir)).unwrap();
    assert_eq!(uhf.build().unwrap().station().name, "Svalbard");
    assert!(uhf.reference_epoch().unwrap().is_some());

    let iss = MissionConfig::from_json_file(format!("{}/iss_sband_wallops.json", dir)).unwrap();
    let results = iss.run().unwrap();
    assert!(results.num_passes > 0, "ISS never seen from Wallops");

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json["passes"].as_array().map(Vec::len), Some(results.num_passes));
}
