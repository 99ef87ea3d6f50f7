//! Fixed-width text report

use chrono::{DateTime, Duration, Utc};

use crate::results::PassSimulationResults;

const WIDTH: usize = 78;

fn pass_start_utc(epoch: DateTime<Utc>, start_time_s: f64) -> String {
    let offset = Duration::milliseconds((start_time_s * 1e3).round() as i64);
    (epoch + offset).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render mission totals and the per-pass table. With an `epoch`, pass
/// start times are printed as UTC timestamps instead of seconds.
pub fn generate_report(results: &PassSimulationResults, epoch: Option<DateTime<Utc>>) -> String {
    let rule = "=".repeat(WIDTH);
    let thin = "-".repeat(40);
    let mut out = String::new();

    out.push_str(&format!("{}\nSATELLITE LINK BUDGET - PASS SIMULATION REPORT\n{}\n\n", rule, rule));
    out.push_str(&format!("Frequency:           {:.1} MHz\n", results.frequency_hz / 1e6));
    out.push_str(&format!("Data Rate:           {:.0} bps\n", results.data_rate_bps));
    out.push_str(&format!(
        "Simulation Duration: {:.1} hours\n",
        results.simulation_duration_s / 3600.0
    ));
    if let Some(epoch) = epoch {
        out.push_str(&format!("Epoch:               {}\n", epoch.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    out.push_str(&format!("\nCONTACT SUMMARY\n{}\n", thin));
    out.push_str(&format!("Total Passes:        {}\n", results.num_passes));
    out.push_str(&format!("Passes per Day:      {:.1}\n", results.passes_per_day()));
    out.push_str(&format!(
        "Total Contact Time:  {:.1} min\n",
        results.total_contact_time_s / 60.0
    ));
    out.push_str(&format!(
        "Avg Pass Duration:   {:.1} min\n",
        results.avg_pass_duration_s() / 60.0
    ));

    out.push_str(&format!("\nDATA VOLUME\n{}\n", thin));
    out.push_str(&format!(
        "Total Data Volume:   {:.3} MB\n",
        results.total_data_volume_mbytes()
    ));
    out.push_str(&format!(
        "Total Data Volume:   {:.0} bits\n",
        results.total_data_volume_bits
    ));

    out.push_str(&format!("\nPER-PASS DETAILS\n{}\n", "-".repeat(WIDTH)));
    out.push_str(&format!(
        "{:>4} {:>19} {:>10} {:>8} {:>12} {:>10}\n",
        "Pass", "Start", "Duration", "Max El", "Min Margin", "Data"
    ));
    out.push_str(&format!(
        "{:>4} {:>19} {:>10} {:>8} {:>12} {:>10}\n",
        "#",
        if epoch.is_some() { "[UTC]" } else { "[s]" },
        "[min]",
        "[deg]",
        "[dB]",
        "[KB]"
    ));
    out.push_str(&format!("{}\n", "-".repeat(WIDTH)));

    for pass in &results.passes {
        let start = match epoch {
            Some(epoch) => pass_start_utc(epoch, pass.start_time_s),
            None => format!("{:.0}", pass.start_time_s),
        };
        out.push_str(&format!(
            "{:>4} {:>19} {:>10.1} {:>8.1} {:>12.1} {:>10.1}\n",
            pass.pass_number,
            start,
            pass.duration_s / 60.0,
            pass.max_elevation_deg,
            pass.min_margin_db(),
            pass.data_volume_kbytes()
        ));
    }

    out.push('\n');
    out.push_str(&rule);
    out
}
