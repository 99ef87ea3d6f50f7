//! Contact Window Detector
//!
//! Scans elevation on a uniform coarse grid and reports the intervals where
//! the satellite is at or above the station's minimum elevation. Window
//! boundaries are quantized to the grid: a window opens at the first sample
//! at/above threshold and closes at the first sample below it. A window
//! still open when the sweep ends is closed at the final sample.

use orbital_mechanics::constants::SECONDS_PER_DAY;
use orbital_mechanics::Propagator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{elevation_angle, sidereal_angle_rad};
use crate::GroundStation;

/// A single contact (pass) between satellite and ground station.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ContactWindow {
    pub start_time_s: f64,
    pub end_time_s: f64,
    pub max_elevation_deg: f64,
    pub max_elevation_time_s: f64,
}

impl ContactWindow {
    pub fn duration_s(&self) -> f64 {
        self.end_time_s - self.start_time_s
    }
}

/// Contact windows found over an analysis span.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactAnalysis {
    pub contacts: Vec<ContactWindow>,
    pub total_duration_s: f64,
    pub analysis_duration_s: f64,
}

impl ContactAnalysis {
    pub fn num_contacts(&self) -> usize {
        self.contacts.len()
    }

    pub fn contacts_per_day(&self) -> f64 {
        if self.analysis_duration_s <= 0.0 {
            return 0.0;
        }
        self.contacts.len() as f64 * SECONDS_PER_DAY / self.analysis_duration_s
    }

    pub fn avg_duration_s(&self) -> f64 {
        if self.contacts.is_empty() {
            return 0.0;
        }
        self.total_duration_s / self.contacts.len() as f64
    }

    /// Highest elevation over all windows; 0 when there are none.
    pub fn max_elevation_deg(&self) -> f64 {
        if self.contacts.is_empty() {
            return 0.0;
        }
        self.contacts
            .iter()
            .map(|c| c.max_elevation_deg)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

enum ContactState {
    OutOfContact,
    InContact {
        start_time_s: f64,
        max_elevation_deg: f64,
        max_elevation_time_s: f64,
    },
}

/// Number of grid samples in `[0, duration_s)` at `step_s` spacing.
pub fn sample_count(duration_s: f64, step_s: f64) -> usize {
    if !(step_s > 0.0) || !(duration_s > 0.0) {
        return 0;
    }
    (duration_s / step_s).ceil() as usize
}

/// Find all contact windows in `[start_time_s, start_time_s + duration_s)`.
///
/// Errors only come from the propagator; the scan itself has no failure
/// mode, and an empty window list is a valid result.
pub fn find_contacts<P: Propagator + ?Sized>(
    orbit: &P,
    station: &GroundStation,
    duration_s: f64,
    step_s: f64,
    start_time_s: f64,
) -> orbital_mechanics::Result<ContactAnalysis> {
    let samples = sample_count(duration_s, step_s);
    let mut contacts = Vec::new();
    let mut state = ContactState::OutOfContact;
    let mut last_time_s = start_time_s;

    for i in 0..samples {
        let t = start_time_s + i as f64 * step_s;
        last_time_s = t;

        let sat = orbit.propagate(t)?;
        let station_pos = station.eci_position(sidereal_angle_rad(t));
        let el = elevation_angle(&sat.position_eci, &station_pos);
        let visible = el >= station.min_elevation_deg;

        state = match state {
            ContactState::OutOfContact if visible => ContactState::InContact {
                start_time_s: t,
                max_elevation_deg: el,
                max_elevation_time_s: t,
            },
            ContactState::OutOfContact => ContactState::OutOfContact,
            ContactState::InContact {
                start_time_s,
                max_elevation_deg,
                max_elevation_time_s,
            } if visible => {
                if el > max_elevation_deg {
                    ContactState::InContact {
                        start_time_s,
                        max_elevation_deg: el,
                        max_elevation_time_s: t,
                    }
                } else {
                    ContactState::InContact {
                        start_time_s,
                        max_elevation_deg,
                        max_elevation_time_s,
                    }
                }
            }
            ContactState::InContact {
                start_time_s,
                max_elevation_deg,
                max_elevation_time_s,
            } => {
                contacts.push(ContactWindow {
                    start_time_s,
                    end_time_s: t,
                    max_elevation_deg,
                    max_elevation_time_s,
                });
                ContactState::OutOfContact
            }
        };
    }

    // Still visible when the sweep ran out: truncate at the last sample
    if let ContactState::InContact {
        start_time_s,
        max_elevation_deg,
        max_elevation_time_s,
    } = state
    {
        contacts.push(ContactWindow {
            start_time_s,
            end_time_s: last_time_s,
            max_elevation_deg,
            max_elevation_time_s,
        });
    }

    let total_duration_s = contacts.iter().map(ContactWindow::duration_s).sum();

    debug!(
        "Contact scan at {}: {} windows over {:.0} s ({} samples)",
        station.name,
        contacts.len(),
        duration_s,
        samples
    );

    Ok(ContactAnalysis {
        contacts,
        total_duration_s,
        analysis_duration_s: duration_s,
    })
}
