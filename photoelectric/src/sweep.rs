//! Wavelength-indexed chart series
//!
//! Each chart has one slot per 10 nm step between 100 and 600 nm. Moving
//! the wavelength onto a step overwrites that slot, so sweeping the slider
//! back and forth refines a single curve instead of piling up points.
//! "Save" moves the live curve to an overlay for comparison.

use crate::model::PhotoelectricModel;
use crate::params::WAVELENGTH_RANGE_NM;

pub const SLOT_STEP_NM: u32 = 10;
/// 100, 110, ..., 600 nm
pub const SLOT_COUNT: usize = 51;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    Wavelength,
    Frequency,
}

impl SweepAxis {
    /// Horizontal coordinate of a wavelength on this axis
    pub fn coordinate(&self, wavelength_nm: u32) -> f64 {
        match self {
            SweepAxis::Wavelength => wavelength_nm as f64,
            SweepAxis::Frequency => PhotoelectricModel::frequency_thz(wavelength_nm),
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            SweepAxis::Wavelength => (100.0, 600.0),
            SweepAxis::Frequency => (0.0, 2000.0),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SweepAxis::Wavelength => "Wavelength (nm)",
            SweepAxis::Frequency => "Frequency (THz)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepQuantity {
    KineticEnergy,
    Current,
}

impl SweepQuantity {
    pub fn range(&self) -> (f64, f64) {
        match self {
            SweepQuantity::KineticEnergy => (-0.1, 11.0),
            SweepQuantity::Current => (-0.1, 2.0),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SweepQuantity::KineticEnergy => "Kinetic energy (eV)",
            SweepQuantity::Current => "Current (A)",
        }
    }
}

/// Slot index for a wavelength, if it sits exactly on a step
pub fn slot_index(wavelength_nm: u32) -> Option<usize> {
    if !WAVELENGTH_RANGE_NM.contains(&wavelength_nm) || wavelength_nm % SLOT_STEP_NM != 0 {
        return None;
    }
    Some(((wavelength_nm - *WAVELENGTH_RANGE_NM.start()) / SLOT_STEP_NM) as usize)
}

fn slot_wavelength(index: usize) -> u32 {
    *WAVELENGTH_RANGE_NM.start() + index as u32 * SLOT_STEP_NM
}

#[derive(Debug, Clone)]
pub struct SweepChart {
    pub axis: SweepAxis,
    pub quantity: SweepQuantity,
    live: [Option<f64>; SLOT_COUNT],
    saved: [Option<f64>; SLOT_COUNT],
}

impl SweepChart {
    pub fn new(axis: SweepAxis, quantity: SweepQuantity) -> Self {
        Self {
            axis,
            quantity,
            live: [None; SLOT_COUNT],
            saved: [None; SLOT_COUNT],
        }
    }

    /// Overwrite the slot for this wavelength. Off-step wavelengths are ignored.
    pub fn record(&mut self, wavelength_nm: u32, value: f64) -> bool {
        match slot_index(wavelength_nm) {
            Some(index) => {
                self.live[index] = Some(value);
                true
            }
            None => false,
        }
    }

    /// Move the live curve into the saved overlay
    pub fn save(&mut self) {
        self.saved = self.live;
        self.clear();
    }

    /// Empty the live curve; the saved overlay is kept
    pub fn clear(&mut self) {
        self.live = [None; SLOT_COUNT];
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        Self::visible(&self.live, self.axis)
    }

    pub fn saved_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        Self::visible(&self.saved, self.axis)
    }

    fn visible(
        slots: &[Option<f64>; SLOT_COUNT],
        axis: SweepAxis,
    ) -> impl Iterator<Item = (f64, f64)> + '_ {
        slots
            .iter()
            .enumerate()
            .filter_map(move |(i, v)| v.map(|y| (axis.coordinate(slot_wavelength(i)), y)))
    }
}

/// The four sweep charts shown in the chart panel
#[derive(Debug, Clone)]
pub struct SweepCharts {
    pub ke_vs_wavelength: SweepChart,
    pub ke_vs_frequency: SweepChart,
    pub current_vs_wavelength: SweepChart,
    pub current_vs_frequency: SweepChart,
}

impl SweepCharts {
    pub fn new() -> Self {
        Self {
            ke_vs_wavelength: SweepChart::new(SweepAxis::Wavelength, SweepQuantity::KineticEnergy),
            ke_vs_frequency: SweepChart::new(SweepAxis::Frequency, SweepQuantity::KineticEnergy),
            current_vs_wavelength: SweepChart::new(SweepAxis::Wavelength, SweepQuantity::Current),
            current_vs_frequency: SweepChart::new(SweepAxis::Frequency, SweepQuantity::Current),
        }
    }

    pub fn record_kinetic_energy(&mut self, wavelength_nm: u32, value: f64) {
        self.ke_vs_wavelength.record(wavelength_nm, value);
        self.ke_vs_frequency.record(wavelength_nm, value);
    }

    pub fn record_current(&mut self, wavelength_nm: u32, value: f64) {
        self.current_vs_wavelength.record(wavelength_nm, value);
        self.current_vs_frequency.record(wavelength_nm, value);
    }

    pub fn save_all(&mut self) {
        self.charts_mut().for_each(SweepChart::save);
    }

    pub fn clear_all(&mut self) {
        self.charts_mut().for_each(SweepChart::clear);
    }

    fn charts_mut(&mut self) -> impl Iterator<Item = &mut SweepChart> {
        [
            &mut self.ke_vs_wavelength,
            &mut self.ke_vs_frequency,
            &mut self.current_vs_wavelength,
            &mut self.current_vs_frequency,
        ]
        .into_iter()
    }
}

impl Default for SweepCharts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indexing() {
        assert_eq!(SLOT_COUNT, 51);
        assert_eq!(slot_index(100), Some(0));
        assert_eq!(slot_index(600), Some(50));
        assert_eq!(slot_index(355), None);
        assert_eq!(slot_index(90), None);
    }

    #[test]
    fn test_record_overwrites_slot() {
        let mut chart = SweepChart::new(SweepAxis::Wavelength, SweepQuantity::KineticEnergy);
        assert!(chart.record(300, 1.0));
        assert!(chart.record(300, 2.0));
        assert!(!chart.record(301, 5.0));

        let points: Vec<_> = chart.points().collect();
        assert_eq!(points, vec![(300.0, 2.0)]);
    }

    #[test]
    fn test_frequency_axis_uses_thz() {
        let mut chart = SweepChart::new(SweepAxis::Frequency, SweepQuantity::Current);
        chart.record(500, 0.5);
        let (x, y) = chart.points().next().unwrap();
        assert!((x - 599.584916).abs() < 1e-3);
        assert_eq!(y, 0.5);
    }

    #[test]
    fn test_save_moves_live_to_overlay() {
        let mut charts = SweepCharts::new();
        charts.record_kinetic_energy(200, 3.0);
        charts.record_current(200, 0.1);
        charts.save_all();

        assert_eq!(charts.ke_vs_wavelength.points().count(), 0);
        assert_eq!(charts.ke_vs_wavelength.saved_points().collect::<Vec<_>>(), vec![(200.0, 3.0)]);
        assert_eq!(charts.current_vs_frequency.saved_points().count(), 1);

        charts.record_kinetic_energy(210, 2.0);
        charts.clear_all();
        assert_eq!(charts.ke_vs_wavelength.points().count(), 0);
        assert_eq!(charts.ke_vs_wavelength.saved_points().count(), 1, "clear keeps the overlay");
    }
}
