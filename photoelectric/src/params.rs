//! User-controlled simulation parameters
//!
//! This is the single source of truth for wavelength, intensity and target.
//! Every control (slider, numeric box, combo box) is a view of it: setters
//! clamp into the valid domain and only report a [`ParameterChange`] when
//! the stored value actually moved, so two widgets bound to the same value
//! cannot ping-pong updates between each other.

use std::ops::RangeInclusive;

use crate::error::PhotoError;
use crate::materials::TargetMaterial;

pub const WAVELENGTH_RANGE_NM: RangeInclusive<u32> = 100..=600;
pub const INTENSITY_RANGE_PERCENT: RangeInclusive<u32> = 0..=100;

/// What changed in the last successful update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterChange {
    Wavelength { from: u32, to: u32 },
    Intensity { from: u32, to: u32 },
    Material { from: TargetMaterial, to: TargetMaterial },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    wavelength_nm: u32,
    intensity_percent: u32,
    material: TargetMaterial,
}

impl SimulationParameters {
    pub fn new(wavelength_nm: i64, intensity_percent: i64, material: TargetMaterial) -> Self {
        Self {
            wavelength_nm: clamp_to(wavelength_nm, &WAVELENGTH_RANGE_NM, "wavelength_nm"),
            intensity_percent: clamp_to(intensity_percent, &INTENSITY_RANGE_PERCENT, "intensity_percent"),
            material,
        }
    }

    pub fn wavelength_nm(&self) -> u32 {
        self.wavelength_nm
    }

    pub fn intensity_percent(&self) -> u32 {
        self.intensity_percent
    }

    pub fn material(&self) -> TargetMaterial {
        self.material
    }

    /// Intensity as a fraction of full power
    pub fn intensity_fraction(&self) -> f64 {
        self.intensity_percent as f64 / 100.0
    }

    pub fn set_wavelength(&mut self, wavelength_nm: i64) -> Option<ParameterChange> {
        let to = clamp_to(wavelength_nm, &WAVELENGTH_RANGE_NM, "wavelength_nm");
        let from = self.wavelength_nm;
        if to == from {
            return None;
        }
        self.wavelength_nm = to;
        Some(ParameterChange::Wavelength { from, to })
    }

    pub fn set_intensity(&mut self, intensity_percent: i64) -> Option<ParameterChange> {
        let to = clamp_to(intensity_percent, &INTENSITY_RANGE_PERCENT, "intensity_percent");
        let from = self.intensity_percent;
        if to == from {
            return None;
        }
        self.intensity_percent = to;
        Some(ParameterChange::Intensity { from, to })
    }

    pub fn set_material(&mut self, material: TargetMaterial) -> Option<ParameterChange> {
        let from = self.material;
        if from == material {
            return None;
        }
        self.material = material;
        Some(ParameterChange::Material { from, to: material })
    }

    /// Strict check used for the configured initial state
    pub fn validate_wavelength(wavelength_nm: i64) -> Result<u32, PhotoError> {
        check_domain(wavelength_nm, &WAVELENGTH_RANGE_NM, "wavelength_nm")
    }

    pub fn validate_intensity(intensity_percent: i64) -> Result<u32, PhotoError> {
        check_domain(intensity_percent, &INTENSITY_RANGE_PERCENT, "intensity_percent")
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            wavelength_nm: *WAVELENGTH_RANGE_NM.start(),
            intensity_percent: *INTENSITY_RANGE_PERCENT.start(),
            material: TargetMaterial::default(),
        }
    }
}

fn check_domain(value: i64, range: &RangeInclusive<u32>, parameter: &'static str) -> Result<u32, PhotoError> {
    let (min, max) = (*range.start() as i64, *range.end() as i64);
    if value < min || value > max {
        return Err(PhotoError::DomainViolation { parameter, value, min, max });
    }
    Ok(value as u32)
}

fn clamp_to(value: i64, range: &RangeInclusive<u32>, parameter: &'static str) -> u32 {
    match check_domain(value, range, parameter) {
        Ok(v) => v,
        Err(err) => {
            log::warn!("{}; clamping", err);
            value.clamp(*range.start() as i64, *range.end() as i64) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_clamp_into_domain() {
        let mut params = SimulationParameters::default();
        assert_eq!(
            params.set_wavelength(50),
            None,
            "clamped to 100, which is already the value"
        );
        assert_eq!(params.wavelength_nm(), 100);

        params.set_wavelength(9000);
        assert_eq!(params.wavelength_nm(), 600);

        params.set_intensity(-5);
        assert_eq!(params.intensity_percent(), 0);
        params.set_intensity(250);
        assert_eq!(params.intensity_percent(), 100);
    }

    #[test]
    fn test_unchanged_values_report_nothing() {
        let mut params = SimulationParameters::new(400, 50, TargetMaterial::Zinc);
        assert_eq!(params.set_wavelength(400), None);
        assert_eq!(params.set_intensity(50), None);
        assert_eq!(params.set_material(TargetMaterial::Zinc), None);

        assert_eq!(
            params.set_wavelength(410),
            Some(ParameterChange::Wavelength { from: 400, to: 410 })
        );
        assert_eq!(
            params.set_material(TargetMaterial::Copper),
            Some(ParameterChange::Material {
                from: TargetMaterial::Zinc,
                to: TargetMaterial::Copper
            })
        );
    }

    #[test]
    fn test_strict_validation() {
        assert_eq!(SimulationParameters::validate_wavelength(250).unwrap(), 250);
        assert!(matches!(
            SimulationParameters::validate_intensity(101),
            Err(PhotoError::DomainViolation { parameter: "intensity_percent", value: 101, .. })
        ));
    }

    #[test]
    fn test_intensity_fraction() {
        let params = SimulationParameters::new(500, 25, TargetMaterial::Sodium);
        assert!((params.intensity_fraction() - 0.25).abs() < 1e-12);
    }
}
