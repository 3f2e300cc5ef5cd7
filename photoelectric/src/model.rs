//! Photoelectric physics model
//!
//! Stateless calculator for photoelectron kinetic energy and photocurrent:
//! - Einstein relation: KE = hc/λ − φ
//! - Photocurrent: linear photon-flux term × Fermi–Dirac occupation × a
//!   quadratic excess-energy term, capped by a linear saturation estimate
//!
//! All arithmetic is SI `f64`. Anything non-finite collapses to zero so a
//! boundary wavelength can never poison the animation loop.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::constants::{C, E, H, K_B, NM, ROOM_TEMPERATURE};
use crate::params::SimulationParameters;

/// Default measurement noise on plotted current samples (A)
pub const DEFAULT_NOISE_STD_DEV: f64 = 0.01;

/// Saturation coefficient of the linear photocurrent estimate
const SATURATION_COEFF: f64 = 10.93;

/// Below this wavelength surface scattering reduces the photoelectron yield
const SCATTER_ONSET_NM: f64 = 200.0;

/// Results of one model evaluation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelOutput {
    pub kinetic_energy_ev: f64,
    pub photocurrent_amps: f64,
}

pub struct PhotoelectricModel;

impl PhotoelectricModel {
    /// Evaluate both observables for the given parameters
    pub fn evaluate(params: &SimulationParameters) -> ModelOutput {
        let material = params.material();
        ModelOutput {
            kinetic_energy_ev: Self::kinetic_energy_ev(
                params.wavelength_nm(),
                params.intensity_percent(),
                material.work_function_ev(),
            ),
            photocurrent_amps: Self::photocurrent(
                params.wavelength_nm(),
                params.intensity_percent(),
                material.work_function_ev(),
                material.reference_optical_power(),
            ),
        }
    }

    /// Maximum kinetic energy of an ejected electron in eV.
    ///
    /// Zero below threshold, and zero when no light reaches the plate.
    pub fn kinetic_energy_ev(wavelength_nm: u32, intensity_percent: u32, work_function_ev: f64) -> f64 {
        if intensity_percent == 0 {
            return 0.0;
        }
        let joules = H * C / (wavelength_nm as f64 * NM) - work_function_ev * E;
        finite_non_negative(joules / E)
    }

    /// Photocurrent in amperes
    pub fn photocurrent(
        wavelength_nm: u32,
        intensity_percent: u32,
        work_function_ev: f64,
        reference_optical_power: f64,
    ) -> f64 {
        let wavelength = wavelength_nm as f64 * NM;
        let fraction = intensity_percent as f64 / 100.0;

        // Photon energy above the work function (J)
        let excess = H * C / wavelength - work_function_ev * E;
        let photon_flux_charge = wavelength / (H * C) * E;

        let occupation = 1.0 / ((-excess / (K_B * ROOM_TEMPERATURE)).exp() + 1.0);
        let thermal = (excess / K_B * ROOM_TEMPERATURE).powi(2);

        let combined = reference_optical_power * fraction * photon_flux_charge * occupation * thermal;
        let linear = SATURATION_COEFF * fraction * photon_flux_charge;

        let current = if linear < combined { linear } else { combined };
        finite_non_negative(current)
    }

    /// Add Gaussian measurement jitter to a displayed sample
    pub fn add_measurement_noise<R: Rng + ?Sized>(value: f64, std_dev: f64, rng: &mut R) -> f64 {
        match Normal::new(0.0, std_dev) {
            Ok(normal) => value + normal.sample(rng),
            Err(err) => {
                log::warn!("invalid noise std dev {}: {}", std_dev, err);
                value
            }
        }
    }

    /// Photon energy in eV
    pub fn photon_energy_ev(wavelength_nm: u32) -> f64 {
        H * C / (wavelength_nm as f64 * NM) / E
    }

    /// Light frequency in THz
    pub fn frequency_thz(wavelength_nm: u32) -> f64 {
        C / (wavelength_nm as f64 * 1e3)
    }

    /// Longest wavelength that still ejects electrons, in nm
    pub fn threshold_wavelength_nm(work_function_ev: f64) -> f64 {
        if work_function_ev <= 0.0 {
            return f64::INFINITY;
        }
        H * C / (work_function_ev * E) / NM
    }

    /// Yield falloff below 200 nm: linear ramp λ/200, else 1
    pub fn scatter_factor(wavelength_nm: u32) -> f64 {
        let wavelength = wavelength_nm as f64;
        if wavelength < SCATTER_ONSET_NM {
            wavelength / SCATTER_ONSET_NM
        } else {
            1.0
        }
    }

    /// Animation drift speed for a given kinetic energy.
    ///
    /// Speed ∝ √KE with the mass factor absorbed into the scene scale.
    pub fn drift_speed(kinetic_energy_ev: f64) -> f64 {
        finite_non_negative(kinetic_energy_ev).sqrt()
    }
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
