//! Incident wave trace
//!
//! A fixed time window sampled at 401 points; amplitude follows intensity
//! and the oscillation follows the light frequency (THz on a ms-scale axis,
//! so short wavelengths look visibly denser).

use std::f64::consts::TAU;

use crate::model::PhotoelectricModel;

pub const TRACE_SAMPLES: usize = 401;
pub const TRACE_HALF_WINDOW: f64 = 2e-3;

/// Sample `y = A·cos(2π·f·t)` over `[-2e-3, 2e-3]`
pub fn waveform(wavelength_nm: u32, intensity_percent: u32) -> Vec<(f64, f64)> {
    let amplitude = intensity_percent as f64 / 100.0;
    let omega = TAU * PhotoelectricModel::frequency_thz(wavelength_nm);
    let span = 2.0 * TRACE_HALF_WINDOW;

    (0..TRACE_SAMPLES)
        .map(|i| {
            let t = -TRACE_HALF_WINDOW + span * i as f64 / (TRACE_SAMPLES - 1) as f64;
            (t, amplitude * (omega * t).cos())
        })
        .collect()
}
