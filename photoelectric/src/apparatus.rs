//! Apparatus scene geometry
//!
//! The simulator works in a 400×400 scene with y pointing down, electrons
//! travelling +x from the emitter plate to the collector. This module maps
//! that scene into world space (y up, centred on the electron gap) and builds
//! the line art and point instances the renderer draws.

use glam::{Vec2, Vec3};

use crate::params::SimulationParameters;
use crate::renderer::PointInstance;
use crate::simulator::ElectronPopulationSimulator;
use crate::spectrum;

pub type Line = (Vec3, Vec3, [f32; 4]);

/// Scene point mapped to the world origin
pub const SCENE_CENTER: Vec2 = Vec2::new(200.0, 175.0);

/// Ammeter full-scale deflection (A)
pub const AMMETER_FULL_SCALE: f64 = 2.0;

const PLATE_COLOR: [f32; 4] = [0.75, 0.75, 0.8, 1.0];
const WIRE_COLOR: [f32; 4] = [0.85, 0.55, 0.2, 1.0];
const HOUSING_COLOR: [f32; 4] = [0.5, 0.5, 0.55, 1.0];
const NEEDLE_COLOR: [f32; 4] = [1.0, 0.3, 0.3, 1.0];
const ELECTRON_COLOR: [f32; 4] = [0.3, 0.8, 1.0, 0.95];
const FINAL_PASS_COLOR: [f32; 4] = [0.3, 0.8, 1.0, 0.45];

const ELECTRON_SIZE: f32 = 3.5;
const BEAM_RAYS: usize = 12;

// Scene-space layout
const EMITTER_X: (f32, f32) = (5.0, 15.0);
const COLLECTOR_X: (f32, f32) = (385.0, 395.0);
const PLATE_Y: (f32, f32) = (80.0, 270.0);
const WIRE_Y: f32 = 340.0;
const AMMETER_MIN: Vec2 = Vec2::new(170.0, 320.0);
const AMMETER_MAX: Vec2 = Vec2::new(230.0, 360.0);
const LAMP_MIN: Vec2 = Vec2::new(180.0, 0.0);
const LAMP_MAX: Vec2 = Vec2::new(220.0, 20.0);

pub fn scene_to_world(point: Vec2) -> Vec3 {
    Vec3::new(point.x - SCENE_CENTER.x, SCENE_CENTER.y - point.y, 0.0)
}

/// World-space rectangle covering the whole apparatus
pub fn world_bounds() -> (Vec2, Vec2) {
    let a = scene_to_world(Vec2::new(0.0, 0.0));
    let b = scene_to_world(Vec2::new(400.0, 370.0));
    (a.truncate().min(b.truncate()), a.truncate().max(b.truncate()))
}

/// Static hardware plus the light beam and ammeter needle for the given state
pub fn apparatus_lines(params: &SimulationParameters, photocurrent_amps: f64) -> Vec<Line> {
    let mut lines = Vec::with_capacity(64);

    push_rect(&mut lines, Vec2::new(EMITTER_X.0, PLATE_Y.0), Vec2::new(EMITTER_X.1, PLATE_Y.1), PLATE_COLOR);
    push_rect(&mut lines, Vec2::new(COLLECTOR_X.0, PLATE_Y.0), Vec2::new(COLLECTOR_X.1, PLATE_Y.1), PLATE_COLOR);

    // Circuit: emitter -> ammeter -> collector
    let emitter_mid = (EMITTER_X.0 + EMITTER_X.1) * 0.5;
    let collector_mid = (COLLECTOR_X.0 + COLLECTOR_X.1) * 0.5;
    let ammeter_mid_y = (AMMETER_MIN.y + AMMETER_MAX.y) * 0.5;
    push_segment(&mut lines, Vec2::new(emitter_mid, PLATE_Y.1), Vec2::new(emitter_mid, WIRE_Y), WIRE_COLOR);
    push_segment(&mut lines, Vec2::new(emitter_mid, WIRE_Y), Vec2::new(AMMETER_MIN.x, ammeter_mid_y), WIRE_COLOR);
    push_segment(&mut lines, Vec2::new(AMMETER_MAX.x, ammeter_mid_y), Vec2::new(collector_mid, WIRE_Y), WIRE_COLOR);
    push_segment(&mut lines, Vec2::new(collector_mid, WIRE_Y), Vec2::new(collector_mid, PLATE_Y.1), WIRE_COLOR);

    push_rect(&mut lines, AMMETER_MIN, AMMETER_MAX, HOUSING_COLOR);
    let pivot = Vec2::new((AMMETER_MIN.x + AMMETER_MAX.x) * 0.5, AMMETER_MAX.y - 4.0);
    let angle = needle_angle(photocurrent_amps);
    let tip = pivot + Vec2::new(angle.sin(), -angle.cos()) * 30.0;
    push_segment(&mut lines, pivot, tip, NEEDLE_COLOR);

    push_rect(&mut lines, LAMP_MIN, LAMP_MAX, HOUSING_COLOR);
    push_beam(&mut lines, params);

    lines
}

/// Needle angle in radians from vertical, ±60° at full scale
pub fn needle_angle(photocurrent_amps: f64) -> f32 {
    let deflection = (photocurrent_amps / AMMETER_FULL_SCALE).clamp(0.0, 1.0) as f32;
    (-60.0 + 120.0 * deflection).to_radians()
}

/// One instance per in-flight electron
pub fn electron_points(simulator: &ElectronPopulationSimulator) -> Vec<PointInstance> {
    simulator
        .live_electrons()
        .iter()
        .map(|electron| {
            let pos = scene_to_world(electron.scene_position());
            PointInstance {
                position: [pos.x, pos.y, pos.z],
                size: ELECTRON_SIZE,
                color: if electron.is_regenerating() {
                    ELECTRON_COLOR
                } else {
                    FINAL_PASS_COLOR
                },
            }
        })
        .collect()
}

/// Rays from the lamp onto the emitter, tinted by wavelength, faded by intensity
fn push_beam(lines: &mut Vec<Line>, params: &SimulationParameters) {
    if params.intensity_percent() == 0 {
        return;
    }
    let alpha = 0.15 + 0.6 * params.intensity_fraction() as f32;
    let color = spectrum::wavelength_to_rgba(params.wavelength_nm() as f32, alpha);
    let source = Vec2::new((LAMP_MIN.x + LAMP_MAX.x) * 0.5, LAMP_MAX.y);

    for i in 0..BEAM_RAYS {
        let t = i as f32 / (BEAM_RAYS - 1) as f32;
        let target = Vec2::new(EMITTER_X.1, 100.0 + t * 150.0);
        push_segment(lines, source, target, color);
    }
}

fn push_segment(lines: &mut Vec<Line>, a: Vec2, b: Vec2, color: [f32; 4]) {
    lines.push((scene_to_world(a), scene_to_world(b), color));
}

fn push_rect(lines: &mut Vec<Line>, min: Vec2, max: Vec2, color: [f32; 4]) {
    let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
    for i in 0..4 {
        push_segment(lines, corners[i], corners[(i + 1) % 4], color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::TargetMaterial;
    use crate::simulator::SimulatorConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scene_mapping_flips_y() {
        assert_eq!(scene_to_world(SCENE_CENTER), Vec3::ZERO);
        let p = scene_to_world(Vec2::new(385.0, 100.0));
        assert_eq!(p, Vec3::new(185.0, 75.0, 0.0));
    }

    #[test]
    fn test_bounds_contain_electron_gap() {
        let (min, max) = world_bounds();
        for corner in [Vec2::new(15.0, 100.0), Vec2::new(385.0, 250.0)] {
            let p = scene_to_world(corner).truncate();
            assert!(p.cmpge(min).all() && p.cmple(max).all());
        }
    }

    #[test]
    fn test_beam_only_when_lit() {
        let dark = SimulationParameters::new(400, 0, TargetMaterial::Sodium);
        let lit = SimulationParameters::new(400, 80, TargetMaterial::Sodium);
        assert_eq!(apparatus_lines(&lit, 0.0).len(), apparatus_lines(&dark, 0.0).len() + BEAM_RAYS);

        let beam = apparatus_lines(&lit, 0.0).pop().unwrap();
        assert!((beam.2[3] - 0.63).abs() < 1e-5);
    }

    #[test]
    fn test_needle_is_clamped() {
        assert!((needle_angle(0.0) + 60f32.to_radians()).abs() < 1e-6);
        assert!((needle_angle(1.0)).abs() < 1e-6);
        assert_eq!(needle_angle(50.0), needle_angle(AMMETER_FULL_SCALE));
        assert_eq!(needle_angle(-1.0), needle_angle(0.0));
    }

    #[test]
    fn test_electron_points_follow_population() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sim = ElectronPopulationSimulator::new(SimulatorConfig::default());
        for _ in 0..5 {
            sim.attempt_spawn(2.0, 2.0, 100, 1.0, &mut rng);
        }
        let points = electron_points(&sim);
        assert_eq!(points.len(), 5);
        for (point, electron) in points.iter().zip(sim.live_electrons()) {
            let expected = scene_to_world(electron.scene_position());
            assert_eq!(point.position, [expected.x, expected.y, 0.0]);
        }
    }
}
