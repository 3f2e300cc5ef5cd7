//! Electron population simulation
//!
//! A discrete time-stepped particle system. Electrons leave the emitter
//! plate, drift along a one-dimensional axis at a fixed speed and are
//! collected at the far plate. A throttled spawner keeps the population near
//! a cap derived from intensity, and every collected electron may schedule a
//! replacement a few ticks later so the visible current stays steady.
//!
//! Ordering within one [`ElectronPopulationSimulator::tick`]:
//! 1. advance every live electron
//! 2. collect arrivals and schedule their regenerations
//! 3. fire regenerations that are due (never ones scheduled this tick)
//! 4. run the armed spawn attempt if its interval has elapsed

use glam::Vec2;
use rand::Rng;

/// Largest random slowdown applied to a spawned electron, as a fraction
const SPEED_SPREAD: f32 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Ticks between spawn attempts
    pub spawn_interval_ticks: u64,
    /// Ticks between a collection and its replacement spawn (at least 1)
    pub regeneration_delay_ticks: u64,
    /// Slots added to every population cap
    pub reserved_slot_count: u32,
    /// Axis coordinate where electrons are emitted
    pub emission_boundary: f32,
    /// Axis coordinate where electrons are collected
    pub collection_boundary: f32,
    /// Transverse band electrons are spread over (presentation only)
    pub lateral_min: f32,
    pub lateral_max: f32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ticks: 10,
            regeneration_delay_ticks: 1,
            reserved_slot_count: 10,
            emission_boundary: 15.0,
            collection_boundary: 385.0,
            lateral_min: 100.0,
            lateral_max: 250.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElectronId(u64);

/// A photoelectron in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Electron {
    id: ElectronId,
    drift_speed: f32,
    base_speed: f32,
    position: f32,
    lateral_offset: f32,
    regenerating: bool,
}

impl Electron {
    pub fn id(&self) -> ElectronId {
        self.id
    }

    pub fn drift_speed(&self) -> f32 {
        self.drift_speed
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn position_along_axis(&self) -> f32 {
        self.position
    }

    pub fn lateral_offset(&self) -> f32 {
        self.lateral_offset
    }

    pub fn is_regenerating(&self) -> bool {
        self.regenerating
    }

    /// Scene position: x along the travel axis, y across it
    pub fn scene_position(&self) -> Vec2 {
        Vec2::new(self.position, self.lateral_offset)
    }
}

/// A replacement spawn waiting for its tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRegeneration {
    pub speed_to_spawn: f32,
    pub base_speed_to_spawn: f32,
    pub fire_at_tick: u64,
}

/// Emitted for every electron that reaches the collector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    pub electron_id: ElectronId,
    pub drift_speed: f32,
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SpawnSchedule {
    target_speed: f32,
    base_speed: f32,
    intensity_percent: u32,
    scatter_factor: f32,
    next_attempt_tick: u64,
}

pub struct ElectronPopulationSimulator {
    config: SimulatorConfig,
    electrons: Vec<Electron>,
    pending: Vec<PendingRegeneration>,
    current_tick: u64,
    next_id: u64,
    schedule: Option<SpawnSchedule>,
}

impl ElectronPopulationSimulator {
    pub fn new(mut config: SimulatorConfig) -> Self {
        config.spawn_interval_ticks = config.spawn_interval_ticks.max(1);
        config.regeneration_delay_ticks = config.regeneration_delay_ticks.max(1);
        Self {
            config,
            electrons: Vec::new(),
            pending: Vec::new(),
            current_tick: 0,
            next_id: 0,
            schedule: None,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn live_electrons(&self) -> &[Electron] {
        &self.electrons
    }

    pub fn pending_regenerations(&self) -> &[PendingRegeneration] {
        &self.pending
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Whether a recurring spawn attempt is armed
    pub fn is_spawning(&self) -> bool {
        self.schedule.is_some()
    }

    /// Maximum simultaneous electrons for the given drive
    pub fn population_cap(&self, intensity_percent: u32, scatter_factor: f32) -> f32 {
        scatter_factor.max(0.0) * (intensity_percent / 2) as f32 + self.config.reserved_slot_count as f32
    }

    /// Re-arm (or halt) the recurring spawner after a parameter change.
    ///
    /// A zero target speed means no photoelectrons at this photon energy, so
    /// spawning stops. Pending regenerations are left alone and still fire
    /// with the speeds they captured.
    pub fn set_drive_parameters(
        &mut self,
        intensity_percent: u32,
        target_speed: f32,
        base_speed: f32,
        scatter_factor: f32,
    ) {
        let target_speed = non_negative(target_speed);
        if target_speed == 0.0 {
            if self.schedule.take().is_some() {
                log::debug!("spawning halted at tick {}", self.current_tick);
            }
            return;
        }

        self.schedule = Some(SpawnSchedule {
            target_speed,
            base_speed: non_negative(base_speed),
            intensity_percent,
            scatter_factor: non_negative(scatter_factor),
            next_attempt_tick: self.current_tick + self.config.spawn_interval_ticks,
        });
        log::debug!(
            "spawning armed: speed {:.3}, intensity {}%, scatter {:.2}, cap {:.1}",
            target_speed,
            intensity_percent,
            scatter_factor,
            self.population_cap(intensity_percent, scatter_factor)
        );
    }

    /// One admission-controlled spawn attempt. Rejected attempts are dropped.
    ///
    /// Pending regenerations count as occupied slots, and a fractional cap
    /// admits only whole electrons that fit under it.
    pub fn attempt_spawn<R: Rng + ?Sized>(
        &mut self,
        target_speed: f32,
        base_speed: f32,
        intensity_percent: u32,
        scatter_factor: f32,
        rng: &mut R,
    ) -> Option<ElectronId> {
        let occupancy = (self.electrons.len() + self.pending.len()) as f32;
        if occupancy + 1.0 > self.population_cap(intensity_percent, scatter_factor) {
            return None;
        }
        let speed = perturb(non_negative(target_speed), rng);
        Some(self.spawn(speed, non_negative(base_speed), rng))
    }

    /// Advance the population by one time step and report collected electrons
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Arrival> {
        let now = self.current_tick;
        let boundary = self.config.collection_boundary;
        let delay = self.config.regeneration_delay_ticks;

        let mut arrivals = Vec::new();
        let electrons = std::mem::take(&mut self.electrons);
        for mut electron in electrons {
            electron.position += electron.drift_speed;
            if electron.position < boundary {
                self.electrons.push(electron);
                continue;
            }

            arrivals.push(Arrival {
                electron_id: electron.id,
                drift_speed: electron.drift_speed,
                tick: now,
            });
            if electron.regenerating {
                self.pending.push(PendingRegeneration {
                    speed_to_spawn: perturb(electron.base_speed, rng),
                    base_speed_to_spawn: electron.base_speed,
                    fire_at_tick: now + delay,
                });
            }
        }

        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.fire_at_tick <= now);
        self.pending = waiting;
        for regen in due {
            self.spawn(regen.speed_to_spawn, regen.base_speed_to_spawn, rng);
        }

        if let Some(mut schedule) = self.schedule.take() {
            if now >= schedule.next_attempt_tick {
                self.attempt_spawn(
                    schedule.target_speed,
                    schedule.base_speed,
                    schedule.intensity_percent,
                    schedule.scatter_factor,
                    rng,
                );
                schedule.next_attempt_tick = now + self.config.spawn_interval_ticks;
            }
            self.schedule = Some(schedule);
        }

        if !arrivals.is_empty() {
            log::trace!("tick {}: {} arrivals", now, arrivals.len());
        }
        self.current_tick += 1;
        arrivals
    }

    /// Let one electron finish its pass without a successor
    pub fn disable_regeneration(&mut self, id: ElectronId) -> bool {
        match self.electrons.iter_mut().find(|e| e.id == id) {
            Some(electron) => {
                electron.regenerating = false;
                true
            }
            None => false,
        }
    }

    /// Stop every in-flight electron from regenerating
    pub fn disable_all_regeneration(&mut self) {
        for electron in &mut self.electrons {
            electron.regenerating = false;
        }
    }

    /// Drop every electron, pending regeneration and the spawn schedule
    pub fn clear(&mut self) {
        self.electrons.clear();
        self.pending.clear();
        self.schedule = None;
    }

    fn spawn<R: Rng + ?Sized>(&mut self, drift_speed: f32, base_speed: f32, rng: &mut R) -> ElectronId {
        let id = ElectronId(self.next_id);
        self.next_id += 1;

        let (lo, hi) = (self.config.lateral_min, self.config.lateral_max);
        let lateral_offset = if hi > lo && (hi - lo).is_finite() {
            rng.gen_range(lo..hi)
        } else if lo.is_finite() {
            lo
        } else {
            0.0
        };

        self.electrons.push(Electron {
            id,
            drift_speed,
            base_speed,
            position: self.config.emission_boundary,
            lateral_offset,
            regenerating: true,
        });
        id
    }
}

/// speed − U(0, 0.25)·speed
fn perturb<R: Rng + ?Sized>(speed: f32, rng: &mut R) -> f32 {
    non_negative(speed - rng.gen::<f32>() * SPEED_SPREAD * speed)
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn simulator() -> ElectronPopulationSimulator {
        ElectronPopulationSimulator::new(SimulatorConfig::default())
    }

    #[test]
    fn test_cap_with_zero_intensity_is_reserved_count() {
        let sim = simulator();
        assert_eq!(sim.population_cap(0, 1.0), 10.0);
        assert_eq!(sim.population_cap(1, 0.5), 10.0);
        assert_eq!(sim.population_cap(51, 0.5), 22.5);
    }

    #[test]
    fn test_zero_intensity_never_exceeds_reserved_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sim = simulator();
        sim.set_drive_parameters(0, 1.0, 1.0, 1.0);
        for _ in 0..5000 {
            sim.tick(&mut rng);
            assert!(sim.live_electrons().len() <= 10);
        }
    }

    #[test]
    fn test_population_never_exceeds_cap() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(intensity, speed, scatter) in &[(100u32, 3.0f32, 0.5f32), (37, 1.2, 1.0), (80, 0.4, 0.9)] {
            let mut sim = simulator();
            let cap = sim.population_cap(intensity, scatter);
            sim.set_drive_parameters(intensity, speed, speed, scatter);
            for _ in 0..4000 {
                sim.tick(&mut rng);
                assert!(
                    sim.live_electrons().len() as f32 <= cap,
                    "{} live electrons exceed cap {}",
                    sim.live_electrons().len(),
                    cap
                );
            }
            assert!(!sim.live_electrons().is_empty());
        }
    }

    #[test]
    fn test_spawned_speeds_are_perturbed_downward() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sim = simulator();
        for _ in 0..40 {
            sim.attempt_spawn(2.0, 2.0, 100, 1.0, &mut rng);
        }
        assert_eq!(sim.live_electrons().len(), 40);
        for electron in sim.live_electrons() {
            assert!(electron.drift_speed() > 1.5 - 1e-6 && electron.drift_speed() <= 2.0);
            assert_eq!(electron.base_speed(), 2.0);
            assert_eq!(electron.position_along_axis(), 15.0);
            assert!(electron.is_regenerating());
            assert!((100.0..250.0).contains(&electron.lateral_offset()));
        }
    }

    #[test]
    fn test_fractional_cap_admits_whole_electrons_only() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut sim = simulator();
        // 0.5 * 5 + 10 = 12.5
        let admitted = (0..20)
            .filter(|_| sim.attempt_spawn(1.0, 1.0, 10, 0.5, &mut rng).is_some())
            .count();
        assert_eq!(admitted, 12);
    }

    #[test]
    fn test_rejected_spawn_is_dropped() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sim = simulator();
        for _ in 0..10 {
            assert!(sim.attempt_spawn(1.0, 1.0, 0, 1.0, &mut rng).is_some());
        }
        assert!(sim.attempt_spawn(1.0, 1.0, 0, 1.0, &mut rng).is_none());
        assert_eq!(sim.live_electrons().len(), 10);
        assert!(sim.pending_regenerations().is_empty());
    }

    #[test]
    fn test_tick_advances_positions() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut sim = simulator();
        sim.attempt_spawn(2.0, 2.0, 100, 1.0, &mut rng);
        let speed = sim.live_electrons()[0].drift_speed();
        sim.tick(&mut rng);
        let position = sim.live_electrons()[0].position_along_axis();
        assert!((position - (15.0 + speed)).abs() < 1e-5);
        assert_eq!(sim.current_tick(), 1);
    }

    #[test]
    fn test_arrival_is_regenerated_on_a_later_tick() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sim = simulator();
        let id = sim.attempt_spawn(50.0, 50.0, 100, 1.0, &mut rng).unwrap();
        let speed = sim.live_electrons()[0].drift_speed();

        let mut arrivals = Vec::new();
        while arrivals.is_empty() {
            arrivals = sim.tick(&mut rng);
        }
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].electron_id, id);
        assert_eq!(arrivals[0].drift_speed, speed, "arrival reports the electron's own speed");
        assert_eq!(arrivals[0].tick, sim.current_tick() - 1);

        // Never in the same tick it was scheduled
        assert!(sim.live_electrons().is_empty());
        assert_eq!(sim.pending_regenerations().len(), 1);

        for _ in 0..sim.config().regeneration_delay_ticks {
            sim.tick(&mut rng);
        }
        assert_eq!(sim.live_electrons().len(), 1);
        assert!(sim.pending_regenerations().is_empty());

        let replacement = &sim.live_electrons()[0];
        assert_ne!(replacement.id(), id);
        assert_eq!(replacement.base_speed(), 50.0);
        assert!(replacement.drift_speed() >= 37.5 && replacement.drift_speed() <= 50.0);
    }

    #[test]
    fn test_disabled_regeneration_leaves_no_successor() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sim = simulator();
        let id = sim.attempt_spawn(100.0, 100.0, 100, 1.0, &mut rng).unwrap();
        assert!(sim.disable_regeneration(id));

        let arrivals: usize = (0..10).map(|_| sim.tick(&mut rng).len()).sum();
        assert_eq!(arrivals, 1);
        assert!(sim.live_electrons().is_empty());
        assert!(sim.pending_regenerations().is_empty());

        assert!(!sim.disable_regeneration(id), "electron is gone");
    }

    #[test]
    fn test_disabling_spawn_twice_is_harmless() {
        let mut sim = simulator();
        sim.set_drive_parameters(50, 1.0, 1.0, 1.0);
        assert!(sim.is_spawning());
        sim.set_drive_parameters(50, 0.0, 0.0, 1.0);
        sim.set_drive_parameters(50, 0.0, 0.0, 1.0);
        assert!(!sim.is_spawning());
        sim.set_drive_parameters(50, -3.0, 1.0, 1.0);
        assert!(!sim.is_spawning());
    }

    #[test]
    fn test_spawn_cadence_follows_interval() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sim = simulator();
        sim.set_drive_parameters(100, 0.01, 0.01, 1.0);
        for _ in 0..10 {
            sim.tick(&mut rng);
        }
        assert_eq!(sim.live_electrons().len(), 0, "first attempt is one interval after arming");
        sim.tick(&mut rng);
        assert_eq!(sim.live_electrons().len(), 1);
        for _ in 0..10 {
            sim.tick(&mut rng);
        }
        assert_eq!(sim.live_electrons().len(), 2);
    }

    #[test]
    fn test_pending_regenerations_survive_spawn_halt() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut sim = simulator();
        sim.attempt_spawn(1000.0, 1000.0, 100, 1.0, &mut rng);
        sim.tick(&mut rng);
        assert_eq!(sim.pending_regenerations().len(), 1);

        sim.set_drive_parameters(100, 0.0, 0.0, 1.0);
        sim.tick(&mut rng);
        assert_eq!(sim.live_electrons().len(), 1, "stale regeneration still fires");
    }

    #[test]
    fn test_unbounded_lateral_band_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut sim = ElectronPopulationSimulator::new(SimulatorConfig {
            lateral_min: f32::NEG_INFINITY,
            lateral_max: f32::INFINITY,
            ..SimulatorConfig::default()
        });
        sim.attempt_spawn(2.0, 2.0, 100, 1.0, &mut rng).unwrap();
        assert_eq!(sim.live_electrons()[0].lateral_offset(), 0.0);
    }

    #[test]
    fn test_clear_resets_population() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut sim = simulator();
        sim.set_drive_parameters(100, 1.0, 1.0, 1.0);
        sim.attempt_spawn(1.0, 1.0, 100, 1.0, &mut rng);
        sim.clear();
        assert!(sim.live_electrons().is_empty());
        assert!(!sim.is_spawning());
    }
}
