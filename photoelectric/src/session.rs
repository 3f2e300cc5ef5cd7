//! Simulation session
//!
//! Owns the parameters, the shared random source, the electron population
//! and every derived view. Parameter edits flow through here:
//!
//! parameters → model readouts → chart samples / oscilloscope → electron drive
//!
//! Views read the session; they never hold their own copy of a parameter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AppConfig;
use crate::error::Result;
use crate::history::RollingHistory;
use crate::materials::TargetMaterial;
use crate::model::PhotoelectricModel;
use crate::oscilloscope;
use crate::params::{ParameterChange, SimulationParameters};
use crate::simulator::{Arrival, ElectronPopulationSimulator};
use crate::sweep::{self, SweepCharts};

/// Latest model outputs shown in the readouts
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readout {
    pub kinetic_energy_ev: f64,
    pub photocurrent_amps: f64,
    /// Last plotted (noisy) current sample, if one was taken
    pub noisy_sample: Option<f64>,
}

pub struct Session<R: Rng = StdRng> {
    config: AppConfig,
    params: SimulationParameters,
    rng: R,
    simulator: ElectronPopulationSimulator,
    ke_tracker: RollingHistory,
    charts: SweepCharts,
    trace: Vec<(f64, f64)>,
    readout: Readout,
    tick_accumulator: f32,
}

impl Session<StdRng> {
    /// Seeded from `simulation.seed` when set, otherwise from entropy
    pub fn new(config: AppConfig) -> Result<Self> {
        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(config: AppConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let params = config.initial.parameters()?;
        let simulator = ElectronPopulationSimulator::new(config.simulation.simulator());
        let ke_tracker = RollingHistory::new(config.history.history());

        let mut session = Self {
            config,
            params,
            rng,
            simulator,
            ke_tracker,
            charts: SweepCharts::new(),
            trace: Vec::new(),
            readout: Readout::default(),
            tick_accumulator: 0.0,
        };
        session.initialise_views();

        log::info!(
            "Session started: {} nm, {}%, {}",
            session.params.wavelength_nm(),
            session.params.intensity_percent(),
            session.params.material()
        );
        Ok(session)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn readout(&self) -> Readout {
        self.readout
    }

    pub fn simulator(&self) -> &ElectronPopulationSimulator {
        &self.simulator
    }

    pub fn ke_tracker(&self) -> &RollingHistory {
        &self.ke_tracker
    }

    pub fn charts(&self) -> &SweepCharts {
        &self.charts
    }

    pub fn oscilloscope_trace(&self) -> &[(f64, f64)] {
        &self.trace
    }

    pub fn set_wavelength(&mut self, wavelength_nm: i64) -> Option<ParameterChange> {
        let change = self.params.set_wavelength(wavelength_nm)?;
        self.apply(change);
        Some(change)
    }

    pub fn set_intensity(&mut self, intensity_percent: i64) -> Option<ParameterChange> {
        let change = self.params.set_intensity(intensity_percent)?;
        self.apply(change);
        Some(change)
    }

    pub fn select_material(&mut self, material: TargetMaterial) -> Option<ParameterChange> {
        let change = self.params.set_material(material)?;
        self.apply(change);
        Some(change)
    }

    /// Select a material by catalog key
    pub fn set_material(&mut self, name: &str) -> Result<Option<ParameterChange>> {
        let material = TargetMaterial::from_name(name)?;
        Ok(self.select_material(material))
    }

    /// Move every live chart curve into its saved overlay
    pub fn save_series(&mut self) {
        self.charts.save_all();
        log::info!("Saved chart series");
    }

    /// Clear every live chart curve
    pub fn wipe_series(&mut self) {
        self.charts.clear_all();
        log::debug!("Cleared chart series");
    }

    /// Run one simulation tick and feed arrivals to the KE tracker
    pub fn tick(&mut self) -> Vec<Arrival> {
        let arrivals = self.simulator.tick(&mut self.rng);
        for arrival in &arrivals {
            let speed = arrival.drift_speed as f64;
            self.ke_tracker.record_arrival(speed * speed);
        }
        self.ke_tracker.advance();
        arrivals
    }

    /// Advance by wall-clock time at the fixed tick rate. Returns ticks run.
    pub fn advance(&mut self, dt_seconds: f32) -> u32 {
        let tick_period = 1.0 / self.config.simulation.tick_rate_hz;
        let max_ticks = self.config.simulation.max_ticks_per_frame;

        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.tick_accumulator += dt_seconds;
        }

        let mut ticks = 0;
        while self.tick_accumulator >= tick_period && ticks < max_ticks {
            self.tick();
            self.tick_accumulator -= tick_period;
            ticks += 1;
        }
        if ticks == max_ticks && self.tick_accumulator >= tick_period {
            log::debug!("dropping {:.3}s of simulation backlog", self.tick_accumulator);
            self.tick_accumulator = 0.0;
        }
        ticks
    }

    /// Start over from the configured initial state
    pub fn reset(&mut self) -> Result<()> {
        self.params = self.config.initial.parameters()?;
        self.simulator.clear();
        self.ke_tracker.clear();
        self.charts = SweepCharts::new();
        self.tick_accumulator = 0.0;
        self.readout = Readout::default();
        self.initialise_views();
        log::info!("Session reset");
        Ok(())
    }

    /// Readouts, first chart samples, trace and drive for the current parameters
    fn initialise_views(&mut self) {
        self.refresh_readout();
        self.charts
            .record_kinetic_energy(self.params.wavelength_nm(), self.readout.kinetic_energy_ev);
        self.record_current_sample();
        self.refresh_trace();
        self.reset_electrons();
    }

    fn apply(&mut self, change: ParameterChange) {
        log::info!("{:?}", change);
        self.refresh_readout();

        let wavelength = self.params.wavelength_nm();
        match change {
            ParameterChange::Wavelength { .. } => {
                self.charts.record_kinetic_energy(wavelength, self.readout.kinetic_energy_ev);
                self.record_current_sample();
            }
            ParameterChange::Intensity { .. } => {
                self.record_current_sample();
            }
            ParameterChange::Material { .. } => {
                // Curves for the old metal no longer apply
                self.charts.clear_all();
            }
        }

        self.refresh_trace();
        self.reset_electrons();
    }

    fn refresh_readout(&mut self) {
        let output = PhotoelectricModel::evaluate(&self.params);
        self.readout.kinetic_energy_ev = output.kinetic_energy_ev;
        self.readout.photocurrent_amps = output.photocurrent_amps;
    }

    /// Noisy current sample for the chart slot. Off-step wavelengths plot
    /// nothing and draw no noise.
    fn record_current_sample(&mut self) {
        if sweep::slot_index(self.params.wavelength_nm()).is_none() {
            return;
        }
        let sample = PhotoelectricModel::add_measurement_noise(
            self.readout.photocurrent_amps,
            self.config.measurement.noise_std_dev,
            &mut self.rng,
        );
        self.readout.noisy_sample = Some(sample);
        self.charts.record_current(self.params.wavelength_nm(), sample);
    }

    fn refresh_trace(&mut self) {
        self.trace = oscilloscope::waveform(self.params.wavelength_nm(), self.params.intensity_percent());
    }

    /// In-flight electrons finish their pass; new ones follow the new drive
    fn reset_electrons(&mut self) {
        self.simulator.disable_all_regeneration();

        let speed = PhotoelectricModel::drift_speed(self.readout.kinetic_energy_ev) as f32;
        let scatter = PhotoelectricModel::scatter_factor(self.params.wavelength_nm()) as f32;
        self.simulator
            .set_drive_parameters(self.params.intensity_percent(), speed, speed, scatter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut config = AppConfig::default();
        config.simulation.seed = Some(1234);
        Session::new(config).unwrap()
    }

    #[test]
    fn test_initial_state_is_dark() {
        let session = session();
        assert_eq!(session.params().wavelength_nm(), 100);
        assert_eq!(session.params().intensity_percent(), 0);
        assert_eq!(session.readout().kinetic_energy_ev, 0.0);
        assert!(!session.simulator().is_spawning());
    }

    #[test]
    fn test_wavelength_change_updates_readout_and_charts() {
        let mut session = session();
        session.set_intensity(50);
        session.set_wavelength(500);

        let readout = session.readout();
        assert!((readout.kinetic_energy_ev - 0.130).abs() < 1e-3);
        assert!(readout.noisy_sample.is_some());

        let ke: Vec<_> = session.charts().ke_vs_wavelength.points().collect();
        assert!(ke.iter().any(|&(x, y)| x == 500.0 && (y - 0.130).abs() < 1e-3));
        assert!(session.simulator().is_spawning());
    }

    #[test]
    fn test_repeated_value_is_not_a_change() {
        let mut session = session();
        assert!(session.set_wavelength(300).is_some());
        assert!(session.set_wavelength(300).is_none());
    }

    #[test]
    fn test_material_change_clears_charts() {
        let mut session = session();
        session.set_intensity(100);
        session.set_wavelength(200);
        assert!(session.charts().ke_vs_wavelength.points().count() > 0);

        session.set_material("platinum").unwrap();
        assert_eq!(session.charts().ke_vs_wavelength.points().count(), 0);
        assert_eq!(session.params().material(), TargetMaterial::Platinum);
        assert!(session.set_material("unobtainium").is_err());
    }

    #[test]
    fn test_below_threshold_halts_spawning() {
        let mut session = session();
        session.set_intensity(100);
        assert!(session.simulator().is_spawning());
        session.select_material(TargetMaterial::Platinum);
        session.set_wavelength(600);
        assert_eq!(session.readout().kinetic_energy_ev, 0.0);
        assert!(!session.simulator().is_spawning());
    }

    #[test]
    fn test_advance_runs_fixed_ticks() {
        let mut session = session();
        assert_eq!(session.advance(0.0), 0);
        assert_eq!(session.advance(0.035), 3);
        assert_eq!(session.simulator().current_tick(), 3);
        // Large stalls are capped
        assert_eq!(session.advance(5.0), 10);
        assert_eq!(session.advance(0.0), 0, "backlog dropped");
    }

    #[test]
    fn test_arrivals_feed_ke_tracker() {
        let mut session = session();
        session.set_intensity(100);
        let mut arrivals = 0;
        for _ in 0..1000 {
            arrivals += session.tick().len();
        }
        assert!(arrivals > 0);
        assert!(!session.ke_tracker().is_empty());

        // KE tracker values are speed², bounded by the model KE
        let ke = session.readout().kinetic_energy_ev;
        for point in session.ke_tracker().points() {
            assert!(point.value <= ke + 1e-4);
            assert!(point.time <= 10.0);
        }
    }

    #[test]
    fn test_reset_restores_initial_parameters() {
        let mut session = session();
        session.set_intensity(70);
        session.set_wavelength(420);
        for _ in 0..50 {
            session.tick();
        }
        session.reset().unwrap();
        assert_eq!(session.params().wavelength_nm(), 100);
        assert!(session.simulator().live_electrons().is_empty());
        assert!(session.ke_tracker().is_empty());
    }

    #[test]
    fn test_reset_records_initial_samples_like_startup() {
        let fresh = session();
        let mut session = session();
        session.set_intensity(70);
        session.set_wavelength(420);
        session.reset().unwrap();

        assert_eq!(session.charts().ke_vs_wavelength.points().count(), 1);
        assert_eq!(session.charts().current_vs_wavelength.points().count(), 1);
        assert_eq!(
            session.charts().ke_vs_wavelength.points().collect::<Vec<_>>(),
            fresh.charts().ke_vs_wavelength.points().collect::<Vec<_>>()
        );
        assert!(session.readout().noisy_sample.is_some());
        assert_eq!(session.oscilloscope_trace(), fresh.oscilloscope_trace());
    }

    #[test]
    fn test_off_step_wavelength_draws_no_noise() {
        let mut direct = session();
        direct.set_intensity(60);
        direct.set_wavelength(360);

        let mut detour = session();
        detour.set_intensity(60);
        detour.set_wavelength(355);
        assert_eq!(
            detour.charts().current_vs_wavelength.points().count(),
            direct.charts().current_vs_wavelength.points().count() - 1
        );
        detour.set_wavelength(360);

        assert_eq!(detour.readout().noisy_sample, direct.readout().noisy_sample);
    }
}
