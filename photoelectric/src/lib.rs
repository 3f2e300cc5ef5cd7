//! Photoelectric Effect Simulation
//!
//! Interactive model of light ejecting electrons from a metal plate:
//!
//! - **Physics model**: photoelectron kinetic energy and photocurrent from the
//!   work function and the Planck relation
//! - **Electron population**: throttled spawning, drift, collection and
//!   regeneration of simulated photoelectrons
//! - **Views**: sweep charts over wavelength/frequency, an oscilloscope trace
//!   of the incident wave and a rolling kinetic-energy tracker
//!
//! The [`session::Session`] ties these together and is what the binary drives.

pub mod constants;
pub mod error;
pub mod config;
pub mod materials;
pub mod params;
pub mod model;
pub mod simulator;
pub mod history;
pub mod sweep;
pub mod oscilloscope;
pub mod spectrum;
pub mod session;
pub mod apparatus;
pub mod renderer;
pub mod plots;
pub mod equations_ui;

pub use error::{PhotoError, Result};
pub use materials::TargetMaterial;
pub use model::PhotoelectricModel;
pub use params::SimulationParameters;
pub use session::Session;
pub use simulator::ElectronPopulationSimulator;
