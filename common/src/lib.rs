//! Common utilities for the photoelectric simulation
//!
//! This crate provides the window and GPU bootstrap, the 2D camera and the
//! coloured vertex type shared by the apparatus renderer.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
