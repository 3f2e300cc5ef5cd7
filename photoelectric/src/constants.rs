//! Physical constants (SI, CODATA 2018 exact values)

/// Planck constant (J·s)
pub const H: f64 = 6.626_070_15e-34;

/// Speed of light in vacuum (m/s)
pub const C: f64 = 299_792_458.0;

/// Elementary charge (C)
pub const E: f64 = 1.602_176_634e-19;

/// Boltzmann constant (J/K)
pub const K_B: f64 = 1.380_649e-23;

/// Temperature of the emitter surface (K)
pub const ROOM_TEMPERATURE: f64 = 300.0;

/// Nanometres to metres
pub const NM: f64 = 1e-9;
