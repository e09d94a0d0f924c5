//! # Constants
//!
//! Defines physical constants used in the simulation
//!
//! The device model works in the conventional units of thin-film device
//! physics: lengths in cm, energies in eV measured down from the vacuum
//! level, densities in cm^-3.

pub const BOLTZMANN: f64 = 8.617330350e-5; // The Boltzmann constant in eV / K
pub const EPSILON_0: f64 = 552_434.0; // Permitivitty of free space in e V^-1 cm^-1
