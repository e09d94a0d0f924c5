//! Stratum builds the device model for a one-dimensional drift-diffusion simulation
//!
//! # Overview
//! A device stack is described by a handful of per-layer physical constants:
//! band energies, a density of states, a doping-determining Fermi level,
//! mobilities, recombination parameters. The transport solver wants none of
//! these directly; it wants a non-uniform spatial mesh refined where the
//! physics is stiff (layer interfaces, space-charge regions) and one dense
//! array per quantity, index-aligned with that mesh and linearly graded
//! across interface regions instead of discontinuous. This crate performs
//! exactly that conversion, together with the equilibrium electronic
//! structure derived from the constants: carrier densities, built-in
//! voltage, depletion widths and trap occupancies.
//!
//! Construction is all-or-nothing. The constants are validated before any
//! derived quantity is reachable: a doping density at or above the density
//! of states, or an active-layer trap level outside the band gap, fails with
//! a [`error::ValidationError`], and an inconsistent mesh or geometry
//! specification fails with a [`error::ConfigError`] before any partial
//! artifact exists.
//!
//! # Usage
//! A device is described in a TOML file with one table per layer:
//!
//! ```toml
//! temperature = 300.0
//! anode_workfunction = -5.1
//! cathode_workfunction = -4.1
//! interface_width = 2e-7
//! active_layer = 1
//!
//! [[layers]]
//! thickness = 100e-7
//! electron_affinity = -3.8
//! ionisation_potential = -5.4
//! density_of_states = 1e19
//! equilibrium_fermi_level = -5.1
//! # ..mobilities, dielectric constant, recombination parameters
//! ```
//!
//! where additional layers are appended with subsequent `layers` tables,
//! the `N - 1` boundaries carry `interfaces` tables with their own trap
//! constants, and a `[mesh]` table selects the meshing strategy. The
//! pipeline entry point is [`device::build_device`].

#![warn(missing_docs)]
#![allow(clippy::type_complexity)]

/// The dense per-mesh-point device arrays and region classification
pub mod arrays;

/// Physical constants
pub mod constants;

/// Device description, validated parameter set and derived quantities
pub mod device;

/// Error handling
pub mod error;

/// The mesh-generation contract between the parameter set and the mesher
pub mod mesh;

/// Equilibrium carrier statistics
pub mod statistics;
