//! Builds the dense per-mesh-point device arrays
//!
//! Every physical quantity the transport solver needs is expanded from its
//! per-layer constant into one array index-aligned with the spatial mesh.
//! Each mesh point is first assigned a [`Region`] tag in a dedicated
//! classification pass; population then dispatches on the tag, which keeps
//! the exhaustiveness and mutual-exclusivity of the region arithmetic in one
//! place. Inside an interface window every quantity is linearly graded
//! between the adjoining layers' values instead of jumping discontinuously;
//! trap constants inside a window come from the interface's own description.

use crate::device::ParameterSet;
use crate::error::{as_f64, ConfigError, DeviceError};
use crate::statistics::{equilibrium_electron_density, equilibrium_hole_density};
use nalgebra::{DVector, RealField};
use stratum_mesher::Mesh1d;

/// The region a mesh point belongs to
///
/// `Bulk(i)` is the interior of layer `i`, at least one interfacial
/// half-width from every interior boundary; `Interface(i)` is the graded
/// window around the boundary between layers `i` and `i + 1`. Every mesh
/// point belongs to exactly one variant; a point on the edge of a window is
/// bulk by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Bulk(usize),
    Interface(usize),
}

/// Assigns a single region tag to `position`
///
/// `boundaries` is the cumulative-thickness sequence `d_0 = 0 < .. < d_N`.
/// Membership in two interface windows, or in no layer at all, means the
/// interfacial half-width is inconsistent with the layer geometry and is a
/// `ConfigError`.
pub fn classify<T: Copy + RealField>(
    position: T,
    boundaries: &[T],
    half_width: T,
) -> Result<Region, ConfigError> {
    let num_layers = boundaries.len() - 1;

    let mut interface = None;
    for boundary in 1..num_layers {
        if (position - boundaries[boundary]).abs() < half_width {
            if interface.is_some() {
                return Err(ConfigError::UnclassifiablePoint {
                    position: as_f64(position),
                });
            }
            interface = Some(Region::Interface(boundary - 1));
        }
    }
    if let Some(region) = interface {
        return Ok(region);
    }

    for layer in 0..num_layers {
        if position >= boundaries[layer] && position <= boundaries[layer + 1] {
            return Ok(Region::Bulk(layer));
        }
    }

    // The mesher accumulates widths independently of the parameter set, so
    // the far contact can overshoot the final boundary by a rounding error
    let total = boundaries[num_layers];
    let tolerance = total.abs() * T::default_epsilon() * T::from_usize(64).unwrap();
    if (position - total).abs() <= tolerance {
        return Ok(Region::Bulk(num_layers - 1));
    }
    if (position - boundaries[0]).abs() <= tolerance {
        return Ok(Region::Bulk(0));
    }
    Err(ConfigError::UnclassifiablePoint {
        position: as_f64(position),
    })
}

/// One dense array per physical quantity, index-aligned with the mesh
///
/// Built once from a validated parameter set and an immutable mesh, then
/// handed to the solver read-only; a parameter change requires a full
/// rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceArrays<T: RealField> {
    pub electron_affinity: DVector<T>,
    pub ionisation_potential: DVector<T>,
    pub density_of_states: DVector<T>,
    pub donor_density: DVector<T>,
    pub acceptor_density: DVector<T>,
    pub intrinsic_density: DVector<T>,
    pub electron_mobility: DVector<T>,
    pub hole_mobility: DVector<T>,
    pub ion_mobility: DVector<T>,
    pub dielectric_constant: DVector<T>,
    pub ion_density: DVector<T>,
    pub ion_density_of_states: DVector<T>,
    pub radiative_coefficient: DVector<T>,
    pub trap_energy: DVector<T>,
    pub electron_lifetime: DVector<T>,
    pub hole_lifetime: DVector<T>,
    /// Trap-level electron occupancy, filled from the statistics functions
    pub trap_electron_occupancy: DVector<T>,
    /// Trap-level hole occupancy, filled from the statistics functions
    pub trap_hole_occupancy: DVector<T>,
    pub grad_electron_affinity: DVector<T>,
    pub grad_ionisation_potential: DVector<T>,
    pub grad_density_of_states: DVector<T>,
}

impl<T: Copy + RealField> DeviceArrays<T> {
    /// Populates every quantity's array over the mesh
    ///
    /// Fails before returning anything if a point cannot be classified or a
    /// statistics evaluation leaves its domain; a partially populated table
    /// is never exposed.
    pub fn build(params: &ParameterSet<T>, mesh: &Mesh1d<T>) -> Result<Self, DeviceError> {
        let positions = mesh.positions();
        let boundaries = params.cumulative_thickness();
        let half_width = params.interface_width();

        let regions = positions
            .iter()
            .map(|&position| classify(position, &boundaries, half_width))
            .collect::<Result<Vec<_>, _>>()?;

        // Doping and intrinsic densities are per-layer derived quantities;
        // evaluate them once per layer rather than once per point
        let mut donors = Vec::with_capacity(params.num_layers());
        let mut acceptors = Vec::with_capacity(params.num_layers());
        let mut intrinsics = Vec::with_capacity(params.num_layers());
        for layer in 0..params.num_layers() {
            donors.push(params.donor_density(layer)?);
            acceptors.push(params.acceptor_density(layer)?);
            intrinsics.push(params.intrinsic_density(layer)?);
        }

        let mut arrays = Self::zeros(positions.len());
        let two_half_widths = half_width + half_width;

        for (index, (&position, region)) in positions.iter().zip(regions.iter()).enumerate() {
            match *region {
                Region::Bulk(layer) => {
                    arrays.electron_affinity[index] = params.electron_affinities[layer];
                    arrays.ionisation_potential[index] = params.ionisation_potentials[layer];
                    arrays.density_of_states[index] = params.densities_of_states[layer];
                    arrays.donor_density[index] = donors[layer];
                    arrays.acceptor_density[index] = acceptors[layer];
                    arrays.intrinsic_density[index] = intrinsics[layer];
                    arrays.electron_mobility[index] = params.electron_mobilities[layer];
                    arrays.hole_mobility[index] = params.hole_mobilities[layer];
                    arrays.ion_mobility[index] = params.ion_mobilities[layer];
                    arrays.dielectric_constant[index] = params.dielectric_constants[layer];
                    arrays.ion_density[index] = params.ion_densities[layer];
                    arrays.ion_density_of_states[index] = params.ion_densities_of_states[layer];
                    arrays.radiative_coefficient[index] = params.radiative_coefficients[layer];
                    arrays.trap_energy[index] = params.trap_energies[layer];
                    arrays.electron_lifetime[index] = params.electron_lifetimes[layer];
                    arrays.hole_lifetime[index] = params.hole_lifetimes[layer];
                    // Gradient quantities are identically zero in the bulk
                }
                Region::Interface(left) => {
                    let right = left + 1;
                    let window_start = boundaries[left + 1] - half_width;
                    let offset = (position - window_start) / two_half_widths;
                    let lerp = |a: T, b: T| a + (b - a) * offset;
                    let slope = |a: T, b: T| (b - a) / two_half_widths;

                    arrays.electron_affinity[index] = lerp(
                        params.electron_affinities[left],
                        params.electron_affinities[right],
                    );
                    arrays.ionisation_potential[index] = lerp(
                        params.ionisation_potentials[left],
                        params.ionisation_potentials[right],
                    );
                    arrays.density_of_states[index] = lerp(
                        params.densities_of_states[left],
                        params.densities_of_states[right],
                    );
                    arrays.donor_density[index] = lerp(donors[left], donors[right]);
                    arrays.acceptor_density[index] = lerp(acceptors[left], acceptors[right]);
                    arrays.intrinsic_density[index] = lerp(intrinsics[left], intrinsics[right]);
                    arrays.electron_mobility[index] = lerp(
                        params.electron_mobilities[left],
                        params.electron_mobilities[right],
                    );
                    arrays.hole_mobility[index] =
                        lerp(params.hole_mobilities[left], params.hole_mobilities[right]);
                    arrays.ion_mobility[index] =
                        lerp(params.ion_mobilities[left], params.ion_mobilities[right]);
                    arrays.dielectric_constant[index] = lerp(
                        params.dielectric_constants[left],
                        params.dielectric_constants[right],
                    );
                    arrays.ion_density[index] =
                        lerp(params.ion_densities[left], params.ion_densities[right]);
                    arrays.ion_density_of_states[index] = lerp(
                        params.ion_densities_of_states[left],
                        params.ion_densities_of_states[right],
                    );
                    arrays.radiative_coefficient[index] = lerp(
                        params.radiative_coefficients[left],
                        params.radiative_coefficients[right],
                    );
                    // The graded region carries its own trap constants
                    arrays.trap_energy[index] = params.interface_trap_energies[left];
                    arrays.electron_lifetime[index] = params.interface_electron_lifetimes[left];
                    arrays.hole_lifetime[index] = params.interface_hole_lifetimes[left];

                    arrays.grad_electron_affinity[index] = slope(
                        params.electron_affinities[left],
                        params.electron_affinities[right],
                    );
                    arrays.grad_ionisation_potential[index] = slope(
                        params.ionisation_potentials[left],
                        params.ionisation_potentials[right],
                    );
                    arrays.grad_density_of_states[index] = slope(
                        params.densities_of_states[left],
                        params.densities_of_states[right],
                    );
                }
            }
        }

        // Trap occupancies over the whole mesh, from each point's local
        // density of states, band edges and trap energy
        for index in 0..positions.len() {
            arrays.trap_electron_occupancy[index] = equilibrium_electron_density(
                arrays.density_of_states[index],
                arrays.electron_affinity[index],
                arrays.trap_energy[index],
                params.temperature(),
            )?;
            arrays.trap_hole_occupancy[index] = equilibrium_hole_density(
                arrays.density_of_states[index],
                arrays.ionisation_potential[index],
                arrays.trap_energy[index],
                params.temperature(),
            )?;
        }

        tracing::info!(nodes = positions.len(), "built device arrays");
        Ok(arrays)
    }

    pub fn num_points(&self) -> usize {
        self.electron_affinity.len()
    }

    fn zeros(num_points: usize) -> Self {
        let zeros = || DVector::from_element(num_points, T::zero());
        Self {
            electron_affinity: zeros(),
            ionisation_potential: zeros(),
            density_of_states: zeros(),
            donor_density: zeros(),
            acceptor_density: zeros(),
            intrinsic_density: zeros(),
            electron_mobility: zeros(),
            hole_mobility: zeros(),
            ion_mobility: zeros(),
            dielectric_constant: zeros(),
            ion_density: zeros(),
            ion_density_of_states: zeros(),
            radiative_coefficient: zeros(),
            trap_energy: zeros(),
            electron_lifetime: zeros(),
            hole_lifetime: zeros(),
            trap_electron_occupancy: zeros(),
            trap_hole_occupancy: zeros(),
            grad_electron_affinity: zeros(),
            grad_ionisation_potential: zeros(),
            grad_density_of_states: zeros(),
        }
    }
}
