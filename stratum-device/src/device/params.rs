//! The authoritative collection of per-layer physical constants
//!
//! A `ParameterSet` is only obtainable through [`ParameterSet::build`], which
//! checks every physical-consistency invariant before an instance becomes
//! reachable. Derived quantities (band gaps, built-in voltage, equilibrium
//! and boundary densities, depletion widths) are recomputed from the current
//! constants on every call and never cached, so they can never go stale with
//! respect to the constants they derive from.

use super::Device;
use crate::constants::EPSILON_0;
use crate::error::{as_f64, ConfigError, DeviceError, ValidationError};
use crate::statistics::{equilibrium_electron_density, equilibrium_hole_density};
use nalgebra::RealField;

/// Struct holding all the material information necessary to build the device
///
/// Per-layer constants are stored one `Vec` per quantity, index-aligned with
/// the layer stack; per-interface constants are aligned with the `N - 1`
/// boundaries of an `N`-layer stack. After construction nothing outside this
/// module mutates the constants; the only write path is the re-validating
/// mutators below.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet<T: RealField> {
    pub(crate) thicknesses: Vec<T>,
    pub(crate) electron_affinities: Vec<T>,
    pub(crate) ionisation_potentials: Vec<T>,
    pub(crate) densities_of_states: Vec<T>,
    pub(crate) equilibrium_fermi_levels: Vec<T>,
    pub(crate) electron_mobilities: Vec<T>,
    pub(crate) hole_mobilities: Vec<T>,
    pub(crate) ion_mobilities: Vec<T>,
    pub(crate) dielectric_constants: Vec<T>,
    pub(crate) ion_densities: Vec<T>,
    pub(crate) ion_densities_of_states: Vec<T>,
    pub(crate) radiative_coefficients: Vec<T>,
    pub(crate) trap_energies: Vec<T>,
    pub(crate) electron_lifetimes: Vec<T>,
    pub(crate) hole_lifetimes: Vec<T>,
    pub(crate) interface_trap_energies: Vec<T>,
    pub(crate) interface_electron_lifetimes: Vec<T>,
    pub(crate) interface_hole_lifetimes: Vec<T>,
    pub(crate) interface_width: T,
    pub(crate) anode_workfunction: T,
    pub(crate) cathode_workfunction: T,
    pub(crate) temperature: T,
    pub(crate) active_layer: usize,
}

/// Carrier densities at the two contacts
///
/// Evaluated at the electrode workfunction rather than the adjacent layer's
/// internal equilibrium level; this is the quantity which couples the
/// interior density to the chosen boundary-condition type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryDensities<T> {
    pub anode_electron: T,
    pub anode_hole: T,
    pub cathode_electron: T,
    pub cathode_hole: T,
}

impl<T: Copy + RealField> ParameterSet<T> {
    /// Builds a validated parameter set from a raw device description
    ///
    /// Shape inconsistencies (interface count, active-layer index) raise
    /// `ConfigError`; physical inconsistencies raise `ValidationError`. A
    /// half-validated instance is never exposed.
    pub fn build(device: &Device<T>) -> Result<Self, DeviceError> {
        let layers = device.layers.len();
        if layers == 0 {
            return Err(ConfigError::NoLayers.into());
        }
        if device.interfaces.len() != layers - 1 {
            return Err(ConfigError::LayerInterfaceMismatch {
                layers,
                interfaces: device.interfaces.len(),
            }
            .into());
        }
        if device.active_layer >= layers {
            return Err(ConfigError::ActiveLayerOutOfRange {
                active: device.active_layer,
                layers,
            }
            .into());
        }

        let params = Self::assemble(device);
        params.validate()?;
        tracing::info!(
            layers,
            active_layer = params.active_layer,
            "validated parameter set"
        );
        Ok(params)
    }

    fn assemble(device: &Device<T>) -> Self {
        let mut params = Self {
            thicknesses: Vec::new(),
            electron_affinities: Vec::new(),
            ionisation_potentials: Vec::new(),
            densities_of_states: Vec::new(),
            equilibrium_fermi_levels: Vec::new(),
            electron_mobilities: Vec::new(),
            hole_mobilities: Vec::new(),
            ion_mobilities: Vec::new(),
            dielectric_constants: Vec::new(),
            ion_densities: Vec::new(),
            ion_densities_of_states: Vec::new(),
            radiative_coefficients: Vec::new(),
            trap_energies: Vec::new(),
            electron_lifetimes: Vec::new(),
            hole_lifetimes: Vec::new(),
            interface_trap_energies: Vec::new(),
            interface_electron_lifetimes: Vec::new(),
            interface_hole_lifetimes: Vec::new(),
            interface_width: device.interface_width,
            anode_workfunction: device.anode_workfunction,
            cathode_workfunction: device.cathode_workfunction,
            temperature: device.temperature,
            active_layer: device.active_layer,
        };
        for layer in device.layers.iter() {
            params.thicknesses.push(layer.thickness);
            params.electron_affinities.push(layer.electron_affinity);
            params.ionisation_potentials.push(layer.ionisation_potential);
            params.densities_of_states.push(layer.density_of_states);
            params
                .equilibrium_fermi_levels
                .push(layer.equilibrium_fermi_level);
            params.electron_mobilities.push(layer.electron_mobility);
            params.hole_mobilities.push(layer.hole_mobility);
            params.ion_mobilities.push(layer.ion_mobility);
            params.dielectric_constants.push(layer.dielectric_constant);
            params.ion_densities.push(layer.ion_density);
            params
                .ion_densities_of_states
                .push(layer.ion_density_of_states);
            params
                .radiative_coefficients
                .push(layer.radiative_coefficient);
            params.trap_energies.push(layer.trap_energy);
            params.electron_lifetimes.push(layer.electron_lifetime);
            params.hole_lifetimes.push(layer.hole_lifetime);
        }
        for interface in device.interfaces.iter() {
            params.interface_trap_energies.push(interface.trap_energy);
            params
                .interface_electron_lifetimes
                .push(interface.electron_lifetime);
            params.interface_hole_lifetimes.push(interface.hole_lifetime);
        }
        params
    }

    /// Checks every physical-consistency invariant against the current
    /// constants
    ///
    /// The doping rule is strict: a derived doping density equal to the
    /// density of states is already an error, because it corresponds to a
    /// Fermi level pinned at (or beyond) a band edge.
    fn validate(&self) -> Result<(), DeviceError> {
        for layer in 0..self.num_layers() {
            let dos = self.densities_of_states[layer];
            let donor = self.donor_density(layer)?;
            if donor >= dos {
                return Err(ValidationError::DonorDopingExceedsDensityOfStates {
                    layer,
                    fermi_level: as_f64(self.equilibrium_fermi_levels[layer]),
                    band_edge: as_f64(self.electron_affinities[layer]),
                    doping: as_f64(donor),
                    dos: as_f64(dos),
                }
                .into());
            }
            let acceptor = self.acceptor_density(layer)?;
            if acceptor >= dos {
                return Err(ValidationError::AcceptorDopingExceedsDensityOfStates {
                    layer,
                    fermi_level: as_f64(self.equilibrium_fermi_levels[layer]),
                    band_edge: as_f64(self.ionisation_potentials[layer]),
                    doping: as_f64(acceptor),
                    dos: as_f64(dos),
                }
                .into());
            }
        }

        // Only the active layer's bulk trap level is constrained to the gap.
        // Interface trap energies are deliberately left unchecked to match
        // the established behaviour of the model.
        let layer = self.active_layer;
        let trap_energy = self.trap_energies[layer];
        let electron_affinity = self.electron_affinities[layer];
        let ionisation_potential = self.ionisation_potentials[layer];
        if trap_energy <= ionisation_potential || trap_energy >= electron_affinity {
            return Err(ValidationError::TrapEnergyOutsideGap {
                layer,
                trap_energy: as_f64(trap_energy),
                ionisation_potential: as_f64(ionisation_potential),
                electron_affinity: as_f64(electron_affinity),
            }
            .into());
        }
        Ok(())
    }

    pub fn num_layers(&self) -> usize {
        self.thicknesses.len()
    }

    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    pub fn temperature(&self) -> T {
        self.temperature
    }

    pub fn interface_width(&self) -> T {
        self.interface_width
    }

    /// Band gap of `layer`: electron affinity minus ionisation potential
    pub fn band_gap(&self, layer: usize) -> T {
        self.electron_affinities[layer] - self.ionisation_potentials[layer]
    }

    /// Built-in voltage: the workfunction difference between the electrodes
    pub fn built_in_voltage(&self) -> T {
        self.cathode_workfunction - self.anode_workfunction
    }

    /// Equilibrium electron density of `layer` at its own Fermi level
    pub fn equilibrium_electron_density(&self, layer: usize) -> Result<T, DeviceError> {
        equilibrium_electron_density(
            self.densities_of_states[layer],
            self.electron_affinities[layer],
            self.equilibrium_fermi_levels[layer],
            self.temperature,
        )
        .map_err(DeviceError::from)
    }

    /// Equilibrium hole density of `layer` at its own Fermi level
    pub fn equilibrium_hole_density(&self, layer: usize) -> Result<T, DeviceError> {
        equilibrium_hole_density(
            self.densities_of_states[layer],
            self.ionisation_potentials[layer],
            self.equilibrium_fermi_levels[layer],
            self.temperature,
        )
        .map_err(DeviceError::from)
    }

    /// Net donor density of `layer`, derived from the Fermi level position
    pub fn donor_density(&self, layer: usize) -> Result<T, DeviceError> {
        self.equilibrium_electron_density(layer)
    }

    /// Net acceptor density of `layer`, derived from the Fermi level position
    pub fn acceptor_density(&self, layer: usize) -> Result<T, DeviceError> {
        self.equilibrium_hole_density(layer)
    }

    /// Carrier densities at the contacts, evaluated at the electrode
    /// workfunctions in the outermost layers
    pub fn boundary_densities(&self) -> Result<BoundaryDensities<T>, DeviceError> {
        let last = self.num_layers() - 1;
        Ok(BoundaryDensities {
            anode_electron: equilibrium_electron_density(
                self.densities_of_states[0],
                self.electron_affinities[0],
                self.anode_workfunction,
                self.temperature,
            )?,
            anode_hole: equilibrium_hole_density(
                self.densities_of_states[0],
                self.ionisation_potentials[0],
                self.anode_workfunction,
                self.temperature,
            )?,
            cathode_electron: equilibrium_electron_density(
                self.densities_of_states[last],
                self.electron_affinities[last],
                self.cathode_workfunction,
                self.temperature,
            )?,
            cathode_hole: equilibrium_hole_density(
                self.densities_of_states[last],
                self.ionisation_potentials[last],
                self.cathode_workfunction,
                self.temperature,
            )?,
        })
    }

    /// Intrinsic Fermi level of `layer`, mid-gap for a common density of
    /// states in both bands
    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    pub fn intrinsic_level(&self, layer: usize) -> T {
        0.5 * (self.electron_affinities[layer] + self.ionisation_potentials[layer])
    }

    /// Intrinsic carrier density of `layer`
    pub fn intrinsic_density(&self, layer: usize) -> Result<T, DeviceError> {
        equilibrium_electron_density(
            self.densities_of_states[layer],
            self.electron_affinities[layer],
            self.intrinsic_level(layer),
            self.temperature,
        )
        .map_err(DeviceError::from)
    }

    /// One-sided depletion widths `(wp, wn)` either side of the active layer
    ///
    /// Both widths use the active layer's net doping and dielectric constant
    /// in the one-sided depletion-approximation closed form. An undoped
    /// active layer has no space-charge refinement to resolve; the widths
    /// degrade to zero with a warning rather than diverging.
    #[numeric_literals::replace_float_literals(T::from_f64(literal).unwrap())]
    pub fn depletion_widths(&self) -> Result<(T, T), DeviceError> {
        let layer = self.active_layer;
        let net_doping = (self.donor_density(layer)? - self.acceptor_density(layer)?).abs();
        if net_doping <= T::zero() {
            tracing::warn!(
                layer,
                "active layer has zero net doping, depletion widths degrade to zero"
            );
            return Ok((T::zero(), T::zero()));
        }
        let epsilon = self.dielectric_constants[layer] * T::from_f64(EPSILON_0).unwrap();
        let width = (2.0 * epsilon * self.built_in_voltage().abs() / net_doping).sqrt();
        Ok((width, width))
    }

    /// Total space-charge-region width: `wp + active thickness + wn`
    pub fn total_scr_width(&self) -> Result<T, DeviceError> {
        let (wp, wn) = self.depletion_widths()?;
        Ok(wp + self.thicknesses[self.active_layer] + wn)
    }

    /// Running sum of layer thicknesses, length `N + 1`, starting at zero
    pub fn cumulative_thickness(&self) -> Vec<T> {
        let mut cumulative = Vec::with_capacity(self.num_layers() + 1);
        let mut total = T::zero();
        cumulative.push(total);
        for &thickness in self.thicknesses.iter() {
            total += thickness;
            cumulative.push(total);
        }
        cumulative
    }

    pub fn total_thickness(&self) -> T {
        self.thicknesses
            .iter()
            .fold(T::zero(), |acc, &thickness| acc + thickness)
    }

    fn check_layer(&self, layer: usize) -> Result<(), ConfigError> {
        if layer >= self.num_layers() {
            return Err(ConfigError::LayerOutOfRange {
                layer,
                layers: self.num_layers(),
            });
        }
        Ok(())
    }

    /// Moves the equilibrium Fermi level of `layer`, re-running the doping
    /// validation; on failure the previous value is retained
    pub fn set_equilibrium_fermi_level(&mut self, layer: usize, value: T) -> Result<(), DeviceError> {
        self.check_layer(layer)?;
        let previous = std::mem::replace(&mut self.equilibrium_fermi_levels[layer], value);
        if let Err(error) = self.validate() {
            self.equilibrium_fermi_levels[layer] = previous;
            return Err(error);
        }
        Ok(())
    }

    /// Replaces the density of states of `layer`, re-running the doping
    /// validation; on failure the previous value is retained
    pub fn set_density_of_states(&mut self, layer: usize, value: T) -> Result<(), DeviceError> {
        self.check_layer(layer)?;
        let previous = std::mem::replace(&mut self.densities_of_states[layer], value);
        if let Err(error) = self.validate() {
            self.densities_of_states[layer] = previous;
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::ParameterSet;
    use crate::constants::BOLTZMANN;
    use crate::device::{Device, Interface, Layer};
    use crate::error::{ConfigError, DeviceError, ValidationError};
    use crate::mesh::MeshConfiguration;
    use approx::assert_relative_eq;

    pub(crate) fn layer(thickness: f64, fermi_level: f64) -> Layer<f64> {
        Layer {
            thickness,
            electron_affinity: -3.8,
            ionisation_potential: -5.4,
            density_of_states: 1e19,
            equilibrium_fermi_level: fermi_level,
            electron_mobility: 1.0,
            hole_mobility: 1.0,
            ion_mobility: 1e-10,
            dielectric_constant: 7.0,
            ion_density: 1e17,
            ion_density_of_states: 1.21e22,
            radiative_coefficient: 3.6e-12,
            trap_energy: -4.6,
            electron_lifetime: 1e-7,
            hole_lifetime: 1e-7,
        }
    }

    pub(crate) fn two_layer_device() -> Device<f64> {
        Device {
            temperature: 300.0,
            anode_workfunction: -5.1,
            cathode_workfunction: -4.1,
            interface_width: 2e-7,
            active_layer: 1,
            layers: vec![layer(100e-7, -5.1), layer(50e-7, -4.1)],
            interfaces: vec![Interface {
                trap_energy: -4.7,
                electron_lifetime: 1e-9,
                hole_lifetime: 1e-9,
            }],
            mesh: MeshConfiguration {
                mesh_type: 2,
                layer_points: vec![100, 50],
                interface_points: 20,
                space_charge_points: 20,
            },
        }
    }

    #[test]
    fn valid_constants_build_and_derived_quantities_are_finite() {
        let params = ParameterSet::build(&two_layer_device()).unwrap();

        assert_relative_eq!(params.band_gap(0), 1.6);
        assert_relative_eq!(params.built_in_voltage(), 1.0);

        for layer in 0..params.num_layers() {
            assert!(params.equilibrium_electron_density(layer).unwrap().is_finite());
            assert!(params.equilibrium_hole_density(layer).unwrap().is_finite());
            assert!(params.intrinsic_density(layer).unwrap() > 0.0);
        }
        let (wp, wn) = params.depletion_widths().unwrap();
        assert!(wp.is_finite() && wn.is_finite());
        assert_relative_eq!(params.total_scr_width().unwrap(), wp + 50e-7 + wn);

        let boundary = params.boundary_densities().unwrap();
        let thermal = BOLTZMANN * 300.0;
        assert_relative_eq!(
            boundary.anode_electron,
            1e19 * ((-5.1 - -3.8) / thermal).exp(),
            max_relative = 1e-12
        );
        assert!(boundary.cathode_hole > 0.0);
    }

    #[test]
    fn cumulative_thickness_is_a_running_sum() {
        let params = ParameterSet::build(&two_layer_device()).unwrap();
        let cumulative = params.cumulative_thickness();
        assert_eq!(cumulative.len(), 3);
        assert_relative_eq!(cumulative[0], 0.0);
        assert_relative_eq!(cumulative[1], 100e-7);
        assert_relative_eq!(cumulative[2], 150e-7);
        assert_relative_eq!(params.total_thickness(), 150e-7);
    }

    #[test]
    fn fermi_level_pinned_at_a_band_edge_is_rejected() {
        let mut device = two_layer_device();
        // Doping density equals the density of states when the Fermi level
        // sits exactly on the electron affinity
        device.layers[1].equilibrium_fermi_level = -3.8;
        let result = ParameterSet::build(&device);
        assert!(matches!(
            result,
            Err(DeviceError::Validation(
                ValidationError::DonorDopingExceedsDensityOfStates { layer: 1, .. }
            ))
        ));
    }

    #[test]
    fn fermi_level_below_the_ionisation_potential_is_rejected() {
        let mut device = two_layer_device();
        device.layers[0].equilibrium_fermi_level = -5.5;
        let result = ParameterSet::build(&device);
        assert!(matches!(
            result,
            Err(DeviceError::Validation(
                ValidationError::AcceptorDopingExceedsDensityOfStates { layer: 0, .. }
            ))
        ));
    }

    #[test]
    fn trap_energy_outside_the_active_layer_gap_is_rejected() {
        let mut device = two_layer_device();
        device.layers[1].trap_energy = -3.7;
        let result = ParameterSet::build(&device);
        assert!(matches!(
            result,
            Err(DeviceError::Validation(
                ValidationError::TrapEnergyOutsideGap { layer: 1, .. }
            ))
        ));

        // The same energy in a non-active layer is accepted: only the active
        // layer's bulk trap is constrained
        let mut device = two_layer_device();
        device.layers[0].trap_energy = -3.7;
        assert!(ParameterSet::build(&device).is_ok());
    }

    #[test]
    fn shape_inconsistencies_are_config_errors() {
        let mut device = two_layer_device();
        device.interfaces.clear();
        assert!(matches!(
            ParameterSet::build(&device),
            Err(DeviceError::Config(ConfigError::LayerInterfaceMismatch {
                layers: 2,
                interfaces: 0,
            }))
        ));

        let mut device = two_layer_device();
        device.active_layer = 2;
        assert!(matches!(
            ParameterSet::build(&device),
            Err(DeviceError::Config(ConfigError::ActiveLayerOutOfRange {
                active: 2,
                layers: 2,
            }))
        ));
    }

    #[test]
    fn failed_mutation_retains_the_previous_value() {
        let mut params = ParameterSet::build(&two_layer_device()).unwrap();
        let previous = params.equilibrium_fermi_levels[0];

        assert!(params.set_equilibrium_fermi_level(0, -3.8).is_err());
        assert_relative_eq!(params.equilibrium_fermi_levels[0], previous);

        // A valid move is accepted
        assert!(params.set_equilibrium_fermi_level(0, -5.0).is_ok());
        assert_relative_eq!(params.equilibrium_fermi_levels[0], -5.0);
    }

    #[test]
    fn failed_density_of_states_mutation_rolls_back() {
        let mut params = ParameterSet::build(&two_layer_device()).unwrap();
        // A non-positive density of states fails revalidation in the
        // statistics functions and the write is rolled back
        assert!(params.set_density_of_states(0, -1.0).is_err());
        assert_relative_eq!(params.densities_of_states[0], 1e19);
    }
}
