use crate::error::DeviceError;
use crate::mesh::MeshConfiguration;
use config::{Config, File};
use nalgebra::RealField;
use serde::{de::DeserializeOwned, Deserialize};
use std::{ops::Deref, path::PathBuf};

/// The raw device description, as the configuration collaborator hands it over
///
/// This is the unvalidated input side of the pipeline: a stack of layers with
/// per-layer physical constants, the interface descriptions between them, the
/// ambient scalars and the mesh specification. The loading collaborator is
/// only responsible for populating these fields; every consistency rule lives
/// in [`crate::device::ParameterSet::build`].
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Device<T: RealField> {
    pub temperature: T,
    pub anode_workfunction: T,
    pub cathode_workfunction: T,
    /// Half-width of the graded region either side of each layer boundary
    pub interface_width: T,
    /// Index of the emissive layer, whose bulk trap level is validated and
    /// whose junctions set the space-charge refinement windows
    pub active_layer: usize,
    pub layers: Vec<Layer<T>>,
    pub interfaces: Vec<Interface<T>>,
    pub mesh: MeshConfiguration,
}

impl<T: DeserializeOwned + RealField> Deref for Device<T> {
    type Target = Vec<Layer<T>>;

    fn deref(&self) -> &Self::Target {
        &self.layers
    }
}

/// One piecewise homogeneous layer of the stack
///
/// Band energies are in eV measured down from vacuum, so the electron
/// affinity is the upper (less negative) band edge and the ionisation
/// potential the lower one.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Layer<T: RealField> {
    pub thickness: T,
    pub electron_affinity: T,
    pub ionisation_potential: T,
    pub density_of_states: T,
    /// Position of the Fermi level in equilibrium, which determines the
    /// derived donor and acceptor doping densities
    pub equilibrium_fermi_level: T,
    pub electron_mobility: T,
    pub hole_mobility: T,
    pub ion_mobility: T,
    pub dielectric_constant: T,
    pub ion_density: T,
    pub ion_density_of_states: T,
    pub radiative_coefficient: T,
    pub trap_energy: T,
    pub electron_lifetime: T,
    pub hole_lifetime: T,
}

/// Trap constants of the graded region between two adjacent layers
///
/// These are independent of the adjoining bulk layers: inside an interface
/// region the recombination parameters come from here, never from an
/// interpolation of the neighbours.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Interface<T: RealField> {
    pub trap_energy: T,
    pub electron_lifetime: T,
    pub hole_lifetime: T,
}

impl<T: DeserializeOwned + RealField> Device<T> {
    /// Deserializes a device description from a TOML file
    pub fn build(path: PathBuf) -> Result<Self, DeviceError> {
        let s = Config::builder().add_source(File::from(path)).build()?;
        s.try_deserialize().map_err(DeviceError::from)
    }
}
