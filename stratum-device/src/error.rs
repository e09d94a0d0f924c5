//! # Error
//!
//! The error taxonomy of the device-model layer
//!
//! Three families cover every failure: `ValidationError` for physical
//! constants which are mutually inconsistent, `ConfigError` for geometry or
//! mesh specifications the pipeline cannot honour, and `DomainError` for
//! arguments outside the domain of the carrier-statistics functions. All are
//! fatal and deterministic in the inputs, so there is no retry path.

use miette::Diagnostic;

/// Error payloads are reported in `f64` regardless of the field type of the
/// parameter set which raised them
pub(crate) fn as_f64<T: nalgebra::RealField>(value: T) -> f64 {
    nalgebra::try_convert(value).unwrap_or(f64::NAN)
}

/// Top-level error for the parameter-to-device-array pipeline
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DeviceError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),
    #[error("failed to deserialize the device description: {0}")]
    #[diagnostic(code(stratum::device::description))]
    Description(#[from] config::ConfigError),
}

/// Physically inconsistent layer constants
///
/// Raised at construction, or by a mutator of a doping-adjacent field; the
/// offending write is rolled back, these are never downgraded to warnings.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ValidationError {
    #[error(
        "layer {layer}: equilibrium Fermi level {fermi_level} eV is at or above the electron \
         affinity {band_edge} eV, the derived donor density {doping:e} cm^-3 reaches the \
         density of states {dos:e} cm^-3"
    )]
    #[diagnostic(code(stratum::validation::donor_doping))]
    DonorDopingExceedsDensityOfStates {
        layer: usize,
        fermi_level: f64,
        band_edge: f64,
        doping: f64,
        dos: f64,
    },
    #[error(
        "layer {layer}: equilibrium Fermi level {fermi_level} eV is at or below the ionisation \
         potential {band_edge} eV, the derived acceptor density {doping:e} cm^-3 reaches the \
         density of states {dos:e} cm^-3"
    )]
    #[diagnostic(code(stratum::validation::acceptor_doping))]
    AcceptorDopingExceedsDensityOfStates {
        layer: usize,
        fermi_level: f64,
        band_edge: f64,
        doping: f64,
        dos: f64,
    },
    #[error(
        "bulk trap energy {trap_energy} eV of active layer {layer} must lie strictly inside \
         the band gap ({ionisation_potential} eV, {electron_affinity} eV)"
    )]
    #[diagnostic(code(stratum::validation::trap_energy))]
    TrapEnergyOutsideGap {
        layer: usize,
        trap_energy: f64,
        ionisation_potential: f64,
        electron_affinity: f64,
    },
}

/// Geometry or mesh specifications the pipeline cannot honour
///
/// Raised before any mesh or device array is returned; a partial artifact is
/// never exposed.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("mesh type {mesh_type} is not one of the supported strategies (1, 2 or 3)")]
    #[diagnostic(code(stratum::config::mesh_type))]
    UnsupportedMeshType { mesh_type: u8 },
    #[error(
        "refinement regions overlap inside layer {layer}: the interface and space-charge \
         widths exceed the available layer thickness"
    )]
    #[diagnostic(code(stratum::config::region_overlap))]
    RegionOverlap { layer: usize },
    #[error(
        "mesh point at {position} cm cannot be assigned to exactly one bulk or interface \
         region, the interface half-width is inconsistent with the layer geometry"
    )]
    #[diagnostic(code(stratum::config::unclassifiable_point))]
    UnclassifiablePoint { position: f64 },
    #[error("{layers} layers require {} interface descriptions, found {interfaces}", .layers - 1)]
    #[diagnostic(code(stratum::config::interface_count))]
    LayerInterfaceMismatch { layers: usize, interfaces: usize },
    #[error("a device needs at least one layer")]
    #[diagnostic(code(stratum::config::no_layers))]
    NoLayers,
    #[error("active layer index {active} is out of range for a stack of {layers} layers")]
    #[diagnostic(code(stratum::config::active_layer))]
    ActiveLayerOutOfRange { active: usize, layers: usize },
    #[error("layer index {layer} is out of range for a stack of {layers} layers")]
    #[diagnostic(code(stratum::config::layer_index))]
    LayerOutOfRange { layer: usize, layers: usize },
    #[error("{layers} layers require {layers} per-layer point counts, found {points}")]
    #[diagnostic(code(stratum::config::point_counts))]
    PointCountMismatch { layers: usize, points: usize },
    #[error("mesh generation failed: {0}")]
    #[diagnostic(code(stratum::config::mesh_generation))]
    Mesh(#[from] stratum_mesher::MeshError),
}

/// Arguments outside the domain of the carrier-statistics functions
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("density of states must be positive, got {dos:e} cm^-3")]
    #[diagnostic(code(stratum::domain::density_of_states))]
    NonPositiveDensityOfStates { dos: f64 },
    #[error("absolute temperature must be positive, got {temperature} K")]
    #[diagnostic(code(stratum::domain::temperature))]
    NonPositiveTemperature { temperature: f64 },
}
