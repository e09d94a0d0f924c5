//! Controls the deserialization and storage of the top-level device
//! description, and the validated `ParameterSet` which yields all the
//! material information necessary to run the simulation

/// The validated parameter set and its derived equilibrium quantities
pub mod params;
/// The deserialization and storage of the raw `Device` description
pub(crate) mod reader;

pub use params::{BoundaryDensities, ParameterSet};
pub use reader::{Device, Interface, Layer};

use crate::arrays::DeviceArrays;
use crate::error::DeviceError;
use crate::mesh::generate_mesh;
use nalgebra::RealField;
use stratum_mesher::Mesh1d;

/// Runs the full parameter-to-device-array pipeline
///
/// Validates the description, generates the spatial mesh from the validated
/// geometry and populates the per-mesh-point arrays. The returned triple is
/// the complete artifact the transport solver consumes; if any stage fails
/// nothing is returned.
pub fn build_device<T: Copy + RealField>(
    device: &Device<T>,
) -> Result<(ParameterSet<T>, Mesh1d<T>, DeviceArrays<T>), DeviceError> {
    let params = ParameterSet::build(device)?;
    let mesh = generate_mesh(&params, &device.mesh)?;
    let arrays = DeviceArrays::build(&params, &mesh)?;
    Ok((params, mesh, arrays))
}
