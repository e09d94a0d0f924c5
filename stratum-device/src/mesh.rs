//! The mesh-generation contract between the parameter set and the mesher
//!
//! The mesher itself only understands contiguous `(width, cells)` regions;
//! this module owns the mapping from validated device geometry to those
//! regions. Three strategies are supported, selected by the numeric
//! `mesh_type` of the configuration:
//!
//! 1. uniform spacing across the whole stack (valid but atypical, since it
//!    ignores all refinement data)
//! 2. piecewise-uniform, one region per layer
//! 3. piecewise-uniform with extra point density inside the interfacial
//!    half-width windows and the space-charge windows either side of the
//!    active layer
//!
//! Any other selector, and any refinement specification which does not fit
//! inside its host layer, is a `ConfigError` raised before a mesh exists.

use crate::device::ParameterSet;
use crate::error::{ConfigError, DeviceError};
use itertools::Itertools;
use nalgebra::{RealField, Vector1};
use serde::Deserialize;
use stratum_mesher::{create_line_segment_mesh_1d_from_regions, Mesh1d, MeshRegion};

/// Mesh strategy selector and per-region point counts
#[derive(Debug, Clone, Deserialize)]
pub struct MeshConfiguration {
    pub mesh_type: u8,
    /// Cells placed across the bulk of each layer, index-aligned with the
    /// layer stack
    pub layer_points: Vec<usize>,
    /// Cells placed across each interfacial half-width window
    pub interface_points: usize,
    /// Cells placed across each space-charge window
    pub space_charge_points: usize,
}

/// Generates the spatial mesh for a validated parameter set
///
/// The output is strictly increasing, starts at zero and ends at the total
/// device thickness; it is generated once and immutable afterwards.
pub fn generate_mesh<T: Copy + RealField>(
    params: &ParameterSet<T>,
    config: &MeshConfiguration,
) -> Result<Mesh1d<T>, DeviceError> {
    if config.layer_points.len() != params.num_layers() {
        return Err(ConfigError::PointCountMismatch {
            layers: params.num_layers(),
            points: config.layer_points.len(),
        }
        .into());
    }

    let regions = match config.mesh_type {
        1 => {
            tracing::warn!(
                "uniform mesh selected, interface and space-charge refinement data are ignored"
            );
            vec![MeshRegion::new(
                params.total_thickness(),
                config.layer_points.iter().sum(),
            )]
        }
        2 => layered_regions(params, config),
        3 => refined_regions(params, config)?,
        mesh_type => return Err(ConfigError::UnsupportedMeshType { mesh_type }.into()),
    };

    let mesh = create_line_segment_mesh_1d_from_regions(&regions, &Vector1::new(T::zero()))
        .map_err(ConfigError::from)?;
    tracing::info!(
        mesh_type = config.mesh_type,
        nodes = mesh.num_nodes(),
        "generated spatial mesh"
    );
    Ok(mesh)
}

fn layered_regions<T: Copy + RealField>(
    params: &ParameterSet<T>,
    config: &MeshConfiguration,
) -> Vec<MeshRegion<T>> {
    params
        .thicknesses
        .iter()
        .zip(config.layer_points.iter())
        .map(|(&width, &cells)| MeshRegion::new(width, cells))
        .collect()
}

#[derive(Clone, Copy, PartialEq)]
enum Window {
    Bulk,
    Interface,
    SpaceCharge,
}

/// Splits every layer into bulk, interface and space-charge sub-segments
///
/// Interface windows extend one half-width either side of each interior
/// boundary; space-charge windows extend `wp` into the layer before the
/// active layer and `wn` into the layer after it. Where a space-charge
/// window reaches past an interface window only the part outside it forms a
/// separate sub-segment; a window which has swallowed its whole host layer
/// shows up as a non-increasing cut sequence and is rejected.
fn refined_regions<T: Copy + RealField>(
    params: &ParameterSet<T>,
    config: &MeshConfiguration,
) -> Result<Vec<MeshRegion<T>>, DeviceError> {
    let boundaries = params.cumulative_thickness();
    let half_width = params.interface_width();
    let (wp, wn) = params.depletion_widths()?;
    let active = params.active_layer();
    let num_layers = params.num_layers();

    let mut regions = Vec::new();
    for layer in 0..num_layers {
        let start = boundaries[layer];
        let end = boundaries[layer + 1];
        let thickness = end - start;
        let graded_left = layer > 0 && half_width > T::zero();
        let graded_right = layer + 1 < num_layers && half_width > T::zero();

        // Cuts are (end position, kind of the sub-segment ending there)
        let mut cuts: Vec<(T, Window)> = Vec::new();
        if graded_left {
            cuts.push((start + half_width, Window::Interface));
        }
        if layer == active + 1 && wn > half_width {
            cuts.push((start + wn, Window::SpaceCharge));
        }
        if active > 0 && layer == active - 1 && wp > half_width {
            cuts.push((end - wp, Window::Bulk));
            cuts.push((end - half_width, Window::SpaceCharge));
            cuts.push((end, Window::Interface));
        } else if graded_right {
            cuts.push((end - half_width, Window::Bulk));
            cuts.push((end, Window::Interface));
        } else {
            cuts.push((end, Window::Bulk));
        }

        for (&(left, _), &(right, _)) in std::iter::once(&(start, Window::Bulk))
            .chain(cuts.iter())
            .tuple_windows()
        {
            if right <= left {
                return Err(ConfigError::RegionOverlap { layer }.into());
            }
        }

        let mut cursor = start;
        for (position, window) in cuts {
            let width = position - cursor;
            let cells = match window {
                Window::Interface => config.interface_points,
                Window::SpaceCharge => config.space_charge_points,
                Window::Bulk => bulk_cells(config.layer_points[layer], width, thickness),
            };
            regions.push(MeshRegion::new(width, cells));
            cursor = position;
        }
    }
    Ok(regions)
}

/// A bulk sub-segment receives its layer's point count scaled by the share
/// of the layer it covers, never dropping below a single cell
fn bulk_cells<T: Copy + RealField>(layer_points: usize, width: T, thickness: T) -> usize {
    let share = crate::error::as_f64(width / thickness);
    ((layer_points as f64 * share).round() as usize).max(1)
}
