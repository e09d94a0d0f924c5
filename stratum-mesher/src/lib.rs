//! One-dimensional line-segment meshes for layered device stacks
//!
//! A device stack is a sequence of piecewise homogeneous regions along the
//! growth axis. The solver wants a single strictly increasing coordinate
//! sequence spanning the whole stack, with the freedom to place more points
//! in some regions than others. This crate provides the mesh storage type
//! [`Mesh1d`] and the piecewise-uniform generation routines which build one
//! from a list of [`MeshRegion`] specifications.

mod connectivity;
mod error;
mod generate;
mod mesh;

pub use connectivity::*;
pub use error::*;
pub use generate::*;
pub use mesh::*;

use nalgebra::RealField;

/// The read-only contract a finite-difference solver needs from a mesh
pub trait FiniteDifferenceMesh<T>
where
    T: RealField,
{
    fn number_of_nodes(&self) -> usize;
    fn get_positions(&self) -> Vec<T>;
    fn get_connectivity(&self) -> Vec<&[usize]>;
}

impl<T> FiniteDifferenceMesh<T> for Mesh1d<T>
where
    T: Copy + RealField,
{
    fn number_of_nodes(&self) -> usize {
        self.num_nodes()
    }
    fn get_positions(&self) -> Vec<T> {
        self.positions()
    }
    fn get_connectivity(&self) -> Vec<&[usize]> {
        self.connectivity()
    }
}
