use crate::{Connectivity, Segment1dConnectivity};
use nalgebra::{Point1, RealField};

/// A one-dimensional mesh over a line segment
///
/// Stores the vertex coordinates together with the vertex-to-vertex
/// connectivity. Vertices are strictly increasing along the segment; the
/// generation routines guarantee this and consumers may rely on it.
pub struct Mesh1d<T: RealField> {
    vertices: Vec<Point1<T>>,
    connectivity: Vec<Segment1dConnectivity>,
}

impl<T: RealField> Mesh1d<T> {
    pub fn num_nodes(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices_owned(self) -> Vec<Point1<T>> {
        self.vertices
    }

    pub fn vertices(&self) -> &[Point1<T>] {
        &self.vertices
    }

    pub fn connectivity(&self) -> Vec<&[usize]> {
        self.connectivity.iter().map(|x| x.as_inner()).collect()
    }

    pub fn from_vertices_and_connectivity(
        vertices: Vec<Point1<T>>,
        connectivity: Vec<Segment1dConnectivity>,
    ) -> Self {
        Self {
            vertices,
            connectivity,
        }
    }
}

impl<T: Copy + RealField> Mesh1d<T> {
    /// The bare coordinate sequence, in mesh order
    pub fn positions(&self) -> Vec<T> {
        self.vertices.iter().map(|vertex| vertex.x).collect()
    }

    /// Position of the final vertex, the far contact of the device
    pub fn extent(&self) -> Option<T> {
        self.vertices.last().map(|vertex| vertex.x)
    }
}
