/// Vertex-to-vertex connectivity for a vertex in a 1D line-segment mesh
///
/// Interior vertices see both neighbours, the two contact vertices see one.
#[derive(Debug)]
pub enum Segment1dConnectivity {
    Core([usize; 2]),
    Boundary([usize; 1]),
}

pub trait Connectivity {
    fn as_inner(&self) -> &[usize];
}

impl Connectivity for Segment1dConnectivity {
    fn as_inner(&self) -> &[usize] {
        match self {
            Segment1dConnectivity::Core(x) => x,
            Segment1dConnectivity::Boundary(x) => x,
        }
    }
}

impl Segment1dConnectivity {
    /// Builds the connectivity list for a chain of `num_vertices` vertices
    pub(crate) fn for_vertex_chain(num_vertices: usize) -> Vec<Segment1dConnectivity> {
        let mut cells = Vec::with_capacity(num_vertices);
        if num_vertices < 2 {
            return cells;
        }
        cells.push(Segment1dConnectivity::Boundary([1]));
        for i in 1..num_vertices - 1 {
            cells.push(Segment1dConnectivity::Core([i - 1, i + 1]));
        }
        cells.push(Segment1dConnectivity::Boundary([num_vertices - 2]));
        cells
    }
}
