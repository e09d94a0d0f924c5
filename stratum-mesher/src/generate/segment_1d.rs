use crate::connectivity::Segment1dConnectivity;
use crate::error::MeshError;
use crate::mesh::Mesh1d;
use nalgebra::{Point1, RealField, Vector1};

/// One piecewise-uniform block of the mesh: a physical width and the number
/// of equal cells to place across it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshRegion<T> {
    pub width: T,
    pub cells: usize,
}

impl<T> MeshRegion<T> {
    pub fn new(width: T, cells: usize) -> Self {
        Self { width, cells }
    }
}

/// Creates a uniform mesh of `cells` equal cells across `width`, starting at
/// `left`
pub fn create_line_segment_mesh_1d<T>(width: T, cells: usize, left: &Vector1<T>) -> Mesh1d<T>
where
    T: Copy + RealField,
{
    if cells == 0 {
        return Mesh1d::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }
    let num_vertices = cells + 1;
    let cell_size = width / T::from_usize(cells).expect("Must be able to fit usize in T");

    let mut vertices = Vec::with_capacity(num_vertices);
    for i in 0..num_vertices {
        let i_as_t = T::from_usize(i).expect("Must be able to fit usize in T");
        let v = left + Vector1::new(i_as_t) * cell_size;
        vertices.push(Point1::from(v));
    }

    let cells = Segment1dConnectivity::for_vertex_chain(vertices.len());
    Mesh1d::from_vertices_and_connectivity(vertices, cells)
}

/// Creates a piecewise-uniform mesh from a list of contiguous regions
///
/// Region `k` spans `[left + w_0 + .. + w_{k-1}, left + w_0 + .. + w_k]` and
/// is divided into `cells_k` equal cells. The right-hand vertex of each
/// region coincides with the left-hand vertex of its successor; the shared
/// vertex appears once in the output, so the result is strictly increasing
/// whenever every width is positive (which is checked).
pub fn create_line_segment_mesh_1d_from_regions<T>(
    regions: &[MeshRegion<T>],
    left: &Vector1<T>,
) -> Result<Mesh1d<T>, MeshError>
where
    T: Copy + RealField,
{
    if regions.is_empty() {
        return Err(MeshError::EmptyRegionList);
    }
    for (index, region) in regions.iter().enumerate() {
        if region.width <= T::zero() {
            return Err(MeshError::NonPositiveWidth { index });
        }
        if region.cells == 0 {
            return Err(MeshError::ZeroCells { index });
        }
    }

    let mut left = *left;
    let mut meshes = vec![];
    for region in regions {
        meshes.push(create_line_segment_mesh_1d(
            region.width,
            region.cells,
            &left,
        ));
        left += Vector1::new(region.width);
    }

    Ok(Mesh1d::dedup(meshes))
}

impl<T> Mesh1d<T>
where
    T: Copy + RealField,
{
    /// Concatenates block meshes, eliminating the duplicated join vertices
    fn dedup(meshes: Vec<Mesh1d<T>>) -> Mesh1d<T> {
        let mut vertices: Vec<Point1<T>> = meshes
            .into_iter()
            .flat_map(|x| x.vertices_owned())
            .collect();
        // Join vertices can differ by a rounding error between the end of one
        // block and the start of the next, so an exact dedup is not enough
        let epsilon = vertices
            .last()
            .map(|x| x.x.abs() * T::default_epsilon() * T::from_usize(64).unwrap())
            .unwrap_or_else(T::default_epsilon);
        vertices.dedup_by(|a, b| (a.x - b.x).abs() <= epsilon);

        let cells = Segment1dConnectivity::for_vertex_chain(vertices.len());
        Mesh1d::from_vertices_and_connectivity(vertices, cells)
    }
}

#[cfg(test)]
mod test {
    use super::{create_line_segment_mesh_1d_from_regions, MeshRegion};
    use crate::error::MeshError;

    #[test]
    fn mesh_from_regions_eliminates_repeated_vertices() {
        let left = nalgebra::Vector1::new(0f64);
        let regions = [
            MeshRegion::new(2e-7, 10),
            MeshRegion::new(96e-7, 40),
            MeshRegion::new(4e-7, 20),
            MeshRegion::new(46e-7, 25),
        ];
        let mesh = create_line_segment_mesh_1d_from_regions(&regions, &left).unwrap();

        assert_eq!(mesh.num_nodes(), 10 + 40 + 20 + 25 + 1);
        let delta: Vec<f64> = mesh
            .vertices()
            .windows(2)
            .map(|vertices| vertices[1].x - vertices[0].x)
            .collect();
        assert!(delta.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn mesh_from_regions_spans_the_total_width() {
        let left = nalgebra::Vector1::new(0f64);
        let regions = [MeshRegion::new(100e-7, 50), MeshRegion::new(50e-7, 25)];
        let mesh = create_line_segment_mesh_1d_from_regions(&regions, &left).unwrap();

        assert_eq!(mesh.vertices().first().unwrap().x, 0.0);
        let total: f64 = regions.iter().map(|r| r.width).sum();
        let extent = mesh.extent().unwrap();
        assert!((extent - total).abs() < 1e-12 * total);
    }

    #[test]
    fn a_generated_mesh_satisfies_the_finite_difference_contract() {
        use crate::FiniteDifferenceMesh;

        let left = nalgebra::Vector1::new(0f64);
        let regions = [MeshRegion::new(100e-7, 10)];
        let mesh = create_line_segment_mesh_1d_from_regions(&regions, &left).unwrap();

        assert_eq!(mesh.number_of_nodes(), 11);
        assert_eq!(mesh.get_positions(), mesh.positions());
        let connectivity = mesh.get_connectivity();
        assert_eq!(connectivity.len(), 11);
        assert_eq!(connectivity[0], [1]);
        assert_eq!(connectivity[5], [4, 6]);
        assert_eq!(connectivity[10], [9]);
    }

    #[test]
    fn degenerate_regions_are_rejected() {
        let left = nalgebra::Vector1::new(0f64);
        let regions = [MeshRegion::new(100e-7, 50), MeshRegion::new(0.0, 25)];
        let result = create_line_segment_mesh_1d_from_regions(&regions, &left);
        assert!(matches!(
            result,
            Err(MeshError::NonPositiveWidth { index: 1 })
        ));

        let regions = [MeshRegion::new(100e-7, 0)];
        let result = create_line_segment_mesh_1d_from_regions(&regions, &left);
        assert!(matches!(result, Err(MeshError::ZeroCells { index: 0 })));
    }
}
