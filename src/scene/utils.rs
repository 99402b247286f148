use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Analyzes the mesh's bounding box and transforms all vertices
/// so that the mesh is centered at (0,0,0) and fits within [-0.9, 0.9]³.
///
/// Returns the original center and the scaling factor used.
pub fn normalize_and_center_mesh(mesh: &mut Mesh) -> (Point3<f32>, f32) {
    let Some(first) = mesh.vertices().first() else {
        return (Point3::origin(), 1.0);
    };

    // 1. Calculate Bounding Box
    let (min_bound, max_bound) = mesh.vertices().iter().fold(
        (first.position, first.position),
        |(min, max), v| (min.inf(&v.position), max.sup(&v.position)),
    );

    // 2. Calculate Center and Size
    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_dimension = extent.x.max(extent.y).max(extent.z);

    // Scale to fit in [-1, 1] (size 2.0), with a little padding (1.8)
    let scale_factor = if max_dimension > 1e-6 {
        1.8 / max_dimension
    } else {
        1.0
    };

    // 3. Apply Transform to all vertices
    for vertex in mesh.vertices_mut() {
        let centered = vertex.position - center;
        vertex.position = Point3::from(centered * scale_factor);
    }

    (center, scale_factor)
}
