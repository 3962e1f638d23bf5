use bevy::render::mesh::{
    Mesh,
    VertexAttributeValues,
};

use crate::cloud::PointCloud;


/// Point payload of a decoded mesh: its POSITION attribute plus COLOR_0 with
/// alpha dropped. Returns `None` when the mesh carries no points.
pub fn point_cloud_from_mesh(mesh: &Mesh) -> Option<PointCloud> {
    let positions = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(VertexAttributeValues::as_float3)?
        .to_vec();

    if positions.is_empty() {
        return None;
    }

    let colors = match mesh.attribute(Mesh::ATTRIBUTE_COLOR) {
        Some(VertexAttributeValues::Float32x4(colors)) => {
            Some(colors.iter().map(|[r, g, b, _]| [*r, *g, *b]).collect())
        },
        Some(VertexAttributeValues::Float32x3(colors)) => Some(colors.clone()),
        _ => None,
    };

    Some(PointCloud::new(positions, colors))
}
