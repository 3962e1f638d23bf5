use bevy::{
    prelude::*,
    asset::RenderAssetUsages,
    render::mesh::PrimitiveTopology,
};

use bevy_pointcloud_player::{
    PointCloud,
    cloud::WHITE,
    io::extract::point_cloud_from_mesh,
    render::{
        ATTRIBUTE_EVAPORATION_FACTOR,
        build_point_mesh,
    },
    resample::{
        ResampleOptions,
        Resampler,
    },
};


fn point_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}


#[test]
fn test_extract_positions_and_rgba_colors() {
    let mut mesh = point_mesh(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_COLOR,
        vec![[1.0, 0.0, 0.0, 0.5], [0.0, 1.0, 0.0, 1.0]],
    );

    let cloud = point_cloud_from_mesh(&mesh).unwrap();

    assert_eq!(cloud.positions(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(cloud.colors(), &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
}

#[test]
fn test_extract_without_colors() {
    let mesh = point_mesh(vec![[0.0; 3]; 3]);
    let cloud = point_cloud_from_mesh(&mesh).unwrap();

    assert_eq!(cloud.colors(), &[WHITE; 3]);
}

#[test]
fn test_extract_without_points() {
    let empty = point_mesh(Vec::new());
    assert!(point_cloud_from_mesh(&empty).is_none());

    let bare = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    assert!(point_cloud_from_mesh(&bare).is_none());
}

#[test]
fn test_build_point_mesh_attributes() {
    let mut resampler = Resampler::seeded(11);
    resampler.set_original(PointCloud::new(vec![[1.0, 1.0, 1.0]; 100], None));
    resampler.resample(1.0, &ResampleOptions::default(), 0.0).unwrap();

    let render_set = resampler.render_set().unwrap();
    let mesh = build_point_mesh(render_set);

    assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
    assert_eq!(mesh.count_vertices(), 100);
    assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
    assert_eq!(
        mesh.attribute(ATTRIBUTE_EVAPORATION_FACTOR).map(|values| values.len()),
        Some(100),
    );

    let roundtrip = point_cloud_from_mesh(&mesh).unwrap();
    assert_eq!(roundtrip.positions(), render_set.positions());
    assert_eq!(roundtrip.colors(), render_set.colors());
}
