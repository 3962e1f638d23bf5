use bevy::prelude::*;

use bevy_pointcloud_player::{
    PointCloud,
    Resampler,
    ViewerSettings,
    cloud::FALLBACK_POINT_COUNT,
    io::{
        ingest_fallback,
        ingest_point_cloud,
    },
};


fn line_cloud(count: usize) -> PointCloud {
    let positions = (0..count)
        .map(|i| [i as f32, 0.0, 0.0])
        .collect();

    PointCloud::new(positions, None)
}


#[test]
fn test_fallback_twice_allocates_new_render_set() {
    let settings = ViewerSettings::default();
    let mut resampler = Resampler::seeded(0);

    ingest_fallback(&mut resampler, &settings, 0.0);
    assert_eq!(resampler.render_set().unwrap().generation(), 0);

    ingest_fallback(&mut resampler, &settings, 1.0);

    let render_set = resampler.render_set().unwrap();
    assert_eq!(render_set.generation(), 1);
    assert_eq!(render_set.len(), FALLBACK_POINT_COUNT / 5);
    assert!(!resampler.is_morphing());
}

#[test]
fn test_model_with_same_count_does_not_morph() {
    let settings = ViewerSettings::default();
    let mut resampler = Resampler::seeded(0);

    ingest_point_cloud(&mut resampler, &settings, line_cloud(1000), 0.0);
    resampler.set_position(1.0, 2.0, 3.0);
    resampler.set_flip(true);

    ingest_point_cloud(&mut resampler, &settings, line_cloud(1000), 1.0);

    let render_set = resampler.render_set().unwrap();
    assert_eq!(render_set.generation(), 1);
    assert_eq!(render_set.len(), 200);
    assert!(!resampler.is_morphing());

    assert_eq!(resampler.transform().translation, Vec3::new(1.0, 2.0, 3.0));
    assert!(resampler.transform().flipped);
}

#[test]
fn test_discard_render_set_keeps_original() {
    let settings = ViewerSettings::default();
    let mut resampler = Resampler::seeded(0);

    ingest_point_cloud(&mut resampler, &settings, line_cloud(10), 0.0);
    resampler.discard_render_set();

    assert!(resampler.render_set().is_none());
    assert_eq!(resampler.original().map(PointCloud::len), Some(10));
}
