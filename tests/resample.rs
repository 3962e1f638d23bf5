use rand::{
    SeedableRng,
    rngs::StdRng,
};

use bevy_pointcloud_player::{
    PointCloud,
    resample::{
        MAX_EVAPORATION_FACTOR,
        MIN_EVAPORATION_FACTOR,
        evaporation_factors,
        stride_sample,
        stride_source_index,
        target_count,
    },
};


fn line_cloud(count: usize) -> PointCloud {
    let positions = (0..count)
        .map(|i| [i as f32, 0.0, 0.0])
        .collect();
    let colors = (0..count)
        .map(|i| [i as f32 / count as f32, 0.0, 1.0])
        .collect();

    PointCloud::new(positions, Some(colors))
}


#[test]
fn test_target_count() {
    assert_eq!(target_count(1000, 0.2), 200);
    assert_eq!(target_count(1000, 1.0), 1000);
    assert_eq!(target_count(1000, 0.01), 10);
    assert_eq!(target_count(7, 0.5), 3);

    assert_eq!(target_count(3, 0.1), 1);
    assert_eq!(target_count(0, 0.5), 1);

    assert_eq!(target_count(100, 2.0), 100);
    assert_eq!(target_count(100, -1.0), 1);
}

#[test]
fn test_target_count_large_clouds() {
    assert_eq!(target_count(16_777_217, 1.0), 16_777_217);
    assert_eq!(target_count(20_000_001, 1.0), 20_000_001);
    assert_eq!(target_count(20_000_001, 0.5), 10_000_000);
    assert_eq!(target_count(50_000_000, 0.2), 10_000_000);
}

#[test]
fn test_stride_sample_is_deterministic() {
    let cloud = line_cloud(12_345);

    for rate in [0.01, 0.2, 0.33, 0.5, 1.0] {
        let target = target_count(cloud.len(), rate);

        let first = stride_sample(&cloud, target);
        let second = stride_sample(&cloud, target);

        assert_eq!(first.len(), target);
        assert_eq!(first, second);
    }
}

#[test]
fn test_stride_sample_reaches_tail() {
    for original in [1usize, 2, 3, 10, 999, 1000, 12_345] {
        for target in [1, 2, 3, 7, original] {
            let target = target.min(original);
            let stride = original.div_ceil(target);

            let max_source = (0..target)
                .map(|i| stride_source_index(original, target, i))
                .max()
                .unwrap();

            assert!(max_source < original);
            assert!(max_source + stride >= original);
        }

        assert_eq!(stride_source_index(original, original, original - 1), original - 1);
    }
}

#[test]
fn test_stride_source_index_formula() {
    assert_eq!(stride_source_index(10, 5, 4), 8);
    assert_eq!(stride_source_index(10, 3, 2), 6);
    assert_eq!(stride_source_index(1000, 10, 9), 900);
    assert_eq!(stride_source_index(5, 5, 4), 4);
}

#[test]
fn test_stride_source_index_is_monotonic() {
    let original = 1000;
    let target = 333;

    let indices = (0..target)
        .map(|i| stride_source_index(original, target, i))
        .collect::<Vec<_>>();

    assert_eq!(indices[0], 0);
    assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_stride_sample_full_rate_is_identity() {
    let cloud = line_cloud(100);
    let sample = stride_sample(&cloud, 100);

    assert_eq!(sample.positions, cloud.positions());
    assert_eq!(sample.colors, cloud.colors());
}

#[test]
fn test_stride_sample_keeps_color_correspondence() {
    let cloud = line_cloud(50);
    let sample = stride_sample(&cloud, 10);

    for (position, color) in sample.positions.iter().zip(sample.colors.iter()) {
        let source = position[0] as usize;
        assert_eq!(*color, cloud.color(source));
    }
}

#[test]
fn test_stride_sample_of_empty_cloud() {
    let cloud = PointCloud::default();
    let sample = stride_sample(&cloud, target_count(cloud.len(), 0.5));

    assert_eq!(sample.len(), 1);
    assert_eq!(sample.positions[0], [0.0, 0.0, 0.0]);
}

#[test]
fn test_evaporation_factor_count() {
    let mut rng = StdRng::seed_from_u64(42);
    let factors = evaporation_factors(1000, 0.01, &mut rng);

    assert_eq!(factors.len(), 1000);

    let evaporating = factors
        .iter()
        .filter(|factor| **factor != 0.0)
        .collect::<Vec<_>>();

    assert_eq!(evaporating.len(), 10);
    assert!(evaporating
        .iter()
        .all(|factor| (MIN_EVAPORATION_FACTOR..=MAX_EVAPORATION_FACTOR).contains(*factor)));
}

#[test]
fn test_evaporation_factor_degenerate_amounts() {
    let mut rng = StdRng::seed_from_u64(1);

    assert!(evaporation_factors(100, 0.0, &mut rng).iter().all(|f| *f == 0.0));
    assert!(evaporation_factors(100, f32::NAN, &mut rng).iter().all(|f| *f == 0.0));
    assert!(evaporation_factors(0, 0.5, &mut rng).is_empty());
}
