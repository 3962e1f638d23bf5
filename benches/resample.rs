use criterion::{
    BenchmarkId,
    criterion_group,
    criterion_main,
    Criterion,
    Throughput,
};

use bevy_pointcloud_player::{
    Resampler,
    cloud::random_point_cloud,
    resample::{
        ResampleOptions,
        stride_sample,
        target_count,
    },
};


const POINT_COUNTS: [usize; 3] = [
    10_000,
    250_000,
    1_000_000,
];

fn stride_sample_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stride sample point clouds");
    for count in POINT_COUNTS.iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(
            BenchmarkId::new("stride_sample", count),
            &count,
            |b, &count| {
                let cloud = random_point_cloud(*count);
                let target = target_count(cloud.len(), 0.2);

                b.iter(|| stride_sample(&cloud, target));
            },
        );
    }
}

fn morph_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("morph point clouds");
    for count in POINT_COUNTS.iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(
            BenchmarkId::new("tick", count),
            &count,
            |b, &count| {
                let options = ResampleOptions::default();

                let mut resampler = Resampler::seeded(0);
                resampler.set_original(random_point_cloud(*count));
                let _ = resampler.resample(1.0, &options, 0.0);
                resampler.set_original(random_point_cloud(*count));

                b.iter(|| {
                    let _ = resampler.resample(1.0, &options, 0.0);
                    resampler.tick(0.03)
                });
            },
        );
    }
}

criterion_group!{
    name = resample_benches;
    config = Criterion::default().sample_size(10);
    targets = stride_sample_benchmark, morph_tick_benchmark
}
criterion_main!(resample_benches);
