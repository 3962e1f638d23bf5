use rand::{
    Rng,
    seq::index,
};

use crate::cloud::{
    PointCloud,
    WHITE,
};

pub mod render_set;
pub mod resampler;

pub use render_set::{
    DirtyAttributes,
    RenderSet,
};
pub use resampler::{
    CloudTransform,
    ResampleError,
    ResampleOptions,
    ResampleOutcome,
    Resampler,
};


pub const MIN_EVAPORATION_FACTOR: f32 = 0.2;
pub const MAX_EVAPORATION_FACTOR: f32 = 1.0;


/// Number of points kept when sampling `original_count` points at `rate`.
///
/// Never zero, so an empty or degenerate source still yields one point.
pub fn target_count(original_count: usize, rate: f64) -> usize {
    let rate = rate.clamp(0.0, 1.0);
    let scaled = (original_count as f64 * rate).floor() as usize;

    scaled.clamp(1, original_count.max(1))
}

/// Source index for output slot `index` of a uniform stride sample:
/// `min(original_count - 1, floor(index * original_count / target_count))`.
///
/// The last slot lands within one stride of the end of the source.
pub fn stride_source_index(
    original_count: usize,
    target_count: usize,
    index: usize,
) -> usize {
    if original_count == 0 || target_count == 0 {
        return 0;
    }

    let source = (index as u128 * original_count as u128) / target_count as u128;

    (source as usize).min(original_count - 1)
}


#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrideSample {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl StrideSample {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub fn stride_sample(cloud: &PointCloud, target_count: usize) -> StrideSample {
    let target_count = target_count.max(1);
    let original_count = cloud.len();

    if original_count == 0 {
        return StrideSample {
            positions: vec![[0.0; 3]; target_count],
            colors: vec![WHITE; target_count],
        };
    }

    let mut positions = Vec::with_capacity(target_count);
    let mut colors = Vec::with_capacity(target_count);

    for i in 0..target_count {
        let source = stride_source_index(original_count, target_count, i);

        positions.push(cloud.position(source));
        colors.push(cloud.color(source));
    }

    StrideSample {
        positions,
        colors,
    }
}


/// Per-point evaporation factors for a freshly allocated render set.
///
/// `floor(count * amount)` distinct points get a factor in
/// [`MIN_EVAPORATION_FACTOR`, `MAX_EVAPORATION_FACTOR`], the rest stay at zero.
pub fn evaporation_factors<R: Rng + ?Sized>(
    count: usize,
    amount: f32,
    rng: &mut R,
) -> Vec<f32> {
    let mut factors = vec![0.0; count];

    let amount = if amount.is_finite() {
        amount.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let evaporating = ((count as f32 * amount).floor() as usize).min(count);

    if evaporating == 0 {
        return factors;
    }

    for index in index::sample(rng, count, evaporating).iter() {
        factors[index] = rng.gen_range(MIN_EVAPORATION_FACTOR..=MAX_EVAPORATION_FACTOR);
    }

    factors
}
