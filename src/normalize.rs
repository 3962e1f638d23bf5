use bevy::prelude::*;

use crate::cloud::PointCloud;


/// Largest dimension of a normalized cloud.
pub const TARGET_DIAMETER: f32 = 4.0;


#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct NormalizeOptions {
    /// Mirror Y as well, for sources exported upside down.
    pub mirror_y: bool,
}


/// Centers and scales loaded clouds to a common size.
///
/// Single models are fit uniformly. Sequence frames are first stretched per
/// axis onto the bounding box of the first frame seen since the last
/// [`Normalizer::reset_canonical`], so every frame of a sequence shares bounds.
/// Both modes mirror Z.
#[derive(Debug, Default, Resource)]
pub struct Normalizer {
    canonical_size: Option<Vec3>,
}

impl Normalizer {
    pub fn canonical_size(&self) -> Option<Vec3> {
        self.canonical_size
    }

    pub fn reset_canonical(&mut self) {
        self.canonical_size = None;
    }

    pub fn fit_model(
        &self,
        cloud: &PointCloud,
        options: NormalizeOptions,
    ) -> PointCloud {
        let Some((center, size)) = center_and_size(cloud) else {
            return cloud.clone();
        };

        let max_dimension = size.max_element();
        let scale = if max_dimension > 0.0 {
            TARGET_DIAMETER / max_dimension
        } else {
            1.0
        };

        debug!(
            "normalizing {:.2} x {:.2} x {:.2} by {:.3}",
            size.x,
            size.y,
            size.z,
            scale
        );

        let mirror = Vec3::new(
            1.0,
            if options.mirror_y { -1.0 } else { 1.0 },
            -1.0,
        );

        cloud.map_positions(|position| (position - center) * scale * mirror)
    }

    pub fn fit_sequence_frame(&mut self, cloud: &PointCloud) -> PointCloud {
        let Some((center, size)) = center_and_size(cloud) else {
            return cloud.clone();
        };

        let canonical = *self.canonical_size.get_or_insert(size);

        let axis_scale = |canonical: f32, current: f32| {
            if canonical > 0.0 && current > 0.0 {
                canonical / current
            } else {
                1.0
            }
        };

        let canonical_max = canonical.max_element();
        let uniform = if canonical_max > 0.0 {
            TARGET_DIAMETER / canonical_max
        } else {
            1.0
        };

        let scale = Vec3::new(
            axis_scale(canonical.x, size.x),
            axis_scale(canonical.y, size.y),
            axis_scale(canonical.z, size.z),
        ) * uniform;
        let mirror = Vec3::new(1.0, 1.0, -1.0);

        cloud.map_positions(|position| (position - center) * scale * mirror)
    }
}


fn center_and_size(cloud: &PointCloud) -> Option<(Vec3, Vec3)> {
    let aabb = cloud.compute_aabb()?;
    let min = Vec3::from(aabb.min);
    let max = Vec3::from(aabb.max);

    Some(((min + max) * 0.5, max - min))
}
