use std::f32::consts::PI;

use bevy::{
    prelude::*,
    math::bounding::Aabb3d,
};
use rand::Rng;


pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

pub const FALLBACK_POINT_COUNT: usize = 10_000;
pub const FALLBACK_RADIUS: f32 = 2.0;


/// Canonical point set of a loaded model or sequence frame.
///
/// Positions and colors share index correspondence; a source without colors
/// is padded with opaque white.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct PointCloud {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl PointCloud {
    pub fn new(
        positions: Vec<[f32; 3]>,
        colors: Option<Vec<[f32; 3]>>,
    ) -> Self {
        let colors = match colors {
            Some(colors) if colors.len() == positions.len() => colors,
            Some(colors) => {
                warn!(
                    positions = positions.len(),
                    colors = colors.len(),
                    "color count does not match position count, using white"
                );
                vec![WHITE; positions.len()]
            },
            None => vec![WHITE; positions.len()],
        };

        Self {
            positions,
            colors,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn position(&self, index: usize) -> [f32; 3] {
        self.positions[index]
    }

    pub fn color(&self, index: usize) -> [f32; 3] {
        self.colors[index]
    }

    pub fn compute_aabb(&self) -> Option<Aabb3d> {
        if self.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for position in self.positions.iter() {
            let position = Vec3::from(*position);
            min = min.min(position);
            max = max.max(position);
        }

        Some(Aabb3d { min: min.into(), max: max.into() })
    }

    /// Copy of this cloud with every position passed through `f`, colors untouched.
    pub fn map_positions(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self {
            positions: self.positions
                .iter()
                .map(|position| f(Vec3::from(*position)).to_array())
                .collect(),
            colors: self.colors.clone(),
        }
    }
}


/// Sphere of random points substituted when a model cannot be loaded.
pub fn fallback_sphere<R: Rng + ?Sized>(count: usize, rng: &mut R) -> PointCloud {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    for _ in 0..count {
        let theta = rng.gen_range(0.0..1.0) * PI * 2.0;
        let phi = (2.0 * rng.gen_range(0.0..1.0f32) - 1.0).acos();

        positions.push([
            FALLBACK_RADIUS * phi.sin() * theta.cos(),
            FALLBACK_RADIUS * phi.sin() * theta.sin(),
            FALLBACK_RADIUS * phi.cos(),
        ]);

        colors.push([
            theta.sin() * 0.5 + 0.5,
            phi.cos() * 0.5 + 0.5,
            (phi + theta).sin() * 0.5 + 0.5,
        ]);
    }

    PointCloud::new(positions, Some(colors))
}

pub fn random_point_cloud(count: usize) -> PointCloud {
    let mut rng = rand::thread_rng();
    fallback_sphere(count, &mut rng)
}
