use std::f32::consts::PI;

use bevy::prelude::*;
use rand::{
    SeedableRng,
    rngs::StdRng,
};

use crate::{
    cloud::PointCloud,
    morph::{
        DEFAULT_MORPH_FPS,
        MorphState,
    },
    resample::{
        DirtyAttributes,
        RenderSet,
        evaporation_factors,
        stride_sample,
        target_count,
    },
};


pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 2.1, -3.0);


#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct ResampleOptions {
    pub morph_enabled: bool,
    /// Playback speed; one morph lasts one frame at this rate.
    pub playback_fps: f32,
    /// Share of points given an evaporation factor when a render set is allocated.
    pub evaporation_amount: f32,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            morph_enabled: true,
            playback_fps: DEFAULT_MORPH_FPS,
            evaporation_amount: 0.01,
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleOutcome {
    Created {
        generation: u64,
        point_count: usize,
    },
    Rebuilt {
        generation: u64,
        previous_count: usize,
        point_count: usize,
    },
    Morphing,
    Snapped,
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResampleError {
    NoOriginal,
    InvalidRate(f64),
}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::NoOriginal => write!(f, "no point cloud loaded"),
            ResampleError::InvalidRate(rate) => write!(f, "invalid sample rate {rate}"),
        }
    }
}

impl std::error::Error for ResampleError {}


/// Rigid placement of the drawable, kept across render set rebuilds.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct CloudTransform {
    pub translation: Vec3,
    pub scale: f32,
    pub base_rotation_x: f32,
    pub flipped: bool,
}

impl Default for CloudTransform {
    fn default() -> Self {
        Self {
            translation: DEFAULT_POSITION,
            scale: 1.0,
            base_rotation_x: 0.0,
            flipped: false,
        }
    }
}

impl CloudTransform {
    pub fn rotation_x(&self) -> f32 {
        self.base_rotation_x + if self.flipped { PI } else { 0.0 }
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.translation)
            .with_rotation(Quat::from_rotation_x(self.rotation_x()))
            .with_scale(Vec3::splat(self.scale))
    }
}


/// Owns the original cloud and the single live render set derived from it.
///
/// `resample` either allocates a render set (none yet, or the point count
/// changed) or rewrites the existing one in place, optionally as a timed
/// morph that `tick` advances once per frame.
#[derive(Resource)]
pub struct Resampler {
    original: Option<PointCloud>,
    render_set: Option<RenderSet>,
    morph: Option<MorphState>,
    transform: CloudTransform,
    next_generation: u64,
    rng: StdRng,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Resampler {
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            original: None,
            render_set: None,
            morph: None,
            transform: CloudTransform::default(),
            next_generation: 0,
            rng,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn original(&self) -> Option<&PointCloud> {
        self.original.as_ref()
    }

    pub fn render_set(&self) -> Option<&RenderSet> {
        self.render_set.as_ref()
    }

    pub fn morph(&self) -> Option<&MorphState> {
        self.morph.as_ref()
    }

    pub fn is_morphing(&self) -> bool {
        self.morph.is_some()
    }

    pub fn transform(&self) -> &CloudTransform {
        &self.transform
    }

    pub fn take_dirty(&mut self) -> DirtyAttributes {
        self.render_set
            .as_mut()
            .map(RenderSet::take_dirty)
            .unwrap_or_default()
    }

    /// Replaces the original cloud. The render set is untouched until the next `resample`.
    pub fn set_original(&mut self, cloud: PointCloud) {
        debug!(points = cloud.len(), "original point cloud replaced");
        self.original = Some(cloud);
    }

    pub fn resample(
        &mut self,
        rate: f64,
        options: &ResampleOptions,
        now: f32,
    ) -> Result<ResampleOutcome, ResampleError> {
        if !rate.is_finite() {
            return Err(ResampleError::InvalidRate(rate));
        }

        let Some(original) = self.original.as_ref() else {
            return Err(ResampleError::NoOriginal);
        };

        let target = target_count(original.len(), rate);
        let sample = stride_sample(original, target);

        let previous_count = match self.render_set.as_mut() {
            None => None,
            Some(render_set) if render_set.len() == target => {
                if options.morph_enabled {
                    let from = render_set.positions().to_vec();
                    let duration = MorphState::duration_for_fps(options.playback_fps);

                    self.morph = Some(MorphState::new(from, sample.positions, now, duration));
                    render_set.overwrite_colors(&sample.colors);

                    return Ok(ResampleOutcome::Morphing);
                }

                render_set.overwrite_positions(&sample.positions);
                render_set.overwrite_colors(&sample.colors);
                self.morph = None;

                return Ok(ResampleOutcome::Snapped);
            },
            Some(render_set) => Some(render_set.len()),
        };

        self.render_set = None;
        self.morph = None;

        let generation = self.next_generation;
        self.next_generation += 1;

        let factors = evaporation_factors(target, options.evaporation_amount, &mut self.rng);
        self.render_set = Some(RenderSet::new(generation, sample, factors));

        match previous_count {
            Some(previous_count) => {
                debug!(previous_count, point_count = target, "rebuilt render set");

                Ok(ResampleOutcome::Rebuilt {
                    generation,
                    previous_count,
                    point_count: target,
                })
            },
            None => {
                info!(point_count = target, "created render set");

                Ok(ResampleOutcome::Created {
                    generation,
                    point_count: target,
                })
            },
        }
    }

    /// Advances an active morph. Returns true when live positions changed.
    pub fn tick(&mut self, elapsed: f32) -> bool {
        let Some(morph) = self.morph.as_ref() else {
            return false;
        };

        let Some(render_set) = self.render_set.as_mut() else {
            self.morph = None;
            return false;
        };

        if morph.len() != render_set.len() {
            warn!("morph length does not match render set, dropping morph");
            self.morph = None;
            return false;
        }

        let t = morph.apply(elapsed, render_set.positions_mut());
        if t >= 1.0 {
            self.morph = None;
        }

        true
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return;
        }

        self.transform.translation = Vec3::new(x, y, z);
    }

    pub fn set_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }

        self.transform.scale = scale;
    }

    pub fn set_base_rotation_x(&mut self, angle: f32) {
        if !angle.is_finite() {
            return;
        }

        self.transform.base_rotation_x = angle;
    }

    /// Composes a half turn about X on top of the base rotation.
    pub fn set_flip(&mut self, enabled: bool) {
        self.transform.flipped = enabled;
    }

    /// Forgets the render set and any morph so the next `resample` allocates
    /// a fresh one. The original and transform stay.
    pub fn discard_render_set(&mut self) {
        self.render_set = None;
        self.morph = None;
    }

    pub fn clear(&mut self) {
        self.original = None;
        self.render_set = None;
        self.morph = None;
    }
}
