/// Lower bound on a morph duration, keeps `progress` finite.
pub const MIN_MORPH_DURATION_SECS: f32 = 0.0001;
pub const DEFAULT_MORPH_FPS: f32 = 16.0;


/// Linear transition of a render set's positions between two samples.
///
/// `from` is an owned snapshot taken when the morph starts, so later writes to
/// the live buffer do not affect it.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphState {
    from: Vec<[f32; 3]>,
    to: Vec<[f32; 3]>,
    start_time: f32,
    duration_secs: f32,
}

impl MorphState {
    pub fn new(
        from: Vec<[f32; 3]>,
        to: Vec<[f32; 3]>,
        start_time: f32,
        duration_secs: f32,
    ) -> Self {
        debug_assert_eq!(from.len(), to.len());

        Self {
            from,
            to,
            start_time,
            duration_secs,
        }
    }

    /// One playback frame at `fps`, with `fps` floored to 1.
    pub fn duration_for_fps(fps: f32) -> f32 {
        let fps = if fps.is_finite() { fps } else { DEFAULT_MORPH_FPS };

        1.0 / fps.max(1.0)
    }

    pub fn len(&self) -> usize {
        self.to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to.is_empty()
    }

    pub fn from_positions(&self) -> &[[f32; 3]] {
        &self.from
    }

    pub fn to_positions(&self) -> &[[f32; 3]] {
        &self.to
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    pub fn progress(&self, elapsed: f32) -> f32 {
        let t = (elapsed - self.start_time) / self.duration_secs.max(MIN_MORPH_DURATION_SECS);

        if t.is_nan() {
            return 0.0;
        }

        t.clamp(0.0, 1.0)
    }

    /// Writes the interpolated positions for `elapsed` into `out` and returns
    /// the progress. At full progress `out` holds exactly the target.
    pub fn apply(&self, elapsed: f32, out: &mut [[f32; 3]]) -> f32 {
        let t = self.progress(elapsed);

        if t >= 1.0 {
            out.copy_from_slice(&self.to);
            return t;
        }

        for ((live, from), to) in out.iter_mut().zip(self.from.iter()).zip(self.to.iter()) {
            for axis in 0..3 {
                live[axis] = from[axis] + (to[axis] - from[axis]) * t;
            }
        }

        t
    }
}
