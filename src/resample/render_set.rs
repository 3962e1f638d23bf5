use super::StrideSample;


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyAttributes {
    pub positions: bool,
    pub colors: bool,
}

impl DirtyAttributes {
    pub fn any(&self) -> bool {
        self.positions || self.colors
    }
}


/// Live, render-ready subset of the original cloud.
///
/// A render set keeps its point count for its whole life; a different count
/// means a new allocation with a new `generation`.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSet {
    generation: u64,
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    evaporation_factors: Vec<f32>,
    dirty: DirtyAttributes,
}

impl RenderSet {
    pub(crate) fn new(
        generation: u64,
        sample: StrideSample,
        evaporation_factors: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(sample.positions.len(), evaporation_factors.len());

        Self {
            generation,
            positions: sample.positions,
            colors: sample.colors,
            evaporation_factors,
            dirty: DirtyAttributes {
                positions: true,
                colors: true,
            },
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
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

    pub fn evaporation_factors(&self) -> &[f32] {
        &self.evaporation_factors
    }

    pub fn dirty(&self) -> DirtyAttributes {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> DirtyAttributes {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        self.dirty.positions = true;
        &mut self.positions
    }

    pub(crate) fn overwrite_positions(&mut self, positions: &[[f32; 3]]) {
        self.positions_mut().copy_from_slice(positions);
    }

    pub(crate) fn overwrite_colors(&mut self, colors: &[[f32; 3]]) {
        self.colors.copy_from_slice(colors);
        self.dirty.colors = true;
    }
}
