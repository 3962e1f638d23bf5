use bevy::prelude::*;

use crate::{
    library::ModelPreset,
    morph::DEFAULT_MORPH_FPS,
    resample::{
        ResampleOptions,
        resampler::DEFAULT_POSITION,
    },
};


pub const DEFAULT_SUBSAMPLE_RATE: f64 = 0.2;
pub const DEFAULT_EVAPORATION_AMOUNT: f32 = 0.01;
pub const DEFAULT_POSITION_STEP: f32 = 0.1;
pub const DEFAULT_AUTO_SWITCH_SECS: f32 = 10.0;


/// Runtime parameters of the viewer. Written only by the command dispatcher.
#[derive(Clone, Debug, PartialEq, Reflect, Resource)]
#[reflect(Resource)]
pub struct ViewerSettings {
    pub subsample_rate: f64,
    pub evaporation_amount: f32,
    pub model_scale: f32,
    pub flip_upside_down: bool,
    pub playback_fps: f32,
    pub morph_enabled: bool,
    pub position_step: f32,
    pub model_position: Vec3,
    /// Preset of the model on display, if the library has one for it.
    pub active_preset: ModelPreset,
    /// User adjustment on top of the active preset's offset.
    pub preset_offset: Vec3,
    pub auto_switch: bool,
    pub auto_switch_secs: f32,
    pub sequence_mode: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            subsample_rate: DEFAULT_SUBSAMPLE_RATE,
            evaporation_amount: DEFAULT_EVAPORATION_AMOUNT,
            model_scale: 1.0,
            flip_upside_down: false,
            playback_fps: DEFAULT_MORPH_FPS,
            morph_enabled: true,
            position_step: DEFAULT_POSITION_STEP,
            model_position: DEFAULT_POSITION,
            active_preset: ModelPreset::default(),
            preset_offset: Vec3::ZERO,
            auto_switch: false,
            auto_switch_secs: DEFAULT_AUTO_SWITCH_SECS,
            sequence_mode: false,
        }
    }
}

impl ViewerSettings {
    pub fn resample_options(&self) -> ResampleOptions {
        ResampleOptions {
            morph_enabled: self.morph_enabled,
            playback_fps: self.playback_fps,
            evaporation_amount: self.evaporation_amount,
        }
    }

    pub fn effective_position(&self) -> Vec3 {
        self.model_position + Vec3::from(self.active_preset.offset) + self.preset_offset
    }

    pub fn effective_scale(&self) -> f32 {
        self.model_scale * self.active_preset.scale.unwrap_or(1.0)
    }
}


/// Last user-facing status line (loading, fallback, errors).
#[derive(Clone, Debug, Default, Reflect, Resource)]
#[reflect(Resource)]
pub struct StatusMessage(pub String);

impl StatusMessage {
    pub fn set(&mut self, message: impl Into<String>) {
        self.0 = message.into();
    }
}
