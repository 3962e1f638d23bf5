use bevy::prelude::*;
use bevy_args::{
    Deserialize,
    Parser,
    Serialize,
};

use crate::settings::{
    DEFAULT_AUTO_SWITCH_SECS,
    DEFAULT_EVAPORATION_AMOUNT,
    DEFAULT_POSITION_STEP,
    DEFAULT_SUBSAMPLE_RATE,
    ViewerSettings,
};


#[derive(
    Debug,
    Clone,
    Resource,
    Serialize,
    Deserialize,
    Parser,
)]
#[command(about = "bevy_pointcloud_player viewer", version, long_about = None)]
pub struct PointCloudViewer {
    #[arg(long, default_value = "true")]
    pub editor: bool,

    #[arg(long, default_value = "true")]
    pub press_esc_close: bool,

    #[arg(long, default_value = "true")]
    pub show_fps: bool,

    #[arg(long, default_value = "1920.0")]
    pub width: f32,

    #[arg(long, default_value = "1080.0")]
    pub height: f32,

    #[arg(long, default_value = "bevy_pointcloud_player")]
    pub name: String,

    /// Model URLs, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub models: Vec<String>,

    /// Frame URLs of a sequence, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub frames: Vec<String>,

    /// `.library.json` file with folders, frames and presets.
    #[arg(long, default_value = "")]
    pub library: String,

    #[arg(long, default_value = "16.0")]
    pub fps: f32,

    #[arg(long, default_value = "0.2")]
    pub subsample_rate: f64,

    #[arg(long, default_value = "0.01")]
    pub evaporation_amount: f32,

    #[arg(long, default_value = "1.0")]
    pub model_scale: f32,

    #[arg(long, default_value = "false")]
    pub flip_upside_down: bool,

    #[arg(long, default_value = "true")]
    pub morph: bool,

    #[arg(long, default_value = "0.1")]
    pub position_step: f32,

    #[arg(long, default_value = "false")]
    pub auto_switch: bool,

    #[arg(long, default_value = "10.0")]
    pub auto_switch_secs: f32,

    #[arg(long, default_value = "false")]
    pub sequence: bool,
}

impl Default for PointCloudViewer {
    fn default() -> PointCloudViewer {
        PointCloudViewer {
            editor: true,
            press_esc_close: true,
            show_fps: true,
            width: 1920.0,
            height: 1080.0,
            name: "bevy_pointcloud_player".to_string(),
            models: Vec::new(),
            frames: Vec::new(),
            library: "".to_string(),
            fps: 16.0,
            subsample_rate: DEFAULT_SUBSAMPLE_RATE,
            evaporation_amount: DEFAULT_EVAPORATION_AMOUNT,
            model_scale: 1.0,
            flip_upside_down: false,
            morph: true,
            position_step: DEFAULT_POSITION_STEP,
            auto_switch: false,
            auto_switch_secs: DEFAULT_AUTO_SWITCH_SECS,
            sequence: false,
        }
    }
}

impl PointCloudViewer {
    pub fn initial_settings(&self) -> ViewerSettings {
        ViewerSettings {
            subsample_rate: self.subsample_rate.clamp(0.0, 1.0),
            evaporation_amount: self.evaporation_amount.clamp(0.0, 1.0),
            model_scale: self.model_scale,
            flip_upside_down: self.flip_upside_down,
            playback_fps: (self.fps as u32).max(1) as f32,
            morph_enabled: self.morph,
            position_step: self.position_step,
            auto_switch: self.auto_switch,
            auto_switch_secs: self.auto_switch_secs,
            ..default()
        }
    }
}


pub fn setup_hooks() {
    #[cfg(debug_assertions)]
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
    }
}


pub fn log(_msg: &str) {
    #[cfg(debug_assertions)]
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::console::log_1(&_msg.into());
    }
    #[cfg(debug_assertions)]
    #[cfg(not(target_arch = "wasm32"))]
    {
        println!("{}", _msg);
    }
}
