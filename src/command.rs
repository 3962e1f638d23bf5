use bevy::{
    prelude::*,
    ecs::system::SystemParam,
};

use crate::{
    io::loader::ModelLoad,
    library::{
        LibraryState,
        ModelPreset,
    },
    normalize::Normalizer,
    player::{
        FrameLoad,
        FramePlayer,
    },
    resample::{
        Resampler,
        resampler::DEFAULT_POSITION,
    },
    settings::{
        StatusMessage,
        ViewerSettings,
    },
};


#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum NudgeDirection {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl NudgeDirection {
    pub fn axis(&self) -> Vec3 {
        match self {
            NudgeDirection::PosX => Vec3::X,
            NudgeDirection::NegX => Vec3::NEG_X,
            NudgeDirection::PosY => Vec3::Y,
            NudgeDirection::NegY => Vec3::NEG_Y,
            NudgeDirection::PosZ => Vec3::Z,
            NudgeDirection::NegZ => Vec3::NEG_Z,
        }
    }
}


/// Every user intent the viewer understands. Input handlers and UIs send these;
/// [`dispatch_viewer_commands`] is the single place they take effect.
#[derive(Clone, Debug, Event, PartialEq)]
pub enum ViewerCommand {
    LoadModel(String),
    NextModel,
    SelectFolder(String),
    CycleFolder,
    SetSubsampleRate(f64),
    /// Stored only; applies to the next render set allocation.
    SetEvaporationAmount(f32),
    SetModelScale(f32),
    SetFlip(bool),
    SetMorph(bool),
    Nudge(NudgeDirection),
    ResetPosition,
    ApplyPreset(ModelPreset),
    SetPresetOffset(Vec3),
    ResetPresetOffset,
    ToggleSequenceMode,
    Play,
    Pause,
    Stop,
    NextFrame,
    PreviousFrame,
    SeekFrame(usize),
    SetPlaybackFps(f32),
    SetAutoSwitch(bool),
    Clear,
}

impl ViewerCommand {
    /// Frame transport, only meaningful in sequence mode.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ViewerCommand::Play
                | ViewerCommand::Pause
                | ViewerCommand::Stop
                | ViewerCommand::NextFrame
                | ViewerCommand::PreviousFrame
                | ViewerCommand::SeekFrame(_)
        )
    }
}


#[derive(Debug, Resource)]
pub struct AutoSwitchTimer(pub Timer);

impl Default for AutoSwitchTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            crate::settings::DEFAULT_AUTO_SWITCH_SECS,
            TimerMode::Repeating,
        ))
    }
}


#[derive(SystemParam)]
pub struct ViewerContext<'w> {
    settings: ResMut<'w, ViewerSettings>,
    status: ResMut<'w, StatusMessage>,
    resampler: ResMut<'w, Resampler>,
    normalizer: ResMut<'w, Normalizer>,
    library: ResMut<'w, LibraryState>,
    player: ResMut<'w, FramePlayer>,
    frame_load: ResMut<'w, FrameLoad>,
    model_load: ResMut<'w, ModelLoad>,
    auto_switch: ResMut<'w, AutoSwitchTimer>,
    asset_server: Res<'w, AssetServer>,
    time: Res<'w, Time>,
}

impl ViewerContext<'_> {
    fn now_secs(&self) -> f32 {
        self.time.elapsed_secs()
    }

    fn now_ms(&self) -> f64 {
        self.time.elapsed_secs_f64() * 1000.0
    }

    fn load_model(&mut self, url: String) {
        if self.settings.sequence_mode {
            self.leave_sequence_mode();
        }

        info!(url = url.as_str(), "loading model");
        self.status.set(format!("Loading {url}"));
        self.model_load.begin(&self.asset_server, &url);
    }

    fn enter_sequence_mode(&mut self) {
        let frame_urls = self.library.frame_urls();
        if frame_urls.is_empty() {
            warn!("no frames configured, staying in model mode");
            self.status.set("No frames configured");
            return;
        }

        self.model_load.cancel();
        self.normalizer.reset_canonical();
        self.settings.sequence_mode = true;

        let request = self.player.initialize(frame_urls, self.settings.playback_fps);
        self.frame_load.begin(&self.asset_server, request);
        self.status.set("Sequence mode");
    }

    fn leave_sequence_mode(&mut self) {
        self.player.pause();
        self.player.abandon_load();
        self.frame_load.cancel();
        self.normalizer.reset_canonical();
        self.settings.sequence_mode = false;
    }

    fn resample(&mut self) {
        let rate = self.settings.subsample_rate;
        let options = self.settings.resample_options();
        let now = self.now_secs();

        resample_live(&mut self.resampler, rate, &options, now);
    }

    fn sync_transform(&mut self) {
        let position = self.settings.effective_position();

        self.resampler.set_position(position.x, position.y, position.z);
        self.resampler.set_scale(self.settings.effective_scale());
        self.resampler.set_flip(self.settings.flip_upside_down);
    }

    fn apply(&mut self, command: &ViewerCommand) {
        debug!(?command, "viewer command");

        if command.is_transport() && !self.settings.sequence_mode {
            debug!(?command, "not in sequence mode, ignoring");
            return;
        }

        match command {
            ViewerCommand::LoadModel(url) => self.load_model(url.clone()),
            ViewerCommand::NextModel => {
                if let Some(url) = self.library.next_model() {
                    self.load_model(url);
                }
            },
            ViewerCommand::SelectFolder(name) => match self.library.select_folder(name) {
                Some(url) => self.load_model(url),
                None => warn!(folder = name.as_str(), "unknown or empty folder"),
            },
            ViewerCommand::CycleFolder => {
                if let Some(url) = self.library.cycle_folder() {
                    self.load_model(url);
                }
            },
            ViewerCommand::SetSubsampleRate(rate) => {
                if !rate.is_finite() {
                    warn!(rate, "ignoring non-finite sample rate");
                    return;
                }

                self.settings.subsample_rate = rate.clamp(0.0, 1.0);
                self.resample();
            },
            ViewerCommand::SetEvaporationAmount(amount) => {
                if amount.is_finite() {
                    self.settings.evaporation_amount = amount.clamp(0.0, 1.0);
                }
            },
            ViewerCommand::SetModelScale(scale) => {
                if scale.is_finite() {
                    self.settings.model_scale = *scale;
                }
            },
            ViewerCommand::SetFlip(enabled) => self.settings.flip_upside_down = *enabled,
            ViewerCommand::SetMorph(enabled) => self.settings.morph_enabled = *enabled,
            ViewerCommand::Nudge(direction) => {
                let step = self.settings.position_step;
                self.settings.model_position += direction.axis() * step;
            },
            ViewerCommand::ResetPosition => self.settings.model_position = DEFAULT_POSITION,
            ViewerCommand::ApplyPreset(preset) => self.settings.active_preset = *preset,
            ViewerCommand::SetPresetOffset(offset) => {
                if offset.is_finite() {
                    self.settings.preset_offset = *offset;
                }
            },
            ViewerCommand::ResetPresetOffset => self.settings.preset_offset = Vec3::ZERO,
            ViewerCommand::ToggleSequenceMode => {
                if self.settings.sequence_mode {
                    self.leave_sequence_mode();
                    self.status.set("Model mode");

                    if let Some(url) = self.library.current_model() {
                        self.load_model(url);
                    }
                } else {
                    self.enter_sequence_mode();
                }
            },
            ViewerCommand::Play => {
                let now = self.now_ms();
                self.player.play(now);
            },
            ViewerCommand::Pause => self.player.pause(),
            ViewerCommand::Stop => {
                let request = self.player.stop();
                self.frame_load.begin(&self.asset_server, request);
            },
            ViewerCommand::NextFrame => {
                let request = self.player.next_frame();
                self.frame_load.begin(&self.asset_server, request);
            },
            ViewerCommand::PreviousFrame => {
                let request = self.player.previous_frame();
                self.frame_load.begin(&self.asset_server, request);
            },
            ViewerCommand::SeekFrame(index) => {
                let request = self.player.seek_to_frame(*index);
                self.frame_load.begin(&self.asset_server, request);
            },
            ViewerCommand::SetPlaybackFps(fps) => {
                if !fps.is_finite() {
                    return;
                }

                self.player.set_fps(*fps);
                self.settings.playback_fps = self.player.fps() as f32;
            },
            ViewerCommand::SetAutoSwitch(enabled) => {
                self.settings.auto_switch = *enabled;
                self.auto_switch.0.reset();
            },
            ViewerCommand::Clear => {
                self.model_load.cancel();
                self.leave_sequence_mode();
                self.resampler.clear();
                self.status.set("Cleared");
            },
        }
    }
}


/// Runs a resample against the current original, logging instead of failing.
pub fn resample_live(
    resampler: &mut Resampler,
    rate: f64,
    options: &crate::resample::ResampleOptions,
    now: f32,
) {
    match resampler.resample(rate, options, now) {
        Ok(outcome) => debug!(?outcome, rate, "resampled"),
        Err(crate::resample::ResampleError::NoOriginal) => {},
        Err(err) => warn!("{err}"),
    }
}


pub fn dispatch_viewer_commands(
    mut commands: EventReader<ViewerCommand>,
    mut context: ViewerContext,
) {
    let mut handled = false;

    for command in commands.read() {
        context.apply(command);
        handled = true;
    }

    if handled {
        context.sync_transform();
    }
}


pub fn auto_switch_models(
    time: Res<Time>,
    settings: Res<ViewerSettings>,
    mut timer: ResMut<AutoSwitchTimer>,
    mut commands: EventWriter<ViewerCommand>,
) {
    if !settings.auto_switch || settings.sequence_mode {
        return;
    }

    let duration = std::time::Duration::from_secs_f32(settings.auto_switch_secs.max(0.1));
    if timer.0.duration() != duration {
        timer.0.set_duration(duration);
    }

    if timer.0.tick(time.delta()).just_finished() {
        commands.write(ViewerCommand::NextModel);
    }
}


#[derive(Default)]
pub struct ViewerCommandPlugin;

impl Plugin for ViewerCommandPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ViewerCommand>();

        app.init_resource::<AutoSwitchTimer>();

        app.add_systems(
            Update,
            (
                auto_switch_models,
                dispatch_viewer_commands,
            )
                .chain()
                .in_set(crate::PointCloudSystems::Command),
        );
    }
}
