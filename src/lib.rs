use bevy::prelude::*;

pub use cloud::PointCloud;
pub use command::{
    NudgeDirection,
    ViewerCommand,
};
pub use library::{
    LibraryStartMode,
    LibraryState,
    ModelLibrary,
};
pub use morph::MorphState;
pub use normalize::Normalizer;
pub use player::{
    FrameChanged,
    FrameLoaded,
    FramePlayer,
};
pub use resample::{
    RenderSet,
    Resampler,
};
pub use settings::{
    StatusMessage,
    ViewerSettings,
};

pub mod cloud;
pub mod command;
pub mod io;
pub mod library;
pub mod morph;
pub mod normalize;
pub mod player;
pub mod render;
pub mod resample;
pub mod settings;
pub mod utils;


/// Per-frame ordering: settled loads, then user commands, then playback,
/// morph advance and finally the drawable mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, SystemSet)]
pub enum PointCloudSystems {
    Load,
    Command,
    Playback,
    Morph,
    Sync,
}


#[derive(Default)]
pub struct PointCloudPlayerPlugin;

impl Plugin for PointCloudPlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ViewerSettings>();
        app.register_type::<StatusMessage>();

        app.init_resource::<Resampler>();
        app.init_resource::<Normalizer>();
        app.init_resource::<ViewerSettings>();
        app.init_resource::<StatusMessage>();

        app.configure_sets(
            Update,
            (
                PointCloudSystems::Load,
                PointCloudSystems::Command,
                PointCloudSystems::Playback,
                PointCloudSystems::Morph,
                PointCloudSystems::Sync,
            )
                .chain(),
        );

        app.add_plugins((
            command::ViewerCommandPlugin,
            io::PointCloudIoPlugin,
            library::ModelLibraryPlugin,
            player::FramePlayerPlugin,
            render::PointCloudRenderPlugin,
        ));

        app.add_systems(Startup, setup_point_cloud);
    }
}


/// Seeds settings and the library from [`utils::PointCloudViewer`] when one is
/// present, then issues the first load. With nothing to load, the fallback
/// sphere is shown.
pub fn setup_point_cloud(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    config: Option<Res<utils::PointCloudViewer>>,
    mut settings: ResMut<ViewerSettings>,
    mut library: ResMut<LibraryState>,
    mut start_mode: ResMut<library::LibraryStartMode>,
    mut resampler: ResMut<Resampler>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    let Some(config) = config else {
        if resampler.original().is_none() {
            io::ingest_fallback(&mut resampler, &settings, time.elapsed_secs());
        }
        return;
    };

    *settings = config.initial_settings();

    let models = config.models
        .iter()
        .filter(|model| !model.is_empty())
        .cloned()
        .collect::<Vec<_>>();
    let frames = config.frames
        .iter()
        .filter(|frame| !frame.is_empty())
        .cloned()
        .collect::<Vec<_>>();

    if !models.is_empty() || !frames.is_empty() {
        library.replace(ModelLibrary {
            folders: vec![library::ModelFolder {
                name: "models".to_string(),
                models,
                mirror_y: false,
            }],
            frames,
            ..default()
        });
    }

    // sequence start waits for the library file when one is configured
    if !config.library.is_empty() {
        start_mode.sequence = config.sequence;
        commands.spawn((
            Name::new("model_library"),
            library::ModelLibraryHandle(asset_server.load(config.library.clone())),
        ));
    }

    if config.sequence && config.library.is_empty() && !library.library().frames.is_empty() {
        viewer_commands.write(ViewerCommand::ToggleSequenceMode);
    } else if let Some(url) = library.current_model() {
        viewer_commands.write(ViewerCommand::LoadModel(url));
    } else if config.library.is_empty() {
        io::ingest_fallback(&mut resampler, &settings, time.elapsed_secs());
    }

    let position = settings.effective_position();
    resampler.set_position(position.x, position.y, position.z);
    resampler.set_scale(settings.effective_scale());
    resampler.set_flip(settings.flip_upside_down);
}
