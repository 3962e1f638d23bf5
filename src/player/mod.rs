use bevy::prelude::*;

use crate::{
    cloud::PointCloud,
    command::resample_live,
    io::loader::{
        PointLoadStatus,
        poll_point_mesh,
        request_point_mesh,
    },
    normalize::Normalizer,
    resample::Resampler,
    settings::{
        StatusMessage,
        ViewerSettings,
    },
};

pub mod sequence;

pub use sequence::{
    DEFAULT_FPS,
    FrameLoadError,
    FramePlayer,
    FrameRequest,
    LoadedFrame,
};


/// A sequence frame finished loading and carries points.
#[derive(Clone, Debug, Event)]
pub struct FrameLoaded {
    pub frame_index: usize,
    pub cloud: PointCloud,
}

/// The current frame index moved.
#[derive(Clone, Copy, Debug, Event, PartialEq, Eq)]
pub struct FrameChanged {
    pub frame_index: usize,
    pub total_frames: usize,
}


/// Asset handle behind the player's single in-flight request.
#[derive(Debug, Default, Resource)]
pub struct FrameLoad {
    pending: Option<(FrameRequest, Handle<Mesh>)>,
}

impl FrameLoad {
    pub fn begin(
        &mut self,
        asset_server: &AssetServer,
        request: Option<FrameRequest>,
    ) {
        let Some(request) = request else {
            return;
        };

        debug!(frame = request.frame_index, url = request.url.as_str(), "loading frame");

        let handle = request_point_mesh(asset_server, &request.url);
        self.pending = Some((request, handle));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn request(&self) -> Option<&FrameRequest> {
        self.pending.as_ref().map(|(request, _)| request)
    }
}


#[derive(Default)]
pub struct FramePlayerPlugin;

impl Plugin for FramePlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FrameLoaded>();
        app.add_event::<FrameChanged>();

        app.init_resource::<FramePlayer>();
        app.init_resource::<FrameLoad>();

        app.add_systems(
            Update,
            poll_frame_loads.in_set(crate::PointCloudSystems::Load),
        );
        app.add_systems(
            Update,
            (
                tick_frame_player,
                ingest_loaded_frames,
            )
                .chain()
                .in_set(crate::PointCloudSystems::Playback),
        );
    }
}


pub fn tick_frame_player(
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut player: ResMut<FramePlayer>,
    mut frame_load: ResMut<FrameLoad>,
) {
    if !player.is_playing() {
        return;
    }

    let request = player.tick(time.elapsed_secs_f64() * 1000.0);
    frame_load.begin(&asset_server, request);
}


pub fn poll_frame_loads(
    asset_server: Res<AssetServer>,
    meshes: Res<Assets<Mesh>>,
    mut player: ResMut<FramePlayer>,
    mut frame_load: ResMut<FrameLoad>,
    mut status: ResMut<StatusMessage>,
    mut loaded: EventWriter<FrameLoaded>,
    mut changed: EventWriter<FrameChanged>,
) {
    let Some((request, handle)) = frame_load.pending.as_ref() else {
        return;
    };

    let result = match poll_point_mesh(&asset_server, &meshes, handle, &request.url) {
        PointLoadStatus::Pending => return,
        PointLoadStatus::Ready(cloud) => Ok(cloud),
        PointLoadStatus::Failed(err) => Err(err),
    };

    let Some((request, _)) = frame_load.pending.take() else {
        return;
    };

    if let Err(err) = result.as_ref() {
        status.set(err.to_string());
    }

    let Some(frame) = player.complete_load(&request, result) else {
        return;
    };

    changed.write(FrameChanged {
        frame_index: frame.frame_index,
        total_frames: frame.total_frames,
    });

    match frame.payload {
        Some(cloud) => {
            loaded.write(FrameLoaded {
                frame_index: frame.frame_index,
                cloud,
            });
        },
        None => warn!(frame = frame.frame_index, "no points found in frame"),
    }
}


pub fn ingest_loaded_frames(
    time: Res<Time>,
    settings: Res<ViewerSettings>,
    mut frames: EventReader<FrameLoaded>,
    mut normalizer: ResMut<Normalizer>,
    mut resampler: ResMut<Resampler>,
) {
    for frame in frames.read() {
        let cloud = normalizer.fit_sequence_frame(&frame.cloud);
        resampler.set_original(cloud);

        resample_live(
            &mut resampler,
            settings.subsample_rate,
            &settings.resample_options(),
            time.elapsed_secs(),
        );
    }
}
