use bevy::prelude::*;

use crate::{
    cloud::{
        FALLBACK_POINT_COUNT,
        PointCloud,
        fallback_sphere,
    },
    command::{
        ViewerCommand,
        resample_live,
    },
    library::LibraryState,
    normalize::Normalizer,
    resample::Resampler,
    settings::{
        StatusMessage,
        ViewerSettings,
    },
};

pub mod extract;
pub mod loader;

use loader::ModelLoad;


#[derive(Default)]
pub struct PointCloudIoPlugin;

impl Plugin for PointCloudIoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoad>();

        app.add_systems(
            Update,
            poll_model_load.in_set(crate::PointCloudSystems::Load),
        );
    }
}


/// Makes `cloud` the original and resamples it into a new render set.
///
/// A model never morphs out of the previous one, even at equal point counts.
pub fn ingest_point_cloud(
    resampler: &mut Resampler,
    settings: &ViewerSettings,
    cloud: PointCloud,
    now: f32,
) {
    resampler.discard_render_set();
    resampler.set_original(cloud);
    resample_live(
        resampler,
        settings.subsample_rate,
        &settings.resample_options(),
        now,
    );
}


pub fn ingest_fallback(
    resampler: &mut Resampler,
    settings: &ViewerSettings,
    now: f32,
) {
    let cloud = fallback_sphere(FALLBACK_POINT_COUNT, &mut rand::thread_rng());
    ingest_point_cloud(resampler, settings, cloud, now);
}


pub fn poll_model_load(
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    meshes: Res<Assets<Mesh>>,
    settings: Res<ViewerSettings>,
    library: Res<LibraryState>,
    normalizer: Res<Normalizer>,
    mut model_load: ResMut<ModelLoad>,
    mut resampler: ResMut<Resampler>,
    mut status: ResMut<StatusMessage>,
    mut commands: EventWriter<ViewerCommand>,
) {
    let Some((url, result)) = model_load.poll(&asset_server, &meshes) else {
        return;
    };

    let now = time.elapsed_secs();

    commands.write(ViewerCommand::ApplyPreset(
        library.preset_for(&url).unwrap_or_default(),
    ));

    match result {
        Ok(Some(cloud)) => {
            info!(url = url.as_str(), points = cloud.len(), "model loaded");
            status.set(format!("Loaded {} ({} points)", url, cloud.len()));

            let cloud = normalizer.fit_model(&cloud, library.normalize_options());
            ingest_point_cloud(&mut resampler, &settings, cloud, now);
        },
        Ok(None) => {
            warn!(url = url.as_str(), "no points found, showing fallback sphere");
            status.set(format!("No points found in {url}"));

            ingest_fallback(&mut resampler, &settings, now);
        },
        Err(err) => {
            error!("{err}");
            status.set(err.to_string());

            ingest_fallback(&mut resampler, &settings, now);
        },
    }
}
