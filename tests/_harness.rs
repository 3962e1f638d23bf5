use bevy::prelude::*;

use bevy_pointcloud_player::{
    PointCloudPlayerPlugin,
    Resampler,
};


/// Headless app with the full player plugin and a seeded resampler.
pub fn test_harness_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        AssetPlugin::default(),
    ));
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();

    app.insert_resource(Resampler::seeded(7));
    app.add_plugins(PointCloudPlayerPlugin);

    app
}
