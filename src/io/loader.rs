use bevy::{
    prelude::*,
    asset::LoadState,
    gltf::GltfAssetLabel,
};

use crate::{
    cloud::PointCloud,
    io::extract::point_cloud_from_mesh,
    player::FrameLoadError,
};


/// First primitive of the first mesh in a glTF/GLB file; point clouds are
/// exported as a single point-list primitive.
pub fn request_point_mesh(
    asset_server: &AssetServer,
    url: &str,
) -> Handle<Mesh> {
    debug!(url, "requesting point mesh");

    asset_server.load(
        GltfAssetLabel::Primitive {
            mesh: 0,
            primitive: 0,
        }.from_asset(url.to_string()),
    )
}


#[derive(Debug)]
pub enum PointLoadStatus {
    Pending,
    Ready(Option<PointCloud>),
    Failed(FrameLoadError),
}

pub fn poll_point_mesh(
    asset_server: &AssetServer,
    meshes: &Assets<Mesh>,
    handle: &Handle<Mesh>,
    url: &str,
) -> PointLoadStatus {
    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            PointLoadStatus::Ready(meshes.get(handle).and_then(point_cloud_from_mesh))
        },
        Some(LoadState::Failed(err)) => PointLoadStatus::Failed(FrameLoadError {
            url: url.to_string(),
            reason: err.to_string(),
        }),
        _ => PointLoadStatus::Pending,
    }
}


/// The single model load in flight, superseded by the next request.
#[derive(Debug, Default, Resource)]
pub struct ModelLoad {
    pending: Option<(String, Handle<Mesh>)>,
}

impl ModelLoad {
    pub fn begin(
        &mut self,
        asset_server: &AssetServer,
        url: &str,
    ) {
        if let Some((previous, _)) = self.pending.as_ref() {
            debug!(previous = previous.as_str(), next = url, "superseding model load");
        }

        self.pending = Some((url.to_string(), request_point_mesh(asset_server, url)));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn url(&self) -> Option<&str> {
        self.pending.as_ref().map(|(url, _)| url.as_str())
    }

    /// Result of the pending load once it settles, clearing it.
    pub fn poll(
        &mut self,
        asset_server: &AssetServer,
        meshes: &Assets<Mesh>,
    ) -> Option<(String, Result<Option<PointCloud>, FrameLoadError>)> {
        let (url, handle) = self.pending.as_ref()?;

        let result = match poll_point_mesh(asset_server, meshes, handle, url) {
            PointLoadStatus::Pending => return None,
            PointLoadStatus::Ready(cloud) => Ok(cloud),
            PointLoadStatus::Failed(err) => Err(err),
        };

        let (url, _) = self.pending.take()?;
        Some((url, result))
    }
}
