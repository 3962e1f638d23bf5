use std::{
    collections::HashMap,
    io::ErrorKind,
};

use bevy::{
    prelude::*,
    asset::{
        AssetLoader,
        LoadContext,
        io::Reader,
    },
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::normalize::NormalizeOptions;


#[derive(Clone, Debug, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ModelFolder {
    pub name: String,
    pub models: Vec<String>,
    /// Models in this folder are stored upside down.
    #[serde(default)]
    pub mirror_y: bool,
}


/// Hand-tuned placement for one model, keyed by file name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ModelPreset {
    #[serde(default)]
    pub offset: [f32; 3],
    #[serde(default)]
    pub scale: Option<f32>,
}


/// Model folders, the frame sequence and per-model presets, as read from a
/// `.library.json` file.
#[derive(Asset, Clone, Debug, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ModelLibrary {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub folders: Vec<ModelFolder>,
    #[serde(default)]
    pub frames: Vec<String>,
    #[serde(default)]
    pub presets: HashMap<String, ModelPreset>,
}

impl ModelLibrary {
    pub fn resolve(&self, model: &str) -> String {
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() && !model.contains("://") => {
                format!("{}/{}", base.trim_end_matches('/'), model)
            },
            _ => model.to_string(),
        }
    }

    pub fn frame_urls(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| self.resolve(frame))
            .collect()
    }

    pub fn preset_for(&self, url: &str) -> Option<&ModelPreset> {
        let name = url.rsplit('/').next().unwrap_or(url);
        self.presets.get(name)
    }
}


/// Library plus the folder and model cursors.
#[derive(Debug, Default, Resource)]
pub struct LibraryState {
    library: ModelLibrary,
    folder: usize,
    model: usize,
}

impl LibraryState {
    pub fn new(library: ModelLibrary) -> Self {
        Self {
            library,
            folder: 0,
            model: 0,
        }
    }

    pub fn library(&self) -> &ModelLibrary {
        &self.library
    }

    pub fn replace(&mut self, library: ModelLibrary) {
        self.library = library;
        self.folder = 0;
        self.model = 0;
    }

    pub fn folder(&self) -> Option<&ModelFolder> {
        self.library.folders.get(self.folder)
    }

    pub fn model_index(&self) -> usize {
        self.model
    }

    pub fn current_model(&self) -> Option<String> {
        let folder = self.folder()?;
        folder.models
            .get(self.model)
            .map(|model| self.library.resolve(model))
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            mirror_y: self.folder().is_some_and(|folder| folder.mirror_y),
        }
    }

    pub fn next_model(&mut self) -> Option<String> {
        let count = self.folder()?.models.len();
        if count == 0 {
            return None;
        }

        self.model = (self.model + 1) % count;
        self.current_model()
    }

    pub fn select_folder(&mut self, name: &str) -> Option<String> {
        let index = self.library.folders
            .iter()
            .position(|folder| folder.name == name)?;

        self.folder = index;
        self.model = 0;
        self.current_model()
    }

    pub fn cycle_folder(&mut self) -> Option<String> {
        let count = self.library.folders.len();
        if count == 0 {
            return None;
        }

        self.folder = (self.folder + 1) % count;
        self.model = 0;
        self.current_model()
    }

    pub fn frame_urls(&self) -> Vec<String> {
        self.library.frame_urls()
    }

    pub fn preset_for(&self, url: &str) -> Option<ModelPreset> {
        self.library.preset_for(url).copied()
    }
}


#[derive(Component, Clone, Debug, Default, Reflect)]
pub struct ModelLibraryHandle(pub Handle<ModelLibrary>);


/// What to show once a library file finishes loading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect, Resource)]
#[reflect(Resource)]
pub struct LibraryStartMode {
    /// Enter sequence mode instead of loading the first model, when the
    /// library has frames.
    pub sequence: bool,
}


#[derive(Default)]
pub struct ModelLibraryPlugin;

impl Plugin for ModelLibraryPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ModelLibrary>();
        app.init_asset::<ModelLibrary>();
        app.init_asset_loader::<ModelLibraryLoader>();

        app.register_type::<LibraryStartMode>();
        app.init_resource::<LibraryState>();
        app.init_resource::<LibraryStartMode>();

        app.add_systems(
            Update,
            apply_loaded_library.in_set(crate::PointCloudSystems::Load),
        );
    }
}


fn apply_loaded_library(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    libraries: Res<Assets<ModelLibrary>>,
    start_mode: Res<LibraryStartMode>,
    settings: Res<crate::settings::ViewerSettings>,
    mut state: ResMut<LibraryState>,
    mut viewer_commands: EventWriter<crate::command::ViewerCommand>,
    handles: Query<(Entity, &ModelLibraryHandle)>,
) {
    for (entity, handle) in handles.iter() {
        if let Some(load_state) = asset_server.get_load_state(&handle.0) {
            if load_state.is_failed() {
                error!("failed to load model library");
                commands.entity(entity).despawn();
                continue;
            }

            if !load_state.is_loaded() {
                continue;
            }
        }

        let Some(library) = libraries.get(&handle.0) else {
            continue;
        };

        info!(
            folders = library.folders.len(),
            frames = library.frames.len(),
            "model library loaded"
        );

        state.replace(library.clone());
        commands.entity(entity).despawn();

        if start_mode.sequence && !state.frame_urls().is_empty() {
            if !settings.sequence_mode {
                viewer_commands.write(crate::command::ViewerCommand::ToggleSequenceMode);
            }
        } else if let Some(url) = state.current_model() {
            viewer_commands.write(crate::command::ViewerCommand::LoadModel(url));
        }
    }
}


#[derive(Default)]
pub struct ModelLibraryLoader;

impl AssetLoader for ModelLibraryLoader {
    type Asset = ModelLibrary;
    type Settings = ();
    type Error = std::io::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let library: ModelLibrary = serde_json::from_slice(&bytes)
            .map_err(|err| std::io::Error::new(ErrorKind::InvalidData, err))?;

        debug!(path = %load_context.path().display(), "parsed model library");

        Ok(library)
    }

    fn extensions(&self) -> &[&str] {
        &["library.json"]
    }
}
