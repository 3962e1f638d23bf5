use bevy_pointcloud_player::library::{
    LibraryState,
    ModelLibrary,
    ModelPreset,
};


const LIBRARY_JSON: &str = r#"{
    "base_url": "https://example.com/models/",
    "folders": [
        { "name": "people", "models": ["alice.glb", "bob.glb", "carol.glb"] },
        { "name": "scans", "models": ["room.glb"], "mirror_y": true },
        { "name": "empty", "models": [] }
    ],
    "frames": ["seq/000.glb", "seq/001.glb"],
    "presets": {
        "bob.glb": { "offset": [0.0, -0.5, 1.0], "scale": 1.5 }
    }
}"#;


fn library_state() -> LibraryState {
    let library: ModelLibrary = serde_json::from_str(LIBRARY_JSON).unwrap();
    LibraryState::new(library)
}


#[test]
fn test_parse_library() {
    let state = library_state();
    let library = state.library();

    assert_eq!(library.folders.len(), 3);
    assert!(!library.folders[0].mirror_y);
    assert!(library.folders[1].mirror_y);
    assert_eq!(
        library.frame_urls(),
        vec![
            "https://example.com/models/seq/000.glb".to_string(),
            "https://example.com/models/seq/001.glb".to_string(),
        ],
    );
}

#[test]
fn test_minimal_library() {
    let library: ModelLibrary = serde_json::from_str("{}").unwrap();

    assert_eq!(library, ModelLibrary::default());
    assert_eq!(library.resolve("a.glb"), "a.glb");
}

#[test]
fn test_absolute_urls_skip_base() {
    let state = library_state();

    assert_eq!(
        state.library().resolve("http://other.host/x.glb"),
        "http://other.host/x.glb",
    );
}

#[test]
fn test_next_model_wraps() {
    let mut state = library_state();

    assert_eq!(
        state.current_model().as_deref(),
        Some("https://example.com/models/alice.glb"),
    );
    assert_eq!(
        state.next_model().as_deref(),
        Some("https://example.com/models/bob.glb"),
    );
    state.next_model();
    assert_eq!(
        state.next_model().as_deref(),
        Some("https://example.com/models/alice.glb"),
    );
}

#[test]
fn test_select_and_cycle_folder() {
    let mut state = library_state();
    state.next_model();

    assert_eq!(
        state.select_folder("scans").as_deref(),
        Some("https://example.com/models/room.glb"),
    );
    assert_eq!(state.model_index(), 0);
    assert!(state.normalize_options().mirror_y);

    assert!(state.select_folder("missing").is_none());
    assert_eq!(state.folder().map(|folder| folder.name.as_str()), Some("scans"));

    assert!(state.cycle_folder().is_none());
    assert_eq!(state.folder().map(|folder| folder.name.as_str()), Some("empty"));
    assert!(state.next_model().is_none());

    assert_eq!(
        state.cycle_folder().as_deref(),
        Some("https://example.com/models/alice.glb"),
    );
}

#[test]
fn test_empty_library_has_no_models() {
    let mut state = LibraryState::default();

    assert!(state.current_model().is_none());
    assert!(state.next_model().is_none());
    assert!(state.cycle_folder().is_none());
}

#[test]
fn test_preset_lookup_by_file_name() {
    let state = library_state();

    assert_eq!(
        state.preset_for("https://example.com/models/bob.glb"),
        Some(ModelPreset {
            offset: [0.0, -0.5, 1.0],
            scale: Some(1.5),
        }),
    );
    assert_eq!(state.preset_for("bob.glb").and_then(|preset| preset.scale), Some(1.5));
    assert!(state.preset_for("https://example.com/models/alice.glb").is_none());
}
