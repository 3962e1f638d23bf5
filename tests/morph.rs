use bevy_pointcloud_player::morph::{
    DEFAULT_MORPH_FPS,
    MorphState,
};


#[test]
fn test_morph_midpoint_and_completion() {
    let morph = MorphState::new(
        vec![[0.0, 0.0, 0.0]],
        vec![[10.0, 10.0, 10.0]],
        2.0,
        1.0,
    );

    let mut live = [[0.0; 3]];

    let t = morph.apply(2.5, &mut live);
    assert_eq!(t, 0.5);
    assert_eq!(live, [[5.0, 5.0, 5.0]]);

    let t = morph.apply(3.0, &mut live);
    assert_eq!(t, 1.0);
    assert_eq!(live, [[10.0, 10.0, 10.0]]);

    let t = morph.apply(100.0, &mut live);
    assert_eq!(t, 1.0);
    assert_eq!(live, [[10.0, 10.0, 10.0]]);
}

#[test]
fn test_morph_before_start_holds_source() {
    let morph = MorphState::new(
        vec![[1.0, 2.0, 3.0]],
        vec![[4.0, 5.0, 6.0]],
        5.0,
        1.0,
    );

    let mut live = [[9.0; 3]];
    let t = morph.apply(4.0, &mut live);

    assert_eq!(t, 0.0);
    assert_eq!(live, [[1.0, 2.0, 3.0]]);
}

#[test]
fn test_morph_progress_handles_degenerate_input() {
    let morph = MorphState::new(vec![[0.0; 3]], vec![[1.0; 3]], 0.0, 0.0);

    assert_eq!(morph.progress(f32::NAN), 0.0);
    assert_eq!(morph.progress(1.0), 1.0);
}

#[test]
fn test_duration_for_fps() {
    assert_eq!(MorphState::duration_for_fps(16.0), 1.0 / 16.0);
    assert_eq!(MorphState::duration_for_fps(0.0), 1.0);
    assert_eq!(MorphState::duration_for_fps(-5.0), 1.0);
    assert_eq!(MorphState::duration_for_fps(f32::NAN), 1.0 / DEFAULT_MORPH_FPS);
}
