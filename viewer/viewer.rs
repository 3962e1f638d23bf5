use bevy::{
    prelude::*,
    app::AppExit,
    core_pipeline::tonemapping::Tonemapping,
    diagnostic::{
        DiagnosticsStore,
        FrameTimeDiagnosticsPlugin,
    },
};
use bevy_args::{
    BevyArgsPlugin,
    parse_args,
};
use bevy_inspector_egui::{
    bevy_egui::EguiPlugin,
    quick::WorldInspectorPlugin,
};
use bevy_panorbit_camera::{
    PanOrbitCamera,
    PanOrbitCameraPlugin,
};

use bevy_pointcloud_player::{
    FramePlayer,
    NudgeDirection,
    PointCloudPlayerPlugin,
    StatusMessage,
    ViewerCommand,
    ViewerSettings,
    utils::{
        PointCloudViewer,
        log,
        setup_hooks,
    },
};


const RATE_STEP: f64 = 0.05;


fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(Vec3::new(0.0, 2.5, 4.0)),
        Tonemapping::None,
        PanOrbitCamera {
            focus: Vec3::new(0.0, 2.1, -3.0),
            allow_upside_down: true,
            ..default()
        },
        Name::new("camera"),
    ));
}


fn keyboard_commands(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<ViewerSettings>,
    player: Res<FramePlayer>,
    mut commands: EventWriter<ViewerCommand>,
) {
    let shift = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);

    let nudges = [
        (KeyCode::ArrowRight, NudgeDirection::PosX),
        (KeyCode::ArrowLeft, NudgeDirection::NegX),
        (KeyCode::PageUp, NudgeDirection::PosY),
        (KeyCode::PageDown, NudgeDirection::NegY),
    ];
    for (key, direction) in nudges {
        if keys.just_pressed(key) {
            commands.write(ViewerCommand::Nudge(direction));
        }
    }

    if keys.just_pressed(KeyCode::ArrowUp) {
        commands.write(ViewerCommand::Nudge(if shift {
            NudgeDirection::PosY
        } else {
            NudgeDirection::NegZ
        }));
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        commands.write(ViewerCommand::Nudge(if shift {
            NudgeDirection::NegY
        } else {
            NudgeDirection::PosZ
        }));
    }

    if keys.just_pressed(KeyCode::KeyN) {
        commands.write(ViewerCommand::NextModel);
    }
    if keys.just_pressed(KeyCode::KeyF) {
        commands.write(ViewerCommand::CycleFolder);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        commands.write(ViewerCommand::ResetPosition);
    }
    if keys.just_pressed(KeyCode::KeyO) {
        commands.write(ViewerCommand::ResetPresetOffset);
    }
    if keys.just_pressed(KeyCode::KeyU) {
        commands.write(ViewerCommand::SetFlip(!settings.flip_upside_down));
    }
    if keys.just_pressed(KeyCode::KeyM) {
        commands.write(ViewerCommand::SetMorph(!settings.morph_enabled));
    }
    if keys.just_pressed(KeyCode::KeyA) {
        commands.write(ViewerCommand::SetAutoSwitch(!settings.auto_switch));
    }
    if keys.just_pressed(KeyCode::KeyQ) {
        commands.write(ViewerCommand::ToggleSequenceMode);
    }
    if keys.just_pressed(KeyCode::KeyC) {
        commands.write(ViewerCommand::Clear);
    }

    if keys.just_pressed(KeyCode::Equal) {
        commands.write(ViewerCommand::SetSubsampleRate(settings.subsample_rate + RATE_STEP));
    }
    if keys.just_pressed(KeyCode::Minus) {
        commands.write(ViewerCommand::SetSubsampleRate(settings.subsample_rate - RATE_STEP));
    }

    if keys.just_pressed(KeyCode::Space) {
        commands.write(if player.is_playing() {
            ViewerCommand::Pause
        } else {
            ViewerCommand::Play
        });
    }
    if keys.just_pressed(KeyCode::KeyS) {
        commands.write(ViewerCommand::Stop);
    }
    if keys.just_pressed(KeyCode::Period) {
        commands.write(ViewerCommand::NextFrame);
    }
    if keys.just_pressed(KeyCode::Comma) {
        commands.write(ViewerCommand::PreviousFrame);
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        commands.write(ViewerCommand::SetPlaybackFps(settings.playback_fps + 1.0));
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        commands.write(ViewerCommand::SetPlaybackFps(settings.playback_fps - 1.0));
    }
}


fn viewer_app() {
    let config = parse_args::<PointCloudViewer>();
    log(&format!("{config:?}"));

    let mut app = App::new();

    #[cfg(target_arch = "wasm32")]
    let primary_window = Some(Window {
        fit_canvas_to_parent: true,
        mode: bevy::window::WindowMode::Windowed,
        present_mode: bevy::window::PresentMode::AutoVsync,
        prevent_default_event_handling: true,
        title: config.name.clone(),
        ..default()
    });

    #[cfg(not(target_arch = "wasm32"))]
    let primary_window = Some(Window {
        mode: bevy::window::WindowMode::Windowed,
        present_mode: bevy::window::PresentMode::AutoVsync,
        prevent_default_event_handling: false,
        resolution: (config.width, config.height).into(),
        title: config.name.clone(),
        ..default()
    });

    app.insert_resource(ClearColor(Color::srgb_u8(0, 0, 0)));

    #[cfg(feature = "web_asset")]
    app.add_plugins(bevy_web_asset::WebAssetPlugin::default());

    app.add_plugins(
        DefaultPlugins
            .set(ImagePlugin::default_nearest())
            .set(WindowPlugin {
                primary_window,
                ..default()
            }),
    );
    app.add_plugins(BevyArgsPlugin::<PointCloudViewer>::default());
    app.add_plugins(PanOrbitCameraPlugin);

    if config.editor {
        app.add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        });
        app.add_plugins(WorldInspectorPlugin::new());
    }

    if config.press_esc_close {
        app.add_systems(Update, esc_close);
    }

    if config.show_fps {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        app.add_systems(Startup, fps_display_setup);
        app.add_systems(Update, fps_update_system);
    }

    app.add_plugins(PointCloudPlayerPlugin);
    app.add_systems(Startup, (setup_camera, status_display_setup));
    app.add_systems(
        Update,
        (
            keyboard_commands.before(bevy_pointcloud_player::PointCloudSystems::Command),
            status_update_system,
        ),
    );

    app.run();
}


pub fn esc_close(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}


#[derive(Component)]
struct FpsText;

fn fps_display_setup(mut commands: Commands) {
    commands.spawn((
        Text::new("fps: "),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(5.0),
            left: Val::Px(15.0),
            ..default()
        },
        FpsText,
    ));
}

fn fps_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                **text = format!("fps: {value:.2}");
            }
        }
    }
}


#[derive(Component)]
struct StatusText;

fn status_display_setup(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(5.0),
            left: Val::Px(15.0),
            ..default()
        },
        StatusText,
    ));
}

fn status_update_system(
    status: Res<StatusMessage>,
    settings: Res<ViewerSettings>,
    player: Res<FramePlayer>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    if !(status.is_changed() || settings.is_changed() || player.is_changed()) {
        return;
    }

    let mode = if settings.sequence_mode {
        format!(
            "frame {}/{} @ {} fps{}",
            player.current_frame() + 1,
            player.total_frames(),
            player.fps(),
            if player.is_playing() { " (playing)" } else { "" },
        )
    } else {
        "model".to_string()
    };

    for mut text in &mut query {
        **text = format!(
            "{}\n{} | rate {:.2} | morph {}",
            status.0,
            mode,
            settings.subsample_rate,
            if settings.morph_enabled { "on" } else { "off" },
        );
    }
}


pub fn main() {
    setup_hooks();
    viewer_app();
}
