use bevy::{
    prelude::*,
    asset::RenderAssetUsages,
    render::{
        mesh::{
            MeshVertexAttribute,
            PrimitiveTopology,
            VertexAttributeValues,
        },
        render_resource::VertexFormat,
        view::NoFrustumCulling,
    },
};

use crate::resample::{
    RenderSet,
    Resampler,
};


pub const ATTRIBUTE_EVAPORATION_FACTOR: MeshVertexAttribute = MeshVertexAttribute::new(
    "Vertex_EvaporationFactor",
    988_540_917,
    VertexFormat::Float32,
);


/// Entity mirroring one render set generation.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PointCloudDrawable {
    pub generation: u64,
}


#[derive(Debug, Resource)]
pub struct PointCloudMaterial(pub Handle<StandardMaterial>);

impl FromWorld for PointCloudMaterial {
    fn from_world(world: &mut World) -> Self {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();

        Self(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        }))
    }
}


fn to_rgba(colors: &[[f32; 3]]) -> Vec<[f32; 4]> {
    colors
        .iter()
        .map(|[r, g, b]| [*r, *g, *b, 1.0])
        .collect()
}

pub fn build_point_mesh(render_set: &RenderSet) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::PointList,
        RenderAssetUsages::default(),
    );

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, render_set.positions().to_vec());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, to_rgba(render_set.colors()));
    mesh.insert_attribute(
        ATTRIBUTE_EVAPORATION_FACTOR,
        render_set.evaporation_factors().to_vec(),
    );

    mesh
}

/// Overwrites the flagged attributes of `mesh` without reallocating it.
pub fn update_point_mesh(
    mesh: &mut Mesh,
    render_set: &RenderSet,
    positions: bool,
    colors: bool,
) {
    if positions {
        if let Some(VertexAttributeValues::Float32x3(live)) = mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION) {
            live.copy_from_slice(render_set.positions());
        }
    }

    if colors {
        if let Some(VertexAttributeValues::Float32x4(live)) = mesh.attribute_mut(Mesh::ATTRIBUTE_COLOR) {
            for (live, [r, g, b]) in live.iter_mut().zip(render_set.colors()) {
                *live = [*r, *g, *b, 1.0];
            }
        }
    }
}


#[derive(Default)]
pub struct PointCloudRenderPlugin;

impl Plugin for PointCloudRenderPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PointCloudDrawable>();

        app.init_resource::<PointCloudMaterial>();

        app.add_systems(
            Update,
            tick_morph.in_set(crate::PointCloudSystems::Morph),
        );
        app.add_systems(
            Update,
            sync_drawable.in_set(crate::PointCloudSystems::Sync),
        );
    }
}


pub fn tick_morph(
    time: Res<Time>,
    mut resampler: ResMut<Resampler>,
) {
    if resampler.is_morphing() {
        resampler.tick(time.elapsed_secs());
    }
}


pub fn sync_drawable(
    mut commands: Commands,
    mut resampler: ResMut<Resampler>,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Res<PointCloudMaterial>,
    mut drawables: Query<(
        Entity,
        &PointCloudDrawable,
        &Mesh3d,
        &mut Transform,
    )>,
) {
    let dirty = resampler.take_dirty();
    let transform = resampler.transform().to_transform();
    let render_set = resampler.render_set();
    let generation = render_set.map(RenderSet::generation);

    let mut live = false;

    for (entity, drawable, mesh, mut drawable_transform) in drawables.iter_mut() {
        if Some(drawable.generation) != generation {
            debug!(generation = drawable.generation, "releasing stale drawable");

            meshes.remove(&mesh.0);
            commands.entity(entity).despawn();
            continue;
        }

        live = true;

        if *drawable_transform != transform {
            *drawable_transform = transform;
        }

        let Some(render_set) = render_set else {
            continue;
        };

        if dirty.any() {
            if let Some(mesh) = meshes.get_mut(&mesh.0) {
                update_point_mesh(mesh, render_set, dirty.positions, dirty.colors);
            }
        }
    }

    if live {
        return;
    }

    let Some(render_set) = render_set else {
        return;
    };

    debug!(
        generation = render_set.generation(),
        points = render_set.len(),
        "spawning drawable"
    );

    commands.spawn((
        Name::new("point_cloud"),
        PointCloudDrawable {
            generation: render_set.generation(),
        },
        Mesh3d(meshes.add(build_point_mesh(render_set))),
        MeshMaterial3d(material.0.clone()),
        transform,
        Visibility::Visible,
        NoFrustumCulling,
    ));
}
