//! Skeleton Demo
//!
//! Instances a procedurally built arm into a scene and plays its animation:
//! - Three-bone arm with a skinned mesh and a collider
//! - "swing" animation bending the shoulder and elbow
//! - Fly camera moving forward while W is held
//! - A scripted component spinning a marker
//!
//! Skinning matrices are logged every frame at info level.

use std::sync::Arc;

use scene_engine::foundation::logging;
use scene_engine::foundation::math::utils::deg_to_rad;
use scene_engine::prelude::*;
use scene_engine::scene::CameraData;
use thiserror::Error;

const ARM_PATH: &str = "models/arm.dae";
const FRAME_COUNT: usize = 12;
const FRAME_TIME: f32 = 1.0 / 6.0;

/// Demo failures
#[derive(Error, Debug)]
enum DemoError {
    /// Scene mutation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Model could not be loaded or instanced
    #[error("Failed to instance '{0}'")]
    Instance(String),
}

/// Builds the arm template in code instead of parsing a file
fn build_arm(path: &str) -> Result<TemplateTree, AssetError> {
    if !path.ends_with(ARM_PATH) {
        return Err(AssetError::NotFound(path.to_string()));
    }

    let skin = Arc::new(Material::new("skin").with_color(0.9, 0.7, 0.6));
    let arm_mesh = Arc::new(Mesh::new("arm_mesh").with_counts(96, 180).with_skinning(true).with_material(skin));

    let mut tree = TemplateTree::new(path);
    {
        let root = tree.root_mut();
        root.add_child(TemplateNode::mesh("arm_mesh").with_mesh(arm_mesh));

        let shoulder = root.add_bone_child("shoulder");
        let elbow = shoulder.add_child(
            TemplateNode::bone("elbow").with_transform(LocalTransform::from_position(Vec3::new(1.0, 0.0, 0.0))),
        );
        if let Some(bone) = elbow.as_bone_bearing_mut() {
            bone.bone_offset = Mat4::new_translation(&Vec3::new(-1.0, 0.0, 0.0));
        }
        let wrist = elbow.add_child(
            TemplateNode::bone("wrist").with_transform(LocalTransform::from_position(Vec3::new(1.0, 0.0, 0.0))),
        );
        if let Some(bone) = wrist.as_bone_bearing_mut() {
            bone.bone_offset = Mat4::new_translation(&Vec3::new(-2.0, 0.0, 0.0));
        }
        wrist.set_collision_template(Some(CollisionObject::new().with_shape(CollisionShape::sphere(0.25))));
    }
    tree.assign_bone_ids();

    let bent = Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(60.0));
    tree.add_animation(
        Animation::new("swing", 48.0, 24.0)
            .with_channel(
                AnimChannel::new("shoulder")
                    .with_rotation_key(0.0, Quat::identity())
                    .with_rotation_key(24.0, bent)
                    .with_rotation_key(48.0, Quat::identity()),
            )
            .with_channel(
                AnimChannel::new("elbow")
                    .with_rotation_key(0.0, Quat::identity())
                    .with_rotation_key(48.0, bent),
            ),
    );
    Ok(tree)
}

/// Spins its component around the y axis
struct Spinner {
    degrees_per_sec: f32,
}

impl ComponentScript for Spinner {
    fn on_start(&mut self, ctx: &mut ScriptContext<'_>) {
        log::info!("Spinner '{}' started", ctx.name);
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        let step = Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(self.degrees_per_sec * dt));
        let rotation = step * ctx.transform.rotation();
        ctx.transform.set_rotation(rotation);
    }
}

fn run() -> Result<(), DemoError> {
    let mut config = ApplicationConfig::default();
    config.animation = AnimationConfig::new().with_auto_play(true);
    config.scene = SceneConfig::new().with_tree_debugging(true);
    logging::init_with_level(&config.engine.log_level);

    let mut context = EngineContext::from_config(config);
    context.materials.register(Material::new("bronze").with_color(0.8, 0.5, 0.2).with_shininess(64.0));
    let mut scene = context.create_scene();

    let root = scene.root();
    let spawn = scene.create_component(
        root,
        "spawn",
        LocalTransform::from_position(Vec3::new(0.0, 0.0, -5.0)),
        ComponentKind::Generic,
    )?;
    let camera = scene.create_component(
        root,
        "camera",
        LocalTransform::from_position(Vec3::new(0.0, 1.0, 3.0)),
        ComponentKind::Camera(CameraData::new(16.0 / 9.0).with_speed(2.0).with_active(true)),
    )?;
    scene.create_component(
        spawn,
        "marker",
        LocalTransform::from_position(Vec3::new(0.0, 2.0, 0.0)),
        ComponentKind::Scripted(Box::new(Spinner { degrees_per_sec: 90.0 })),
    )?;

    let mut loader = build_arm;
    let instance = context
        .load_model(&mut scene, ARM_PATH, spawn, Some("bronze"), &mut loader)
        .ok_or_else(|| DemoError::Instance(ARM_PATH.to_string()))?;
    let skeleton = instance.skeleton.ok_or_else(|| DemoError::Instance(ARM_PATH.to_string()))?;
    log::info!(
        "Instanced {} components, {} physics bodies",
        instance.component_count,
        scene.collisions().len()
    );

    let mut input = InputManager::new();
    input.handle_key_input(KeyCode::W, true);

    scene.on_start_all();
    for frame in 0..FRAME_COUNT {
        scene.handle_inputs_all(&input, FRAME_TIME);
        scene.update_all(FRAME_TIME);
        scene.update_skeletons();
        input.update();

        let Some(info) = scene.skeleton(skeleton) else {
            break;
        };
        for bone in info.bones() {
            if let Some(matrix) = info.batch().get(bone.bone_id) {
                let origin = matrix.column(3).xyz();
                log::info!(
                    "frame {:2} bone {} -> ({:6.3}, {:6.3}, {:6.3})",
                    frame,
                    bone.bone_id,
                    origin.x,
                    origin.y,
                    origin.z
                );
            }
        }
    }

    if let Some(position) = scene.world_transform(camera).map(|world| world.position) {
        log::info!("Camera ended at ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
    }
    let destroyed = scene.destroy(instance.root)?;
    log::info!("Destroyed {} components; {} skeletons left", destroyed, scene.skeletons().count());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Skeleton Demo ===");
    println!("Instancing '{}' and playing 'swing' for {} frames", ARM_PATH, FRAME_COUNT);
    println!();

    run()?;
    Ok(())
}
