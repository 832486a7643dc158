//! Scenario tests for the scene tree
//!
//! A small skinned character template is instanced into a scene and then
//! inspected, animated and destroyed.

mod skinning;

use std::sync::Arc;

use crate::animation::{AnimChannel, Animation};
use crate::core::config::{AnimationConfig, ApplicationConfig};
use crate::foundation::collections::ComponentId;
use crate::foundation::math::{LocalTransform, Mat4, Vec3};
use crate::physics::{CollisionObject, CollisionShape};
use crate::render::{Material, MaterialRegistry, Mesh};
use crate::scene::{ComponentKind, SceneTree};
use crate::template::{TemplateNode, TemplateTree};

pub(super) const CHARACTER_PATH: &str = "models/character.dae";

/// Template layout (pre-order):
///
/// ```text
/// models/character.dae
///   body            (mesh, sphere collider)
///   *hips           (0, 1, 0)
///     *spine        (0, 0.5, 0)
///       head
/// ```
///
/// One animation, `walk`, moves hips from y = 1 to y = 2 over 10 ticks at
/// 10 ticks per second.
pub(super) fn character_tree() -> TemplateTree {
    crate::foundation::logging::init_for_tests();

    let skin = Arc::new(Material::new("skin"));
    let body_mesh = Arc::new(Mesh::new("body").with_counts(24, 36).with_skinning(true).with_material(skin));

    let mut tree = TemplateTree::new(CHARACTER_PATH);
    {
        let root = tree.root_mut();
        let body = root.add_child(TemplateNode::mesh("body").with_mesh(body_mesh));
        body.set_collision_template(Some(CollisionObject::new().with_shape(CollisionShape::sphere(0.5))));

        let hips = root.add_child(
            TemplateNode::bone("hips").with_transform(LocalTransform::from_position(Vec3::new(0.0, 1.0, 0.0))),
        );
        if let Some(bone) = hips.as_bone_bearing_mut() {
            bone.bone_offset = Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0));
        }

        let spine = hips.add_child(
            TemplateNode::bone("spine").with_transform(LocalTransform::from_position(Vec3::new(0.0, 0.5, 0.0))),
        );
        if let Some(bone) = spine.as_bone_bearing_mut() {
            bone.bone_offset = Mat4::new_translation(&Vec3::new(0.0, -1.5, 0.0));
        }
        spine.add_generic_child("head");
    }
    tree.assign_bone_ids();

    tree.add_animation(
        Animation::new("walk", 10.0, 10.0).with_channel(
            AnimChannel::new("hips")
                .with_position_key(0.0, Vec3::new(0.0, 1.0, 0.0))
                .with_position_key(10.0, Vec3::new(0.0, 2.0, 0.0)),
        ),
    );
    tree
}

/// Scene whose instanced animations start playing immediately
pub(super) fn auto_play_scene() -> SceneTree {
    let mut config = ApplicationConfig::default();
    config.animation = AnimationConfig::new().with_auto_play(true);
    SceneTree::with_config(&config)
}

/// Generic component at `position` under the scene root
pub(super) fn spawn_point(scene: &mut SceneTree, position: Vec3) -> ComponentId {
    scene
        .create_component(scene.root(), "spawn", LocalTransform::from_position(position), ComponentKind::Generic)
        .unwrap()
}

pub(super) fn materials() -> MaterialRegistry {
    let mut materials = MaterialRegistry::new();
    materials.register(Material::new("gold").with_color(1.0, 0.84, 0.0));
    materials
}
