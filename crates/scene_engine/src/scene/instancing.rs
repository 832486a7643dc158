//! Instancing template trees into a scene
//!
//! Instancing walks a [`TemplateTree`] in pre-order and creates one component
//! per template node under a target component. Meshes stay shared with the
//! template; bones are collected into a fresh [`SkeletonInfo`]; the tree's
//! animations are bound by name to the new subtree and handed to an animation
//! manager component.

use std::sync::Arc;

use crate::animation::{AnimationInstance, AnimationManager, ChannelBinding};
use crate::foundation::collections::{ComponentId, SkeletonId};
use crate::foundation::math::LocalTransform;
use crate::render::{Material, MaterialRegistry, MeshInstance};
use crate::template::{NodeKind, TemplateNode, TemplateTree};
use super::component::{BoneData, ComponentKind, ModelData};
use super::skeleton::{SkeletonBone, SkeletonInfo};
use super::tree::SceneTree;

/// What one instancing pass created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceInfo {
    /// Component created for the template root, child of the target
    pub root: ComponentId,
    /// Skeleton assembled from the tree's bone nodes
    pub skeleton: Option<SkeletonId>,
    /// Animation manager component, last child of [`root`](Self::root)
    pub animation_manager: Option<ComponentId>,
    /// Components created for template nodes (the animation manager excluded)
    pub component_count: usize,
}

impl SceneTree {
    /// Instance `tree` as a new subtree under `target`
    ///
    /// `override_material` names a material in `materials` that replaces the
    /// material of every instanced mesh. A missing material or an unmapped
    /// bone is logged and instancing carries on. Returns `None` only when
    /// `target` is not a live component.
    pub fn instantiate(
        &mut self,
        tree: &TemplateTree,
        target: ComponentId,
        override_material: Option<&str>,
        materials: &MaterialRegistry,
    ) -> Option<InstanceInfo> {
        if !self.contains(target) {
            log::error!("Cannot instance '{}' under stale component {:?}", tree.path(), target);
            return None;
        }

        let override_material = override_material.and_then(|name| {
            let material = materials.get(name);
            if material.is_none() {
                log::warn!("Override material '{}' for '{}' not found; keeping defaults", name, tree.path());
            }
            material
        });
        if self.scene_config.debug_template_trees {
            log::debug!("Instancing template tree '{}':\n{}", tree.path(), tree);
        }
        let skeleton = tree.has_bone_nodes().then(|| self.skeletons.insert(SkeletonInfo::new()));

        let mut root = None;
        let mut component_count = 0;
        let mut stack: Vec<(&TemplateNode, ComponentId)> = vec![(tree.root(), target)];

        while let Some((node, parent)) = stack.pop() {
            let kind = instance_kind(tree, node, override_material.as_ref(), skeleton);
            let id = match self.create_component(parent, node.name(), *node.template_transform(), kind) {
                Ok(id) => id,
                Err(err) => {
                    log::error!("Skipping template node '{}': {}", node.name(), err);
                    continue;
                }
            };
            component_count += 1;
            root.get_or_insert(id);

            self.register_with_skeleton(id, skeleton);
            if let Some(collision) = node.instantiate_collision_object() {
                if let Err(err) = self.set_collision_object(id, Some(collision)) {
                    log::warn!("Collision object of '{}' not attached: {}", node.name(), err);
                }
            }

            stack.extend(node.children().iter().rev().map(|child| (child, id)));
        }

        let root = root?;
        let animation_manager = self.instance_animations(tree, root);

        if let Some(skeleton_id) = skeleton {
            let root_transform = self.component(root).map(|component| component.transform());
            if let (Some(skeleton), Some(transform)) = (self.skeletons.get_mut(skeleton_id), root_transform) {
                skeleton.finalize(transform);
                log::debug!(
                    "Skeleton for '{}' holds {} bones ({} matrices)",
                    tree.path(),
                    skeleton.bones().len(),
                    skeleton.bone_count()
                );
            }
        }

        log::info!("Instanced '{}' with {} components", tree.path(), component_count);
        Some(InstanceInfo {
            root,
            skeleton,
            animation_manager,
            component_count,
        })
    }

    fn register_with_skeleton(&mut self, id: ComponentId, skeleton: Option<SkeletonId>) {
        let (Some(skeleton_id), Some(component)) = (skeleton, self.component(id)) else {
            return;
        };
        let bone = match component.kind() {
            ComponentKind::Model(_) => None,
            ComponentKind::Bone(BoneData { bone_id: Some(bone_id), offset, .. }) => Some(SkeletonBone {
                component: id,
                transform: component.transform(),
                bone_id: *bone_id,
                offset: *offset,
            }),
            _ => return,
        };
        let Some(skeleton) = self.skeletons.get_mut(skeleton_id) else {
            return;
        };
        match bone {
            Some(bone) => skeleton.add_bone(bone),
            None => skeleton.add_model(id),
        }
    }

    /// Bind every animation of `tree` to the subtree under `root`
    fn instance_animations(&mut self, tree: &TemplateTree, root: ComponentId) -> Option<ComponentId> {
        if tree.animation_count() == 0 {
            return None;
        }
        let config = self.animation_config.clone();
        let mut manager = AnimationManager::new();

        for animation in tree.animations() {
            let bindings: Vec<ChannelBinding> = animation
                .channels
                .iter()
                .enumerate()
                .filter_map(|(channel, anim_channel)| {
                    let target = self.search_from(root, &anim_channel.name);
                    if target.is_none() {
                        log::debug!(
                            "Channel '{}' of animation '{}' matches no component",
                            anim_channel.name,
                            animation.name
                        );
                    }
                    let transform = self.component(target?)?.transform();
                    Some(ChannelBinding { channel, transform })
                })
                .collect();

            let mut instance = AnimationInstance::new(
                Arc::clone(animation),
                config.default_loop_mode,
                config.default_ticks_per_second,
            )
            .with_bindings(bindings);
            if config.auto_play {
                instance.play();
            }
            manager.add_instance(instance);
        }

        let name = self.scene_config.animation_manager_name.clone();
        match self.create_component(root, name, LocalTransform::identity(), ComponentKind::AnimationManager(manager)) {
            Ok(id) => Some(id),
            Err(err) => {
                log::error!("Animation manager for '{}' not created: {}", tree.path(), err);
                None
            }
        }
    }
}

fn instance_kind(
    tree: &TemplateTree,
    node: &TemplateNode,
    override_material: Option<&Arc<Material>>,
    skeleton: Option<SkeletonId>,
) -> ComponentKind {
    match node.kind() {
        NodeKind::Generic => ComponentKind::Generic,
        NodeKind::Mesh(payload) => {
            let material = override_material.or(payload.override_material.as_ref());
            let meshes = payload
                .meshes
                .iter()
                .map(|mesh| match material {
                    Some(material) => MeshInstance::with_override(Arc::clone(mesh), Arc::clone(material)),
                    None => MeshInstance::new(Arc::clone(mesh)),
                })
                .collect();
            ComponentKind::Model(ModelData { meshes, skeleton })
        }
        NodeKind::Bone(payload) => {
            let bone_id = payload.bone_id.or_else(|| tree.bone_mapping().find_bone_id(node.name()));
            if bone_id.is_none() {
                log::warn!("Bone '{}' of '{}' has no bone ID; not skinned", node.name(), tree.path());
            }
            ComponentKind::Bone(BoneData {
                bone_id,
                offset: payload.bone_offset,
                skeleton,
            })
        }
    }
}
