//! Runtime component tree
//!
//! [`SceneTree`] owns every component, transform and skeleton of one scene.
//! Components refer to each other through [`ComponentId`] handles; child
//! transforms are linked to their parent component's transform while
//! attached, so world matrices follow the component hierarchy.
//!
//! Traversals are pre-order with children in insertion order. Per frame the
//! host calls [`SceneTree::handle_inputs_all`], then [`SceneTree::update_all`],
//! then [`SceneTree::update_skeletons`] before collecting render data.

use std::sync::Arc;

use crate::animation::{AnimChannel, Animation, AnimationInstance, AnimationManager, FieldValue, Interpolate, Keyframe, TransformField};
use crate::core::config::{AnimationConfig, ApplicationConfig, SceneConfig};
use crate::foundation::collections::{ComponentId, ComponentMap, SkeletonId, SlotMap};
use crate::foundation::math::{LocalTransform, Mat4};
use crate::input::InputState;
use crate::physics::{CollisionObject, CollisionRegistry, PhysicsBackend};
use crate::render::{Material, Mesh};
use super::component::{Component, ComponentKind, ScriptContext};
use super::error::SceneError;
use super::skeleton::SkeletonInfo;
use super::transform::{Transform, TransformArena};

/// Name given to the root component of every scene
pub const ROOT_NAME: &str = "root";

/// Owner of a scene's component hierarchy
#[derive(Debug)]
pub struct SceneTree {
    components: ComponentMap<Component>,
    transforms: TransformArena,
    pub(crate) skeletons: SlotMap<SkeletonId, SkeletonInfo>,
    collisions: CollisionRegistry,
    root: ComponentId,
    pub(crate) scene_config: SceneConfig,
    pub(crate) animation_config: AnimationConfig,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Create a scene holding only its root component
    pub fn new() -> Self {
        Self::with_settings(SceneConfig::default(), AnimationConfig::default())
    }

    /// Create a scene using the scene and animation sections of `config`
    pub fn with_config(config: &ApplicationConfig) -> Self {
        let mut animation_config = config.animation.clone();
        animation_config.sanitize();
        Self::with_settings(config.scene.clone(), animation_config)
    }

    fn with_settings(scene_config: SceneConfig, animation_config: AnimationConfig) -> Self {
        let mut components = ComponentMap::with_key();
        let mut transforms = TransformArena::new();
        let root_transform = transforms.insert(Transform::default());
        let root = components.insert(Component::new(ROOT_NAME.to_string(), root_transform, ComponentKind::Generic));

        log::debug!("Created scene tree with root {:?}", root);
        Self {
            components,
            transforms,
            skeletons: SlotMap::with_key(),
            collisions: CollisionRegistry::new(),
            root,
            scene_config,
            animation_config,
        }
    }

    /// Root component
    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Scene settings
    pub fn scene_config(&self) -> &SceneConfig {
        &self.scene_config
    }

    /// Animation settings used for instancing and animation queueing
    pub fn animation_config(&self) -> &AnimationConfig {
        &self.animation_config
    }

    /// Component by handle
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Mutable component by handle
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id)
    }

    /// Whether `id` refers to a live component
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Number of live components, detached ones included
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// A scene always holds its root
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Every transform in the scene
    pub fn transforms(&self) -> &TransformArena {
        &self.transforms
    }

    /// Mutable access to every transform in the scene
    pub fn transforms_mut(&mut self) -> &mut TransformArena {
        &mut self.transforms
    }

    /// Transform of a component
    pub fn transform(&self, id: ComponentId) -> Option<&Transform> {
        self.components.get(id).and_then(|component| self.transforms.get(component.transform))
    }

    /// Mutable transform of a component
    pub fn transform_mut(&mut self, id: ComponentId) -> Option<&mut Transform> {
        let transform = self.components.get(id)?.transform;
        self.transforms.get_mut(transform)
    }

    /// World matrix of a component
    pub fn world_matrix(&self, id: ComponentId) -> Option<Mat4> {
        self.components.get(id).and_then(|component| self.transforms.world_matrix(component.transform))
    }

    /// World position, rotation and scale of a component
    pub fn world_transform(&self, id: ComponentId) -> Option<LocalTransform> {
        self.components.get(id).and_then(|component| self.transforms.world_transform(component.transform))
    }

    /// Skeleton by handle
    pub fn skeleton(&self, id: SkeletonId) -> Option<&SkeletonInfo> {
        self.skeletons.get(id)
    }

    /// Every skeleton in the scene
    pub fn skeletons(&self) -> impl Iterator<Item = (SkeletonId, &SkeletonInfo)> {
        self.skeletons.iter()
    }

    /// Registered collision objects
    pub fn collisions(&self) -> &CollisionRegistry {
        &self.collisions
    }

    /// Forward collision registration to a physics engine
    pub fn set_physics_backend(&mut self, backend: Box<dyn PhysicsBackend>) {
        self.collisions.set_backend(backend);
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a component without a parent
    pub fn spawn_detached(&mut self, name: impl Into<String>, local: LocalTransform, kind: ComponentKind) -> ComponentId {
        let transform = self.transforms.insert(Transform::new(local));
        self.components.insert(Component::new(name.into(), transform, kind))
    }

    /// Create a component and attach it as the last child of `parent`
    pub fn create_component(
        &mut self,
        parent: ComponentId,
        name: impl Into<String>,
        local: LocalTransform,
        kind: ComponentKind,
    ) -> Result<ComponentId, SceneError> {
        if !self.components.contains_key(parent) {
            return Err(SceneError::StaleComponent(parent));
        }
        let id = self.spawn_detached(name, local, kind);
        self.add_component(parent, id)?;
        Ok(id)
    }

    /// Attach a detached component as the last child of `parent`
    ///
    /// The child's local fields are kept; its world transform now composes
    /// with the parent's.
    pub fn add_component(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), SceneError> {
        let parent_transform = self.components.get(parent).ok_or(SceneError::StaleComponent(parent))?.transform;
        let child_component = self.components.get(child).ok_or(SceneError::StaleComponent(child))?;
        if child_component.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::ComponentCycle { child, parent });
        }
        let child_transform = child_component.transform;

        self.transforms.set_parent(child_transform, Some(parent_transform))?;
        if let Some(component) = self.components.get_mut(child) {
            component.parent = Some(parent);
        }
        if let Some(component) = self.components.get_mut(parent) {
            component.children.push(child);
        }
        Ok(())
    }

    /// Attach several detached components under `parent`, in order
    ///
    /// Stops at the first component that cannot be attached.
    pub fn add_components(
        &mut self,
        parent: ComponentId,
        children: impl IntoIterator<Item = ComponentId>,
    ) -> Result<(), SceneError> {
        children.into_iter().try_for_each(|child| self.add_component(parent, child))
    }

    fn is_ancestor_or_self(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.components.get(node).and_then(|component| component.parent);
        }
        false
    }

    /// Remove a component from its parent, keeping its subtree alive
    ///
    /// The component's transform is unlinked from the parent's transform.
    pub fn detach(&mut self, id: ComponentId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let component = self.components.get_mut(id).ok_or(SceneError::StaleComponent(id))?;
        let Some(parent) = component.parent.take() else {
            log::debug!("Component '{}' is already detached", component.name);
            return Ok(());
        };
        let transform = component.transform;

        if let Some(parent_component) = self.components.get_mut(parent) {
            parent_component.children.retain(|&child| child != id);
        }
        self.transforms.set_parent(transform, None)
    }

    /// Destroy a component and its whole subtree
    ///
    /// Collision objects are unregistered, bones and models are removed from
    /// their skeletons, and skeletons left empty are dropped. Returns the
    /// number of components destroyed.
    pub fn destroy(&mut self, id: ComponentId) -> Result<usize, SceneError> {
        self.detach(id)?;
        let doomed: Vec<ComponentId> = self.descendants(id).collect();

        for &component_id in &doomed {
            self.collisions.remove(component_id);
            for (_, skeleton) in self.skeletons.iter_mut() {
                skeleton.remove_component(component_id);
            }
            if let Some(component) = self.components.remove(component_id) {
                self.transforms.remove(component.transform);
            }
        }
        self.skeletons.retain(|skeleton_id, skeleton| {
            let keep = !skeleton.is_empty();
            if !keep {
                log::debug!("Dropping empty skeleton {:?}", skeleton_id);
            }
            keep
        });

        log::debug!("Destroyed {} components", doomed.len());
        Ok(doomed.len())
    }

    /// Copy local fields and constraint flags from `source` into a component
    ///
    /// The parent link and running interpolators are untouched.
    pub fn set_transform(&mut self, id: ComponentId, source: &Transform) -> Result<(), SceneError> {
        let transform = self.transform_mut(id).ok_or(SceneError::StaleComponent(id))?;
        transform.copy_fields_from(source);
        Ok(())
    }

    /// Attach a collision object to a component and register it with physics
    ///
    /// The object is bound to the component's transform. Passing `None`
    /// removes and unregisters the current object.
    pub fn set_collision_object(&mut self, id: ComponentId, object: Option<CollisionObject>) -> Result<(), SceneError> {
        let component = self.components.get_mut(id).ok_or(SceneError::StaleComponent(id))?;
        match object {
            Some(mut object) => {
                object.transform = Some(component.transform);
                self.collisions.add(id, &object);
                component.collision = Some(object);
            }
            None => {
                component.collision = None;
                self.collisions.remove(id);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Pre-order iterator over `start` and its descendants
    pub fn descendants(&self, start: ComponentId) -> Descendants<'_> {
        let stack = if self.components.contains_key(start) { vec![start] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// First component named `name` in pre-order from the root
    pub fn search_for_component(&self, name: &str) -> Option<ComponentId> {
        self.search_from(self.root, name)
    }

    /// First component named `name` in pre-order from `start`, `start` included
    pub fn search_from(&self, start: ComponentId, name: &str) -> Option<ComponentId> {
        self.descendants(start)
            .find(|&id| self.components.get(id).is_some_and(|component| component.name == name))
    }

    /// First mesh named `name` drawn under `start`
    pub fn find_mesh(&self, start: ComponentId, name: &str) -> Option<&Mesh> {
        self.find_mesh_ref(start, name).map(|mesh| mesh.as_ref())
    }

    /// Shared handle of the first mesh named `name` drawn under `start`
    pub fn find_mesh_ref(&self, start: ComponentId, name: &str) -> Option<&Arc<Mesh>> {
        self.descendants(start)
            .filter_map(|id| self.components.get(id)?.as_model())
            .flat_map(|model| model.meshes.iter())
            .map(|instance| instance.mesh())
            .find(|mesh| mesh.name == name)
    }

    /// First material named `name` used by a mesh under `start`
    pub fn find_material(&self, start: ComponentId, name: &str) -> Option<&Arc<Material>> {
        self.descendants(start)
            .filter_map(|id| self.components.get(id)?.as_model())
            .flat_map(|model| model.meshes.iter())
            .filter_map(|instance| instance.material())
            .find(|material| material.name == name)
    }

    /// Animation manager of an instance: `id` itself or its first manager child
    pub fn animation_manager(&self, id: ComponentId) -> Option<&AnimationManager> {
        let manager = self.animation_manager_id(id)?;
        self.components.get(manager)?.as_animation_manager()
    }

    /// Mutable animation manager of an instance
    pub fn animation_manager_mut(&mut self, id: ComponentId) -> Option<&mut AnimationManager> {
        let manager = self.animation_manager_id(id)?;
        self.components.get_mut(manager)?.as_animation_manager_mut()
    }

    /// Hand an animation instance to the animation manager component `manager`
    ///
    /// Returns the instance's index within the manager.
    pub fn add_animation_instance(
        &mut self,
        manager: ComponentId,
        instance: AnimationInstance,
    ) -> Result<usize, SceneError> {
        let component = self.components.get_mut(manager).ok_or(SceneError::StaleComponent(manager))?;
        match &mut component.kind {
            ComponentKind::AnimationManager(animations) => Ok(animations.add_instance(instance)),
            kind => {
                log::error!("Component '{}' is a {} component, not an animation manager", component.name, kind.label());
                Err(SceneError::KindMismatch {
                    name: component.name.clone(),
                    expected: "an animation manager",
                })
            }
        }
    }

    fn animation_manager_id(&self, id: ComponentId) -> Option<ComponentId> {
        let component = self.components.get(id)?;
        if component.as_animation_manager().is_some() {
            return Some(id);
        }
        component.children.iter().copied().find(|&child| {
            self.components
                .get(child)
                .is_some_and(|component| component.as_animation_manager().is_some())
        })
    }

    // ------------------------------------------------------------------
    // Per-frame traversal
    // ------------------------------------------------------------------

    fn preorder_ids(&self) -> Vec<ComponentId> {
        self.descendants(self.root).collect()
    }

    /// Run every script's start hook, in pre-order
    pub fn on_start_all(&mut self) {
        for id in self.preorder_ids() {
            let Some(Component { name, transform, kind, .. }) = self.components.get_mut(id) else {
                continue;
            };
            let ComponentKind::Scripted(script) = kind else {
                continue;
            };
            if let Some(transform) = self.transforms.get_mut(*transform) {
                let mut ctx = ScriptContext { component: id, name: name.as_str(), transform };
                script.on_start(&mut ctx);
            }
        }
    }

    /// Advance the scene by `dt` seconds
    ///
    /// For each attached component in pre-order: its transform interpolators
    /// run, then animation managers pose their bound transforms and scripts
    /// update.
    pub fn update_all(&mut self, dt: f32) {
        for id in self.preorder_ids() {
            let Some(Component { name, transform, kind, .. }) = self.components.get_mut(id) else {
                continue;
            };
            self.transforms.update(*transform, dt);
            match kind {
                ComponentKind::AnimationManager(manager) => manager.update(dt, &mut self.transforms),
                ComponentKind::Scripted(script) => {
                    if let Some(transform) = self.transforms.get_mut(*transform) {
                        let mut ctx = ScriptContext { component: id, name: name.as_str(), transform };
                        script.update(&mut ctx, dt);
                    }
                }
                _ => {}
            }
        }
    }

    /// Let cameras and scripts react to input, in pre-order
    pub fn handle_inputs_all(&mut self, input: &dyn InputState, dt: f32) {
        for id in self.preorder_ids() {
            let Some(Component { name, transform, kind, .. }) = self.components.get_mut(id) else {
                continue;
            };
            let Some(transform) = self.transforms.get_mut(*transform) else {
                continue;
            };
            match kind {
                ComponentKind::Camera(camera) => camera.handle_inputs(transform, input, dt),
                ComponentKind::Scripted(script) => {
                    let mut ctx = ScriptContext { component: id, name: name.as_str(), transform };
                    script.handle_inputs(&mut ctx, input, dt);
                }
                _ => {}
            }
        }
    }

    /// Recompute the skinning matrices of every skeleton
    pub fn update_skeletons(&mut self) {
        for (_, skeleton) in self.skeletons.iter_mut() {
            skeleton.update_bone_matrices(&self.transforms);
        }
    }

    // ------------------------------------------------------------------
    // Animation queueing
    // ------------------------------------------------------------------

    /// Queue interpolators for the channel of `animation` named like `id`
    ///
    /// One interpolator is added per consecutive keyframe pair. Key times are
    /// taken as-is: a pair starts at the first key's time and lasts until the
    /// second key's time, measured from now in the same unit as `dt`.
    /// Returns the number of interpolators queued.
    pub fn queue_animation(&mut self, id: ComponentId, animation: &Animation) -> usize {
        let Some(component) = self.components.get(id) else {
            log::warn!("Cannot queue animation '{}' on stale component {:?}", animation.name, id);
            return 0;
        };
        let Some(channel) = animation.find_channel(&component.name) else {
            return 0;
        };
        let Some(transform) = self.transforms.get_mut(component.transform) else {
            return 0;
        };
        queue_channel(transform, channel)
    }

    /// [`queue_animation`](Self::queue_animation) for `id` and every descendant
    pub fn queue_animation_all(&mut self, id: ComponentId, animation: &Animation) -> usize {
        let targets: Vec<ComponentId> = self.descendants(id).collect();
        targets.into_iter().map(|target| self.queue_animation(target, animation)).sum()
    }
}

fn queue_channel(transform: &mut Transform, channel: &AnimChannel) -> usize {
    queue_keys(transform, TransformField::Position, &channel.position_keys)
        + queue_keys(transform, TransformField::Rotation, &channel.rotation_keys)
        + queue_keys(transform, TransformField::Scale, &channel.scale_keys)
}

fn queue_keys<T>(transform: &mut Transform, field: TransformField, keys: &[Keyframe<T>]) -> usize
where
    T: Interpolate + Into<FieldValue>,
{
    let mut queued = 0;
    for pair in keys.windows(2) {
        let duration = pair[1].time - pair[0].time;
        if transform.add_interpolator(field, pair[0].time, duration, pair[0].value, pair[1].value) {
            queued += 1;
        }
    }
    queued
}

/// Pre-order iterator over a component subtree
pub struct Descendants<'a> {
    tree: &'a SceneTree,
    stack: Vec<ComponentId>,
}

impl Iterator for Descendants<'_> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(component) = self.tree.components.get(id) {
            self.stack.extend(component.children.iter().rev().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::CollisionShape;
    use crate::scene::Constraints;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn generic(tree: &mut SceneTree, parent: ComponentId, name: &str, position: Vec3) -> ComponentId {
        tree.create_component(parent, name, LocalTransform::from_position(position), ComponentKind::Generic)
            .unwrap()
    }

    #[test]
    fn test_child_world_follows_parent() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let parent = generic(&mut tree, root, "parent", Vec3::new(1.0, 0.0, 0.0));
        let child = generic(&mut tree, parent, "child", Vec3::new(0.0, 2.0, 0.0));

        let parent_transform = tree.component(parent).unwrap().transform();
        assert_eq!(tree.transforms().parent(tree.component(child).unwrap().transform()), Some(parent_transform));
        assert_relative_eq!(tree.world_transform(child).unwrap().position, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_add_component_rejects_cycles_and_double_attach() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = generic(&mut tree, root, "a", Vec3::zeros());
        let b = generic(&mut tree, a, "b", Vec3::zeros());

        assert_eq!(tree.add_component(b, a), Err(SceneError::AlreadyAttached(a)));
        tree.detach(a).unwrap();
        assert_eq!(tree.add_component(b, a), Err(SceneError::ComponentCycle { child: a, parent: b }));
        assert_eq!(tree.detach(tree.root()), Err(SceneError::RootRemoval));

        let loose = tree.spawn_detached("loose", LocalTransform::identity(), ComponentKind::Generic);
        tree.add_components(tree.root(), [a, loose]).unwrap();
        assert_eq!(tree.component(tree.root()).unwrap().children(), &[a, loose]);
    }

    #[test]
    fn test_search_is_preorder_first_match() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let left = generic(&mut tree, root, "left", Vec3::zeros());
        let deep = generic(&mut tree, left, "twin", Vec3::zeros());
        let right = generic(&mut tree, root, "right", Vec3::zeros());
        generic(&mut tree, right, "twin", Vec3::zeros());

        assert_eq!(tree.search_for_component("twin"), Some(deep));
        assert_eq!(tree.search_for_component("missing"), None);
        assert_ne!(tree.search_from(right, "twin"), Some(deep));
    }

    #[test]
    fn test_set_transform_keeps_parent() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let parent = generic(&mut tree, root, "parent", Vec3::new(5.0, 0.0, 0.0));
        let child = generic(&mut tree, parent, "child", Vec3::zeros());

        let mut source = Transform::new(LocalTransform::from_position(Vec3::new(0.0, 1.0, 0.0)));
        source.set_constraints(Constraints::LOCK_SCALE);
        tree.set_transform(child, &source).unwrap();

        assert_relative_eq!(tree.world_transform(child).unwrap().position, Vec3::new(5.0, 1.0, 0.0), epsilon = 1e-6);
        assert!(tree.transform(child).unwrap().constraints().contains(Constraints::LOCK_SCALE));
    }

    struct RecordingBackend {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl PhysicsBackend for RecordingBackend {
        fn add_collision_object(&mut self, owner: ComponentId, object: &CollisionObject) {
            assert!(object.transform.is_some());
            self.log.borrow_mut().push(format!("add {:?}", owner));
        }

        fn remove_collision_object(&mut self, owner: ComponentId) {
            self.log.borrow_mut().push(format!("remove {:?}", owner));
        }
    }

    #[test]
    fn test_destroy_unregisters_and_frees() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        tree.set_physics_backend(Box::new(RecordingBackend { log: Rc::clone(&log) }));

        let parent = generic(&mut tree, root, "parent", Vec3::zeros());
        let child = generic(&mut tree, parent, "child", Vec3::zeros());
        tree.set_collision_object(child, Some(CollisionObject::new().with_shape(CollisionShape::sphere(1.0))))
            .unwrap();
        assert!(tree.collisions().contains(child));

        let transforms_before = tree.transforms().len();
        assert_eq!(tree.destroy(parent), Ok(2));
        assert!(!tree.contains(child));
        assert!(tree.collisions().is_empty());
        assert_eq!(tree.transforms().len(), transforms_before - 2);
        assert!(tree.component(tree.root()).unwrap().children().is_empty());
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(tree.destroy(parent), Err(SceneError::StaleComponent(parent)));
    }

    #[test]
    fn test_queue_animation_uses_key_times() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let arm = generic(&mut tree, root, "arm", Vec3::zeros());
        let animation = Animation::new("wave", 20.0, 10.0).with_channel(
            AnimChannel::new("arm")
                .with_position_key(0.0, Vec3::zeros())
                .with_position_key(1.0, Vec3::new(2.0, 0.0, 0.0))
                .with_position_key(3.0, Vec3::new(2.0, 4.0, 0.0)),
        );

        assert_eq!(tree.queue_animation_all(root, &animation), 2);
        tree.update_all(0.5);
        assert_relative_eq!(tree.transform(arm).unwrap().position(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        tree.update_all(1.5);
        assert_relative_eq!(tree.transform(arm).unwrap().position(), Vec3::new(2.0, 2.0, 0.0), epsilon = 1e-5);
        tree.update_all(1.0);
        assert_relative_eq!(tree.transform(arm).unwrap().position(), Vec3::new(2.0, 4.0, 0.0), epsilon = 1e-5);
        assert!(tree.transform(arm).unwrap().interpolators().is_empty());
    }

    #[test]
    fn test_queue_animation_ignores_missing_tick_rate() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let arm = generic(&mut tree, root, "arm", Vec3::zeros());
        let animation = Animation::new("wave", 1.0, 0.0).with_channel(
            AnimChannel::new("arm")
                .with_position_key(0.0, Vec3::zeros())
                .with_position_key(1.0, Vec3::new(2.0, 0.0, 0.0)),
        );

        assert_eq!(tree.queue_animation(arm, &animation), 1);
        tree.update_all(0.5);
        assert_relative_eq!(tree.transform(arm).unwrap().position(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        tree.update_all(1.0);
        assert_relative_eq!(tree.transform(arm).unwrap().position(), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
        assert!(tree.transform(arm).unwrap().interpolators().is_empty());
    }
}
