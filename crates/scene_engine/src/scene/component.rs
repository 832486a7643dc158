//! Scene components
//!
//! A [`Component`] is one node of the live scene hierarchy. Structure (parent,
//! children, transform handle) is the same for every component; what the
//! component does is carried by its [`ComponentKind`] payload.

use std::fmt;

use crate::animation::AnimationManager;
use crate::foundation::collections::{ComponentId, SkeletonId, TransformId};
use crate::foundation::math::Mat4;
use crate::input::InputState;
use crate::physics::CollisionObject;
use crate::render::MeshInstance;
use crate::template::BoneId;
use super::kinds::{CameraData, LightData, SoundSourceData, TextData};
use super::transform::Transform;

/// Meshes drawn by a model component
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    /// Mesh instances in draw order
    pub meshes: Vec<MeshInstance>,
    /// Skeleton deforming these meshes
    pub skeleton: Option<SkeletonId>,
}

/// Skeleton bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneData {
    /// Bone ID, `None` when the bone could not be mapped
    pub bone_id: Option<BoneId>,
    /// Mesh space to bone space in bind pose
    pub offset: Mat4,
    /// Skeleton this bone belongs to
    pub skeleton: Option<SkeletonId>,
}

/// What a script sees of its own component
pub struct ScriptContext<'a> {
    /// Handle of the component running the script
    pub component: ComponentId,
    /// Component name
    pub name: &'a str,
    /// Component transform
    pub transform: &'a mut Transform,
}

/// User behaviour attached to a component
pub trait ComponentScript {
    /// Called once by [`SceneTree::on_start_all`](super::SceneTree::on_start_all)
    fn on_start(&mut self, _ctx: &mut ScriptContext<'_>) {}

    /// Called every frame after the component's interpolators have run
    fn update(&mut self, _ctx: &mut ScriptContext<'_>, _dt: f32) {}

    /// Called every frame during input handling
    fn handle_inputs(&mut self, _ctx: &mut ScriptContext<'_>, _input: &dyn InputState, _dt: f32) {}
}

/// Component payload
pub enum ComponentKind {
    /// No behaviour beyond its transform
    Generic,
    /// Draws meshes
    Model(ModelData),
    /// Skinning bone
    Bone(BoneData),
    /// Camera
    Camera(CameraData),
    /// Light source
    Light(LightData),
    /// Audio emitter
    SoundSource(SoundSourceData),
    /// Text label
    Text(TextData),
    /// Plays the animations of an instanced template tree
    AnimationManager(AnimationManager),
    /// User script
    Scripted(Box<dyn ComponentScript>),
}

impl ComponentKind {
    /// Short label used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Model(_) => "model",
            Self::Bone(_) => "bone",
            Self::Camera(_) => "camera",
            Self::Light(_) => "light",
            Self::SoundSource(_) => "sound source",
            Self::Text(_) => "text",
            Self::AnimationManager(_) => "animation manager",
            Self::Scripted(_) => "scripted",
        }
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("Generic"),
            Self::Model(data) => f.debug_tuple("Model").field(data).finish(),
            Self::Bone(data) => f.debug_tuple("Bone").field(data).finish(),
            Self::Camera(data) => f.debug_tuple("Camera").field(data).finish(),
            Self::Light(data) => f.debug_tuple("Light").field(data).finish(),
            Self::SoundSource(data) => f.debug_tuple("SoundSource").field(data).finish(),
            Self::Text(data) => f.debug_tuple("Text").field(data).finish(),
            Self::AnimationManager(manager) => f.debug_tuple("AnimationManager").field(manager).finish(),
            Self::Scripted(_) => f.write_str("Scripted(..)"),
        }
    }
}

/// One node of the live scene hierarchy
#[derive(Debug)]
pub struct Component {
    pub(crate) name: String,
    pub(crate) transform: TransformId,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) collision: Option<CollisionObject>,
    pub(crate) kind: ComponentKind,
}

impl Component {
    pub(crate) fn new(name: String, transform: TransformId, kind: ComponentKind) -> Self {
        Self {
            name,
            transform,
            parent: None,
            children: Vec::new(),
            collision: None,
            kind,
        }
    }

    /// Component name (not required to be unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the component
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Handle of the owned transform
    pub fn transform(&self) -> TransformId {
        self.transform
    }

    /// Parent component while attached
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    /// Collision object, if one was attached
    pub fn collision_object(&self) -> Option<&CollisionObject> {
        self.collision.as_ref()
    }

    /// Kind payload
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Mutable kind payload
    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// Model view if the component draws meshes
    pub fn as_model(&self) -> Option<&ModelData> {
        match &self.kind {
            ComponentKind::Model(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable model view
    pub fn as_model_mut(&mut self) -> Option<&mut ModelData> {
        match &mut self.kind {
            ComponentKind::Model(data) => Some(data),
            _ => None,
        }
    }

    /// Bone view if the component is a skeleton bone
    pub fn as_bone(&self) -> Option<&BoneData> {
        match &self.kind {
            ComponentKind::Bone(data) => Some(data),
            _ => None,
        }
    }

    /// Animation manager view
    pub fn as_animation_manager(&self) -> Option<&AnimationManager> {
        match &self.kind {
            ComponentKind::AnimationManager(manager) => Some(manager),
            _ => None,
        }
    }

    /// Mutable animation manager view
    pub fn as_animation_manager_mut(&mut self) -> Option<&mut AnimationManager> {
        match &mut self.kind {
            ComponentKind::AnimationManager(manager) => Some(manager),
            _ => None,
        }
    }

    /// Camera view
    pub fn as_camera(&self) -> Option<&CameraData> {
        match &self.kind {
            ComponentKind::Camera(data) => Some(data),
            _ => None,
        }
    }

    /// Light view
    pub fn as_light(&self) -> Option<&LightData> {
        match &self.kind {
            ComponentKind::Light(data) => Some(data),
            _ => None,
        }
    }

    /// Text view
    pub fn as_text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.kind {
            ComponentKind::Text(data) => Some(data),
            _ => None,
        }
    }
}
