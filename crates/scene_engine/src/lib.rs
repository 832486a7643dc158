//! # Scene Engine
//!
//! Runtime scene hierarchy for a real-time engine: reusable template trees
//! loaded from model files, instanced into a live component tree with
//! skeletons and keyframe animation.
//!
//! ## Features
//!
//! - **Template Trees**: Named node hierarchies with meshes, bones and collision templates
//! - **Instancing**: Node-for-node component subtrees sharing template meshes
//! - **Skeletal Animation**: Bone mapping, sorted skeletons and skinning matrices
//! - **Interpolation**: Time-driven transform interpolators and animation playback
//! - **Configuration**: TOML/RON application config with validation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() {
//!     let mut context = EngineContext::new();
//!     let mut scene = context.create_scene();
//!
//!     let mut loader = |path: &str| -> Result<TemplateTree, AssetError> {
//!         let mut tree = TemplateTree::new(path);
//!         tree.root_mut().add_bone_child("hips");
//!         tree.assign_bone_ids();
//!         Ok(tree)
//!     };
//!
//!     let root = scene.root();
//!     if let Some(instance) = context.load_model(&mut scene, "character.dae", root, None, &mut loader) {
//!         scene.update_all(1.0 / 60.0);
//!         scene.update_skeletons();
//!         println!("{} components instanced", instance.component_count);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

// Scene data
pub mod animation;
pub mod assets;
pub mod template;
pub mod scene;

// Narrow interfaces to external subsystems
pub mod render;
pub mod physics;
pub mod input;

mod context;

pub use context::EngineContext;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        EngineContext,
        animation::{AnimChannel, Animation, AnimationInstance, AnimationManager, LoopMode, PlaybackState, TransformField},
        assets::{AssetError, TemplateLoader},
        core::config::{AnimationConfig, ApplicationConfig, Config, EngineConfig, SceneConfig},
        foundation::{
            collections::{ComponentId, SkeletonId, TransformId},
            math::{LocalTransform, Mat4, Quat, Vec3},
        },
        input::{InputManager, InputState, KeyCode},
        physics::{CollisionObject, CollisionShape, PhysicsBackend},
        render::{Material, MaterialRegistry, Mesh},
        scene::{Component, ComponentKind, ComponentScript, InstanceInfo, SceneError, SceneTree, ScriptContext, SkeletonInfo, Transform},
        template::{BoneId, TemplateLibrary, TemplateNode, TemplateTree},
    };
}
