//! Runtime scene hierarchy
//!
//! Bridges loaded template trees and the per-frame world the renderer and
//! physics read from.
//!
//! ## Architecture
//!
//! ```text
//! TemplateTree (shared, immutable)
//!      ↓ instantiate
//! SceneTree (components + transforms + skeletons)
//!      ↓ update_all / update_skeletons
//! Renderer (meshes, bone matrices)
//! ```
//!
//! The scene tree:
//! - Owns every component, transform and skeleton through slot map handles
//! - Mirrors template trees node for node when instancing
//! - Drives interpolators, animation managers and scripts each frame
//! - Registers collision objects with an optional physics backend

mod component;
mod error;
mod instancing;
mod kinds;
mod skeleton;
mod transform;
mod tree;

#[cfg(test)]
mod tests;

pub use component::{BoneData, Component, ComponentKind, ComponentScript, ModelData, ScriptContext};
pub use error::SceneError;
pub use instancing::InstanceInfo;
pub use kinds::{CameraData, LightData, LightType, SoundBufferId, SoundSourceData, TextData};
pub use skeleton::{BoneMatrixBatch, GpuMatrix, SkeletonBone, SkeletonInfo};
pub use transform::{Constraints, Transform, TransformArena, DEFAULT_FRONT};
pub use tree::{Descendants, SceneTree, ROOT_NAME};
