//! Template trees: reusable blueprints instanced into scenes
//!
//! A loaded asset becomes a [`TemplateTree`]: a hierarchy of
//! [`TemplateNode`]s, the [`BoneMapping`] shared by its bone nodes and the
//! animations that came with it. Trees are cached per path in a
//! [`TemplateLibrary`].

pub mod bone_mapping;
pub mod node;
pub mod tree;
pub mod library;

pub use bone_mapping::{BoneId, BoneMapping};
pub use node::{BonePayload, MeshPayload, NodeKind, Preorder, TemplateNode};
pub use tree::TemplateTree;
pub use library::TemplateLibrary;
