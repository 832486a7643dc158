//! Renderer-facing resources referenced by the scene
//!
//! Only the pieces of the renderer the scene hierarchy holds on to live here:
//! shared meshes, materials and fonts. Command submission and GPU resources are
//! handled elsewhere.

pub mod mesh;
pub mod material;
pub mod text;

pub use mesh::{Mesh, MeshInstance};
pub use material::{Material, MaterialRegistry};
pub use text::{Font, FontLibrary, TextAlignment};
