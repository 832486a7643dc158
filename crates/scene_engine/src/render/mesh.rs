//! Mesh handles shared between template trees and scene components
//!
//! The scene core never touches vertex data. A [`Mesh`] records what the
//! renderer needs to know about a loaded mesh (name, sizes, default material)
//! and is shared through `Arc` by every template node and model component that
//! draws it.

use std::sync::Arc;

use super::material::Material;

/// Renderer-owned mesh as seen by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Mesh name from the source asset
    pub name: String,
    /// Number of vertices uploaded by the renderer
    pub vertex_count: usize,
    /// Number of indices uploaded by the renderer
    pub index_count: usize,
    /// Whether vertices carry bone weights
    pub skinned: bool,
    /// Material assigned by the source asset
    pub material: Option<Arc<Material>>,
}

impl Mesh {
    /// Create an empty, unskinned mesh without a material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex_count: 0,
            index_count: 0,
            skinned: false,
            material: None,
        }
    }

    /// Set vertex and index counts
    pub fn with_counts(mut self, vertex_count: usize, index_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self.index_count = index_count;
        self
    }

    /// Mark the mesh as skinned
    pub fn with_skinning(mut self, skinned: bool) -> Self {
        self.skinned = skinned;
        self
    }

    /// Set the default material
    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }
}

/// A mesh drawn by a model component, with the material actually used for it
#[derive(Debug, Clone)]
pub struct MeshInstance {
    mesh: Arc<Mesh>,
    material: Option<Arc<Material>>,
}

impl MeshInstance {
    /// Draw `mesh` with its own default material
    pub fn new(mesh: Arc<Mesh>) -> Self {
        let material = mesh.material.clone();
        Self { mesh, material }
    }

    /// Draw `mesh` with `material` in place of its default
    pub fn with_override(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self {
            mesh,
            material: Some(material),
        }
    }

    /// The shared mesh
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Material used when drawing
    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// Replace the material used when drawing
    pub fn set_material(&mut self, material: Arc<Material>) {
        self.material = Some(material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_uses_mesh_default_material() {
        let stone = Arc::new(Material::new("stone"));
        let mesh = Arc::new(Mesh::new("wall").with_material(Arc::clone(&stone)));

        let instance = MeshInstance::new(Arc::clone(&mesh));
        assert!(Arc::ptr_eq(instance.material().unwrap(), &stone));
        assert!(Arc::ptr_eq(instance.mesh(), &mesh));

        let gold = Arc::new(Material::new("gold"));
        let overridden = MeshInstance::with_override(mesh, Arc::clone(&gold));
        assert_eq!(overridden.material().unwrap().name, "gold");
    }
}
