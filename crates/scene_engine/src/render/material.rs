//! Material descriptions and the name-keyed material registry

use std::collections::HashMap;
use std::sync::Arc;

/// Material properties referenced by meshes
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Unique material name
    pub name: String,

    /// Name of the shader the renderer should bind
    pub shader_name: String,

    /// Base color (RGB)
    pub base_color: [f32; 3],

    /// Specular shininess exponent
    pub shininess: f32,

    /// Parallax depth scale
    pub depth_scale: f32,
}

impl Material {
    /// Create a new material with default properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader_name: "Geometry".to_string(),
            base_color: [1.0, 1.0, 1.0],
            shininess: 32.0,
            depth_scale: 0.0,
        }
    }

    /// Set the shader name
    pub fn with_shader(mut self, shader_name: impl Into<String>) -> Self {
        self.shader_name = shader_name.into();
        self
    }

    /// Set the base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b];
        self
    }

    /// Set the shininess exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }
}

/// Materials known to the renderer, looked up by name
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material under its own name, replacing any previous entry
    pub fn register(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        if self
            .materials
            .insert(material.name.clone(), Arc::clone(&material))
            .is_some()
        {
            log::debug!("Replaced material '{}'", material.name);
        }
        material
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<Arc<Material>> {
        self.materials.get(name).cloned()
    }

    /// Whether a material with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Number of registered materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
