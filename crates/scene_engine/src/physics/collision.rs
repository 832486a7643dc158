//! Collision objects attached to scene components
//!
//! Template nodes carry collision templates; instancing clones them per
//! component, points the clone at the component's transform and hands it to
//! the physics backend exactly once.

use std::collections::HashMap;

use crate::foundation::collections::{ComponentId, TransformId};
use crate::foundation::math::{LocalTransform, Vec3};

/// Geometry of one collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Box; the shape transform's scale holds the full extents
    Box,
    /// Sphere; the shape transform's x scale holds the radius
    Sphere,
    /// Static triangle soup
    TriangleMesh {
        /// Vertex positions
        vertices: Vec<Vec3>,
        /// Triangle indices, three per triangle
        indices: Vec<u32>,
    },
}

/// A shape placed relative to its collision object
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionShape {
    /// Shape geometry
    pub kind: ShapeKind,
    /// Placement and size relative to the owning transform
    pub shape_transform: LocalTransform,
}

impl CollisionShape {
    /// Axis-aligned box with full `extents`
    pub fn cuboid(extents: Vec3) -> Self {
        Self {
            kind: ShapeKind::Box,
            shape_transform: LocalTransform::identity().with_scale(extents),
        }
    }

    /// Sphere of `radius`
    pub fn sphere(radius: f32) -> Self {
        Self {
            kind: ShapeKind::Sphere,
            shape_transform: LocalTransform::identity().with_scale(Vec3::new(radius, radius, radius)),
        }
    }

    /// Triangle mesh; `None` when the index count is not a multiple of three
    /// or an index is out of range
    pub fn triangle_mesh(vertices: Vec<Vec3>, indices: Vec<u32>) -> Option<Self> {
        let in_range = indices.iter().all(|&i| (i as usize) < vertices.len());
        if indices.len() % 3 != 0 || !in_range {
            return None;
        }
        Some(Self {
            kind: ShapeKind::TriangleMesh { vertices, indices },
            shape_transform: LocalTransform::identity(),
        })
    }

    /// Builder pattern: offset the shape from its owner
    pub fn with_offset(mut self, position: Vec3) -> Self {
        self.shape_transform.position = position;
        self
    }
}

/// A set of shapes simulated as one body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollisionObject {
    /// Shapes making up the body
    pub shapes: Vec<CollisionShape>,
    /// Static bodies never move
    pub is_static: bool,
    /// Ignore the shapes' own rotation when posing them
    pub ignore_rotation: bool,
    /// Transform the body follows; set when attached to a component
    pub transform: Option<TransformId>,
}

impl CollisionObject {
    /// Create an empty dynamic body
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add a shape
    pub fn with_shape(mut self, shape: CollisionShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Builder pattern: mark as static
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }
}

/// Physics engine interface the scene registers collision objects with
pub trait PhysicsBackend {
    /// A component's collision object was attached
    fn add_collision_object(&mut self, owner: ComponentId, object: &CollisionObject);

    /// A component carrying a collision object was destroyed
    fn remove_collision_object(&mut self, owner: ComponentId);
}

/// Collision objects currently registered by a scene
///
/// Forwards registration to an optional backend so scenes without physics
/// still track which components own bodies.
#[derive(Default)]
pub struct CollisionRegistry {
    registered: HashMap<ComponentId, TransformId>,
    backend: Option<Box<dyn PhysicsBackend>>,
}

impl CollisionRegistry {
    /// Create a registry with no backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward future registrations to `backend`
    pub fn set_backend(&mut self, backend: Box<dyn PhysicsBackend>) {
        self.backend = Some(backend);
    }

    /// Register a component's collision object
    ///
    /// Registering the same owner twice first removes the previous entry.
    pub fn add(&mut self, owner: ComponentId, object: &CollisionObject) {
        let Some(transform) = object.transform else {
            log::error!("Collision object of {:?} has no transform; not registered", owner);
            return;
        };
        if self.registered.insert(owner, transform).is_some() {
            log::debug!("Replacing collision object of {:?}", owner);
            if let Some(backend) = self.backend.as_mut() {
                backend.remove_collision_object(owner);
            }
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.add_collision_object(owner, object);
        }
    }

    /// Unregister a component's collision object, if any
    pub fn remove(&mut self, owner: ComponentId) {
        if self.registered.remove(&owner).is_some() {
            if let Some(backend) = self.backend.as_mut() {
                backend.remove_collision_object(owner);
            }
        }
    }

    /// Whether `owner` has a registered collision object
    pub fn contains(&self, owner: ComponentId) -> bool {
        self.registered.contains_key(&owner)
    }

    /// Number of registered collision objects
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

impl std::fmt::Debug for CollisionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionRegistry")
            .field("registered", &self.registered.len())
            .field("has_backend", &self.backend.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::{ComponentMap, SlotMap};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl PhysicsBackend for Recorder {
        fn add_collision_object(&mut self, _owner: ComponentId, object: &CollisionObject) {
            self.events.borrow_mut().push(format!("add {}", object.shapes.len()));
        }

        fn remove_collision_object(&mut self, _owner: ComponentId) {
            self.events.borrow_mut().push("remove".to_string());
        }
    }

    #[test]
    fn test_registry_forwards_to_backend() {
        let mut components: ComponentMap<()> = ComponentMap::with_key();
        let owner = components.insert(());
        let mut transforms: SlotMap<TransformId, ()> = SlotMap::with_key();
        let transform = transforms.insert(());

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CollisionRegistry::new();
        registry.set_backend(Box::new(Recorder { events: Rc::clone(&events) }));

        let mut object = CollisionObject::new().with_shape(CollisionShape::sphere(1.0));
        registry.add(owner, &object);
        assert!(registry.is_empty(), "objects without a transform are rejected");

        object.transform = Some(transform);
        registry.add(owner, &object);
        assert!(registry.contains(owner));

        registry.remove(owner);
        registry.remove(owner);
        assert_eq!(*events.borrow(), vec!["add 1".to_string(), "remove".to_string()]);
    }

    #[test]
    fn test_triangle_mesh_validation() {
        let vertices = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        assert!(CollisionShape::triangle_mesh(vertices.clone(), vec![0, 1, 2]).is_some());
        assert!(CollisionShape::triangle_mesh(vertices.clone(), vec![0, 1]).is_none());
        assert!(CollisionShape::triangle_mesh(vertices, vec![0, 1, 5]).is_none());
    }
}
