//! Template nodes
//!
//! A [`TemplateNode`] is the blueprint for one scene component. Nodes own
//! their children outright, so a template tree is acyclic by construction.
//! What a node turns into when instanced is decided by its [`NodeKind`]
//! payload; callers ask for capabilities (`as_mesh_bearing`,
//! `as_bone_bearing`) rather than matching on the kind directly.
//!
//! Lookups by name are depth-first, pre-order, first match. Names are not
//! required to be unique, so a tree `A { B, C { B } }` resolves `"B"` to
//! `A`'s direct child.

use std::fmt;
use std::sync::Arc;

use crate::foundation::math::{LocalTransform, Mat4};
use crate::physics::CollisionObject;
use crate::render::{Material, Mesh};
use super::bone_mapping::BoneId;

/// Meshes drawn by a mesh-bearing node
#[derive(Debug, Clone, Default)]
pub struct MeshPayload {
    /// Shared meshes, drawn in order
    pub meshes: Vec<Arc<Mesh>>,
    /// Material replacing every mesh's default when instanced
    pub override_material: Option<Arc<Material>>,
}

impl MeshPayload {
    /// Append a shared mesh
    pub fn add_mesh(&mut self, mesh: Arc<Mesh>) {
        self.meshes.push(mesh);
    }

    /// Mesh at `index`
    pub fn mesh(&self, index: usize) -> Option<&Arc<Mesh>> {
        self.meshes.get(index)
    }

    /// Number of meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Replace the override material
    pub fn set_override_material(&mut self, material: Option<Arc<Material>>) {
        self.override_material = material;
    }

    fn find_mesh(&self, name: &str) -> Option<&Arc<Mesh>> {
        self.meshes.iter().find(|mesh| mesh.name == name)
    }

    fn find_material(&self, name: &str) -> Option<&Arc<Material>> {
        self.override_material
            .iter()
            .chain(self.meshes.iter().filter_map(|mesh| mesh.material.as_ref()))
            .find(|material| material.name == name)
    }
}

/// Skinning data of a bone-bearing node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePayload {
    /// Mesh space to bone space in bind pose
    pub bone_offset: Mat4,
    /// ID from the tree's bone mapping, once assigned
    pub bone_id: Option<BoneId>,
}

impl Default for BonePayload {
    fn default() -> Self {
        Self {
            bone_offset: Mat4::identity(),
            bone_id: None,
        }
    }
}

/// What a template node becomes when instanced
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    /// Plain component
    #[default]
    Generic,
    /// Model component drawing meshes
    Mesh(MeshPayload),
    /// Bone component used for skinning
    Bone(BonePayload),
}

impl NodeKind {
    /// Short label used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Mesh(_) => "mesh",
            Self::Bone(_) => "bone",
        }
    }
}

/// Blueprint for one component and its subtree
#[derive(Debug, Clone, Default)]
pub struct TemplateNode {
    name: String,
    template_transform: LocalTransform,
    children: Vec<TemplateNode>,
    collision_template: Option<CollisionObject>,
    kind: NodeKind,
}

impl TemplateNode {
    /// Generic node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Mesh-bearing node with no meshes yet
    pub fn mesh(name: impl Into<String>) -> Self {
        Self::new(name).with_kind(NodeKind::Mesh(MeshPayload::default()))
    }

    /// Bone-bearing node with an identity offset and no ID yet
    pub fn bone(name: impl Into<String>) -> Self {
        Self::new(name).with_kind(NodeKind::Bone(BonePayload::default()))
    }

    /// Builder pattern: set the template transform
    pub fn with_transform(mut self, transform: LocalTransform) -> Self {
        self.template_transform = transform;
        self
    }

    /// Builder pattern: set the kind payload
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder pattern: append a shared mesh, turning the node mesh-bearing if needed
    pub fn with_mesh(mut self, mesh: Arc<Mesh>) -> Self {
        if !matches!(self.kind, NodeKind::Mesh(_)) {
            self.kind = NodeKind::Mesh(MeshPayload::default());
        }
        if let NodeKind::Mesh(payload) = &mut self.kind {
            payload.add_mesh(mesh);
        }
        self
    }

    /// Builder pattern: append a child subtree
    pub fn with_child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Local transform copied into instanced components
    pub fn template_transform(&self) -> &LocalTransform {
        &self.template_transform
    }

    /// Replace the template transform
    pub fn set_template_transform(&mut self, transform: LocalTransform) {
        self.template_transform = transform;
    }

    /// Kind payload
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable kind payload
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Mesh view if the node draws meshes
    pub fn as_mesh_bearing(&self) -> Option<&MeshPayload> {
        match &self.kind {
            NodeKind::Mesh(payload) => Some(payload),
            _ => None,
        }
    }

    /// Mutable mesh view if the node draws meshes
    pub fn as_mesh_bearing_mut(&mut self) -> Option<&mut MeshPayload> {
        match &mut self.kind {
            NodeKind::Mesh(payload) => Some(payload),
            _ => None,
        }
    }

    /// Bone view if the node is a skeleton bone
    pub fn as_bone_bearing(&self) -> Option<&BonePayload> {
        match &self.kind {
            NodeKind::Bone(payload) => Some(payload),
            _ => None,
        }
    }

    /// Mutable bone view if the node is a skeleton bone
    pub fn as_bone_bearing_mut(&mut self) -> Option<&mut BonePayload> {
        match &mut self.kind {
            NodeKind::Bone(payload) => Some(payload),
            _ => None,
        }
    }

    /// Direct children in insertion order
    pub fn children(&self) -> &[TemplateNode] {
        &self.children
    }

    /// Child at `index`
    pub fn child(&self, index: usize) -> Option<&TemplateNode> {
        let child = self.children.get(index);
        if child.is_none() {
            log::debug!(
                "Tried to get child {} of '{}', which has only {} children",
                index,
                self.name,
                self.children.len()
            );
        }
        child
    }

    /// Mutable child at `index`
    pub fn child_mut(&mut self, index: usize) -> Option<&mut TemplateNode> {
        self.children.get_mut(index)
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Append `child` (moved in) and return it
    pub fn add_child(&mut self, child: TemplateNode) -> &mut TemplateNode {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Append a deep copy of `child` and return it
    pub fn add_child_copy(&mut self, child: &TemplateNode) -> &mut TemplateNode {
        self.add_child(child.copy(true))
    }

    /// Append a generic child called `name`
    pub fn add_generic_child(&mut self, name: impl Into<String>) -> &mut TemplateNode {
        self.add_child(TemplateNode::new(name))
    }

    /// Append a mesh-bearing child called `name` and return it
    pub fn add_mesh_child(&mut self, name: impl Into<String>) -> &mut TemplateNode {
        self.add_child(TemplateNode::mesh(name))
    }

    /// Append a bone-bearing child called `name` and return it
    pub fn add_bone_child(&mut self, name: impl Into<String>) -> &mut TemplateNode {
        self.add_child(TemplateNode::bone(name))
    }

    /// Copy this node
    ///
    /// The collision template is always cloned. Children are deep-copied only
    /// when `include_children` is set. Meshes are shared with the original.
    pub fn copy(&self, include_children: bool) -> TemplateNode {
        TemplateNode {
            name: self.name.clone(),
            template_transform: self.template_transform,
            children: if include_children {
                self.children.iter().map(|child| child.copy(true)).collect()
            } else {
                Vec::new()
            },
            collision_template: self.collision_template.clone(),
            kind: self.kind.clone(),
        }
    }

    /// Collision template, if any
    pub fn collision_template(&self) -> Option<&CollisionObject> {
        self.collision_template.as_ref()
    }

    /// Replace the collision template, returning the previous one
    pub fn set_collision_template(&mut self, template: Option<CollisionObject>) -> Option<CollisionObject> {
        std::mem::replace(&mut self.collision_template, template)
    }

    /// Fresh collision object cloned from the template
    ///
    /// The clone is not yet bound to any transform.
    pub fn instantiate_collision_object(&self) -> Option<CollisionObject> {
        self.collision_template.as_ref().map(|template| CollisionObject {
            transform: None,
            ..template.clone()
        })
    }

    /// Pre-order iterator over this node and its descendants
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// First node called `name` in pre-order
    pub fn find_node(&self, name: &str) -> Option<&TemplateNode> {
        self.iter().find(|node| node.name == name)
    }

    /// Mutable first node called `name` in pre-order
    pub fn find_node_mut(&mut self, name: &str) -> Option<&mut TemplateNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_node_mut(name))
    }

    /// Node at pre-order position `index`; this node is index 0
    pub fn find_node_by_index(&self, index: usize) -> Option<&TemplateNode> {
        self.iter().nth(index)
    }

    /// Mutable node at pre-order position `index`
    pub fn find_node_by_index_mut(&mut self, index: usize) -> Option<&mut TemplateNode> {
        let mut remaining = index;
        self.nth_mut(&mut remaining)
    }

    fn nth_mut(&mut self, remaining: &mut usize) -> Option<&mut TemplateNode> {
        if *remaining == 0 {
            return Some(self);
        }
        *remaining -= 1;
        for child in self.children.iter_mut() {
            if let Some(found) = child.nth_mut(remaining) {
                return Some(found);
            }
        }
        None
    }

    /// First mesh called `name`, checking this node's meshes before its children
    pub fn find_mesh(&self, name: &str) -> Option<&Mesh> {
        self.find_mesh_ref(name).map(Arc::as_ref)
    }

    /// Shared handle to the first mesh called `name`
    pub fn find_mesh_ref(&self, name: &str) -> Option<&Arc<Mesh>> {
        self.iter()
            .filter_map(TemplateNode::as_mesh_bearing)
            .find_map(|payload| payload.find_mesh(name))
    }

    /// First material called `name` used by a mesh-bearing node
    ///
    /// A node's override material is checked before its meshes' defaults.
    pub fn find_material(&self, name: &str) -> Option<&Arc<Material>> {
        self.iter()
            .filter_map(TemplateNode::as_mesh_bearing)
            .find_map(|payload| payload.find_material(name))
    }

    /// Whether any node in this subtree is bone-bearing
    pub fn has_bone_nodes(&self) -> bool {
        self.iter().any(|node| node.as_bone_bearing().is_some())
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let marker = if self.as_bone_bearing().is_some() { "*" } else { "" };
        writeln!(f, "{:indent$}{}{}", "", marker, self.name, indent = depth * 2)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Outline of the subtree, one node per line, bones prefixed with `*`
impl fmt::Display for TemplateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Pre-order traversal over a template subtree
pub struct Preorder<'a> {
    stack: Vec<&'a TemplateNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a TemplateNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::CollisionShape;

    fn abcb() -> TemplateNode {
        // A { B, C { B } }
        TemplateNode::new("A")
            .with_child(TemplateNode::new("B").with_transform(LocalTransform::from_position(Vec3::x())))
            .with_child(
                TemplateNode::new("C")
                    .with_child(TemplateNode::new("B").with_transform(LocalTransform::from_position(Vec3::y()))),
            )
    }

    #[test]
    fn test_find_node_first_match_preorder() {
        let tree = abcb();
        let found = tree.find_node("B").unwrap();
        assert_eq!(found.template_transform().position, Vec3::x());
        assert!(tree.find_node("D").is_none());
    }

    #[test]
    fn test_find_node_by_index() {
        let tree = abcb();
        let names: Vec<&str> = (0..4)
            .map(|i| tree.find_node_by_index(i).unwrap().name())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "B"]);
        assert!(tree.find_node_by_index(4).is_none());

        let mut tree = tree;
        tree.find_node_by_index_mut(3).unwrap().set_name("D");
        assert_eq!(tree.find_node("D").unwrap().template_transform().position, Vec3::y());
    }

    #[test]
    fn test_add_child_returns_new_child() {
        let mut root = TemplateNode::new("root");
        if let Some(bone) = root.add_bone_child("Hip").as_bone_bearing_mut() {
            bone.bone_offset = Mat4::new_scaling(2.0);
        }
        if let Some(payload) = root.add_mesh_child("Body").as_mesh_bearing_mut() {
            payload.add_mesh(Arc::new(Mesh::new("body")));
        }
        root.add_generic_child("Socket").add_generic_child("Tip");

        assert_eq!(root.child_count(), 3);
        assert_eq!(root.child(0).unwrap().as_bone_bearing().unwrap().bone_offset, Mat4::new_scaling(2.0));
        assert_eq!(root.child(1).unwrap().as_mesh_bearing().unwrap().mesh_count(), 1);
        assert_eq!(root.child(2).unwrap().child_count(), 1);
        assert!(root.child(3).is_none());
        assert!(root.has_bone_nodes());
    }

    #[test]
    fn test_copy_shares_meshes_and_clones_collision() {
        let mesh = Arc::new(Mesh::new("hull"));
        let mut node = TemplateNode::mesh("Ship")
            .with_mesh(Arc::clone(&mesh))
            .with_child(TemplateNode::new("Turret"));
        node.set_collision_template(Some(CollisionObject::new().with_shape(CollisionShape::sphere(2.0))));

        let shallow = node.copy(false);
        assert_eq!(shallow.child_count(), 0);
        assert!(Arc::ptr_eq(&shallow.as_mesh_bearing().unwrap().meshes[0], &mesh));

        let original_collision = node.collision_template().unwrap() as *const CollisionObject;
        let copied_collision = shallow.collision_template().unwrap() as *const CollisionObject;
        assert_ne!(original_collision, copied_collision);
        assert_eq!(shallow.collision_template(), node.collision_template());

        let deep = node.copy(true);
        assert_eq!(deep.child_count(), 1);
        assert_eq!(Arc::strong_count(&mesh), 4);
    }

    #[test]
    fn test_find_mesh_checks_own_meshes_first() {
        let outer = Arc::new(Mesh::new("panel").with_counts(4, 6));
        let inner = Arc::new(Mesh::new("panel").with_counts(8, 12));
        let tree = TemplateNode::mesh("Door")
            .with_mesh(Arc::clone(&outer))
            .with_child(TemplateNode::mesh("Frame").with_mesh(inner));

        assert!(Arc::ptr_eq(tree.find_mesh_ref("panel").unwrap(), &outer));
        assert_eq!(tree.find_mesh("panel").unwrap().vertex_count, 4);
        assert!(tree.find_mesh("handle").is_none());
    }

    #[test]
    fn test_find_material() {
        let wood = Arc::new(Material::new("wood"));
        let tree = TemplateNode::new("Table").with_child(
            TemplateNode::mesh("Top").with_mesh(Arc::new(Mesh::new("top").with_material(Arc::clone(&wood)))),
        );

        assert!(Arc::ptr_eq(tree.find_material("wood").unwrap(), &wood));
        assert!(tree.find_material("steel").is_none());
    }

    #[test]
    fn test_display_marks_bones() {
        let mut root = TemplateNode::new("Rig");
        root.add_child(TemplateNode::bone("Spine").with_child(TemplateNode::new("Hat")));

        assert_eq!(root.to_string(), "Rig\n  *Spine\n    Hat\n");
    }
}
