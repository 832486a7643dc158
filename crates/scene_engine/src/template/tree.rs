//! Template trees: a root node plus the bone mapping and animations loaded with it

use std::fmt;
use std::sync::Arc;

use crate::animation::Animation;
use crate::render::{Material, Mesh};
use super::bone_mapping::BoneMapping;
use super::node::TemplateNode;

/// Blueprint loaded from one asset
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    path: String,
    root: TemplateNode,
    bone_mapping: BoneMapping,
    animations: Vec<Arc<Animation>>,
}

impl TemplateTree {
    /// Empty tree whose root node is named after `path`
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            root: TemplateNode::new(path.clone()),
            path,
            bone_mapping: BoneMapping::new(),
            animations: Vec::new(),
        }
    }

    /// Tree with an explicit root node
    pub fn with_root(path: impl Into<String>, root: TemplateNode) -> Self {
        Self {
            path: path.into(),
            root,
            bone_mapping: BoneMapping::new(),
            animations: Vec::new(),
        }
    }

    /// Path the tree was loaded from (cache key)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Change the path
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Root node
    pub fn root(&self) -> &TemplateNode {
        &self.root
    }

    /// Mutable root node
    pub fn root_mut(&mut self) -> &mut TemplateNode {
        &mut self.root
    }

    /// Bone name table
    pub fn bone_mapping(&self) -> &BoneMapping {
        &self.bone_mapping
    }

    /// Mutable bone name table
    pub fn bone_mapping_mut(&mut self) -> &mut BoneMapping {
        &mut self.bone_mapping
    }

    /// Give every bone-bearing node without an ID the ID mapped to its name
    ///
    /// Nodes are visited in pre-order so fresh IDs follow tree order. Returns
    /// the number of IDs assigned.
    pub fn assign_bone_ids(&mut self) -> usize {
        assign_bone_ids(&mut self.root, &mut self.bone_mapping)
    }

    /// Store an animation with the tree
    pub fn add_animation(&mut self, animation: Animation) -> Arc<Animation> {
        let malformed = animation.channels.iter().filter(|channel| !channel.is_well_formed()).count();
        if malformed > 0 {
            log::warn!(
                "Animation '{}' in '{}' has {} channel(s) with unordered keys",
                animation.name,
                self.path,
                malformed
            );
        }
        let animation = Arc::new(animation);
        self.animations.push(Arc::clone(&animation));
        animation
    }

    /// Animations in load order
    pub fn animations(&self) -> &[Arc<Animation>] {
        &self.animations
    }

    /// Animation at `index`
    pub fn animation(&self, index: usize) -> Option<&Arc<Animation>> {
        self.animations.get(index)
    }

    /// Animation called `name`
    pub fn find_animation(&self, name: &str) -> Option<&Arc<Animation>> {
        self.animations.iter().find(|animation| animation.name == name)
    }

    /// Number of animations
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Whether the root has no children and draws nothing itself
    pub fn is_empty(&self) -> bool {
        self.root.child_count() == 0
            && self.root.as_mesh_bearing().map_or(true, |payload| payload.meshes.is_empty())
    }

    /// Whether any node is bone-bearing
    pub fn has_bone_nodes(&self) -> bool {
        self.root.has_bone_nodes()
    }

    /// Total number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// First node called `name` in pre-order
    pub fn find_node(&self, name: &str) -> Option<&TemplateNode> {
        self.root.find_node(name)
    }

    /// Mutable first node called `name` in pre-order
    pub fn find_node_mut(&mut self, name: &str) -> Option<&mut TemplateNode> {
        self.root.find_node_mut(name)
    }

    /// Node at pre-order position `index`
    pub fn find_node_by_index(&self, index: usize) -> Option<&TemplateNode> {
        self.root.find_node_by_index(index)
    }

    /// Look a node up by pre-order index when `query` is all digits, else by name
    pub fn resolve_node(&self, query: &str) -> Option<&TemplateNode> {
        match parse_index(query) {
            Some(index) => self.find_node_by_index(index),
            None => self.find_node(query),
        }
    }

    /// Mutable counterpart of [`resolve_node`](Self::resolve_node)
    pub fn resolve_node_mut(&mut self, query: &str) -> Option<&mut TemplateNode> {
        match parse_index(query) {
            Some(index) => self.root.find_node_by_index_mut(index),
            None => self.root.find_node_mut(query),
        }
    }

    /// First mesh called `name`
    pub fn find_mesh(&self, name: &str) -> Option<&Mesh> {
        self.root.find_mesh(name)
    }

    /// Shared handle to the first mesh called `name`
    pub fn find_mesh_ref(&self, name: &str) -> Option<&Arc<Mesh>> {
        self.root.find_mesh_ref(name)
    }

    /// First material called `name`
    pub fn find_material(&self, name: &str) -> Option<&Arc<Material>> {
        self.root.find_material(name)
    }

    /// Deep copy under a new path; meshes and animations stay shared
    pub fn copy_as(&self, path: impl Into<String>) -> TemplateTree {
        TemplateTree {
            path: path.into(),
            root: self.root.copy(true),
            bone_mapping: self.bone_mapping.clone(),
            animations: self.animations.clone(),
        }
    }
}

fn assign_bone_ids(node: &mut TemplateNode, mapping: &mut BoneMapping) -> usize {
    let mut assigned = 0;
    let name = node.name().to_string();
    if let Some(bone) = node.as_bone_bearing_mut() {
        if bone.bone_id.is_none() {
            bone.bone_id = Some(mapping.get_bone_id(&name));
            assigned += 1;
        }
    }
    for index in 0..node.child_count() {
        if let Some(child) = node.child_mut(index) {
            assigned += assign_bone_ids(child, mapping);
        }
    }
    assigned
}

fn parse_index(query: &str) -> Option<usize> {
    if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
        query.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for TemplateTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
