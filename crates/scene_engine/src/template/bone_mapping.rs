//! Bone name to bone ID table shared by every node of one template tree

use std::collections::HashMap;
use std::fmt;

/// Dense, zero-based bone identifier within one template tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub u32);

impl BoneId {
    /// Index into per-bone arrays such as the skinning matrix batch
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lazily assigned bone IDs
///
/// IDs are handed out in first-lookup order starting at zero. Once assigned
/// an ID is never reused or compacted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneMapping {
    ids: HashMap<String, BoneId>,
    names: Vec<String>,
}

impl BoneMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// ID for `name`, allocating the next one on first use
    pub fn get_bone_id(&mut self, name: &str) -> BoneId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = BoneId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        log::trace!("Assigned bone id {} to '{}'", id, name);
        id
    }

    /// ID for `name` if it has already been assigned
    pub fn find_bone_id(&self, name: &str) -> Option<BoneId> {
        self.ids.get(name).copied()
    }

    /// Name registered for `id`
    pub fn bone_name(&self, id: BoneId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Number of assigned IDs
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no bone has been registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Bone names in ID order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_id() {
        let mut mapping = BoneMapping::new();
        let first = mapping.get_bone_id("Arm");
        let second = mapping.get_bone_id("Arm");
        assert_eq!(first, second);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_ids_are_contiguous() {
        let mut mapping = BoneMapping::new();
        let names = ["Hips", "Spine", "Neck", "Head", "Spine"];
        let ids: Vec<BoneId> = names.iter().map(|name| mapping.get_bone_id(name)).collect();

        assert_eq!(ids, vec![BoneId(0), BoneId(1), BoneId(2), BoneId(3), BoneId(1)]);
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.bone_name(BoneId(2)), Some("Neck"));
        assert_eq!(mapping.names().collect::<Vec<_>>(), vec!["Hips", "Spine", "Neck", "Head"]);
    }

    #[test]
    fn test_find_does_not_allocate() {
        let mut mapping = BoneMapping::new();
        assert_eq!(mapping.find_bone_id("Tail"), None);
        assert!(mapping.is_empty());

        mapping.get_bone_id("Tail");
        assert_eq!(mapping.find_bone_id("Tail"), Some(BoneId(0)));
    }
}
