//! Handle types for arena-owned scene data
//!
//! Scene components, transforms and skeletons live in slot maps owned by the
//! scene tree. Parent links and skeleton bone lists store these keys instead of
//! references, so a destroyed entry turns into a stale key rather than a
//! dangling pointer.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a component owned by a [`SceneTree`](crate::scene::SceneTree)
    pub struct ComponentId;

    /// Handle to a transform in a [`TransformArena`](crate::scene::TransformArena)
    pub struct TransformId;

    /// Handle to a skeleton produced by instancing a template tree
    pub struct SkeletonId;
}

/// Handle-based map keyed by component handles
pub type ComponentMap<T> = SlotMap<ComponentId, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_key_is_stale() {
        let mut map: ComponentMap<&str> = ComponentMap::with_key();
        let a = map.insert("a");
        map.remove(a);
        let b = map.insert("b");

        assert!(map.get(a).is_none());
        assert_eq!(map.get(b), Some(&"b"));
        assert_ne!(a, b);
    }
}
