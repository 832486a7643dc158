//! Cache of template trees keyed by asset path
//!
//! Trees are loaded once per path through a [`TemplateLoader`] and handed out
//! as shared, read-only `Arc`s. Editing a cached tree goes through
//! [`TemplateLibrary::get_mut`], which copies on write so trees already handed
//! out keep their original contents.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::assets::TemplateLoader;
use crate::core::config::ApplicationConfig;
use super::tree::TemplateTree;

/// Path-keyed template tree cache
#[derive(Debug)]
pub struct TemplateLibrary {
    trees: HashMap<String, Arc<TemplateTree>>,
    assets_dir: Option<String>,
    enable_caching: bool,
    debug_trees: bool,
}

impl TemplateLibrary {
    /// Create an empty library resolving paths as given
    pub fn new() -> Self {
        Self {
            trees: HashMap::new(),
            assets_dir: None,
            enable_caching: true,
            debug_trees: false,
        }
    }

    /// Create a library configured from the application config
    pub fn from_config(config: &ApplicationConfig) -> Self {
        let assets_dir = Some(config.assets.assets_dir.clone()).filter(|dir| !dir.is_empty());
        Self {
            trees: HashMap::new(),
            assets_dir,
            enable_caching: config.assets.enable_caching,
            debug_trees: config.scene.debug_template_trees,
        }
    }

    /// Builder pattern: enable or disable caching
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.enable_caching = enabled;
        self
    }

    /// Builder pattern: log an outline of every loaded tree at debug level
    pub fn with_tree_debugging(mut self, enabled: bool) -> Self {
        self.debug_trees = enabled;
        self
    }

    fn resolve_path(&self, path: &str) -> String {
        match &self.assets_dir {
            Some(dir) if Path::new(path).is_relative() => Path::new(dir).join(path).to_string_lossy().into_owned(),
            _ => path.to_string(),
        }
    }

    /// Load the tree for `path`, returning the cached copy when there is one
    ///
    /// Returns `None` when the loader fails; the failure is logged.
    pub fn load_template_tree(&mut self, path: &str, loader: &mut dyn TemplateLoader) -> Option<Arc<TemplateTree>> {
        if let Some(tree) = self.trees.get(path) {
            log::trace!("Template tree cache hit for '{}'", path);
            return Some(Arc::clone(tree));
        }

        let resolved = self.resolve_path(path);
        let mut tree = match loader.load(&resolved) {
            Ok(tree) => tree,
            Err(e) => {
                log::error!("Failed to load template tree '{}': {}", resolved, e);
                return None;
            }
        };
        tree.set_path(path);

        log::info!(
            "Loaded template tree '{}' ({} nodes, {} bones, {} animations)",
            path,
            tree.node_count(),
            tree.bone_mapping().len(),
            tree.animation_count()
        );
        if self.debug_trees {
            log::debug!("Template tree '{}':\n{}", path, tree);
        }

        let tree = Arc::new(tree);
        if self.enable_caching {
            self.trees.insert(path.to_string(), Arc::clone(&tree));
        }
        Some(tree)
    }

    /// Register an empty tree under `path` for building by hand
    ///
    /// An existing tree under the same path is returned unchanged.
    pub fn create_template_tree(&mut self, path: &str) -> &mut TemplateTree {
        let tree = self
            .trees
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(TemplateTree::new(path)));
        Arc::make_mut(tree)
    }

    /// Register a fully built tree under its own path, replacing any previous one
    pub fn insert(&mut self, tree: TemplateTree) -> Arc<TemplateTree> {
        let tree = Arc::new(tree);
        if self.trees.insert(tree.path().to_string(), Arc::clone(&tree)).is_some() {
            log::debug!("Replaced cached template tree '{}'", tree.path());
        }
        tree
    }

    /// Copy the cached tree at `path` under `new_path` and return it for editing
    pub fn copy_for_edit(&mut self, path: &str, new_path: &str) -> Option<&mut TemplateTree> {
        let Some(source) = self.trees.get(path) else {
            log::warn!("Cannot copy template tree '{}': not loaded", path);
            return None;
        };
        let copy = source.copy_as(new_path);
        let entry = self.trees.entry(new_path.to_string()).or_default();
        *entry = Arc::new(copy);
        Some(Arc::make_mut(entry))
    }

    /// Shared handle to the cached tree at `path`
    pub fn get(&self, path: &str) -> Option<Arc<TemplateTree>> {
        self.trees.get(path).cloned()
    }

    /// Mutable access to the cached tree at `path`, copying it if shared
    pub fn get_mut(&mut self, path: &str) -> Option<&mut TemplateTree> {
        self.trees.get_mut(path).map(Arc::make_mut)
    }

    /// Drop the cached tree at `path`
    pub fn remove(&mut self, path: &str) -> Option<Arc<TemplateTree>> {
        self.trees.remove(path)
    }

    /// Whether a tree is cached under `path`
    pub fn contains(&self, path: &str) -> bool {
        self.trees.contains_key(path)
    }

    /// Number of cached trees
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetError;
    use crate::template::TemplateNode;

    struct CountingLoader {
        calls: usize,
        requested: Vec<String>,
    }

    impl TemplateLoader for CountingLoader {
        fn load(&mut self, path: &str) -> Result<TemplateTree, AssetError> {
            self.calls += 1;
            self.requested.push(path.to_string());
            if path.ends_with("missing.fbx") {
                return Err(AssetError::NotFound(path.to_string()));
            }
            let mut tree = TemplateTree::new(path);
            tree.root_mut().add_generic_child("Body");
            Ok(tree)
        }
    }

    fn loader() -> CountingLoader {
        CountingLoader { calls: 0, requested: Vec::new() }
    }

    #[test]
    fn test_load_is_cached_by_path() {
        let mut library = TemplateLibrary::new();
        let mut loader = loader();

        let first = library.load_template_tree("robot.fbx", &mut loader).unwrap();
        let second = library.load_template_tree("robot.fbx", &mut loader).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls, 1);
        assert_eq!(first.path(), "robot.fbx");
    }

    #[test]
    fn test_failed_load_returns_none_and_is_not_cached() {
        crate::foundation::logging::init_for_tests();
        let mut library = TemplateLibrary::new();
        let mut loader = loader();

        assert!(library.load_template_tree("missing.fbx", &mut loader).is_none());
        assert!(library.load_template_tree("missing.fbx", &mut loader).is_none());
        assert_eq!(loader.calls, 2);
        assert!(library.is_empty());
    }

    #[test]
    fn test_assets_dir_prefix_and_no_caching() {
        let config = ApplicationConfig::default();
        let mut library = TemplateLibrary::from_config(&config).with_caching(false);
        let mut loader = loader();

        let tree = library.load_template_tree("robot.fbx", &mut loader).unwrap();
        library.load_template_tree("robot.fbx", &mut loader);

        assert_eq!(loader.calls, 2);
        assert!(loader.requested[0].ends_with("robot.fbx"));
        assert!(loader.requested[0].starts_with(&config.assets.assets_dir));
        assert_eq!(tree.path(), "robot.fbx");
    }

    #[test]
    fn test_closure_loader() {
        let mut library = TemplateLibrary::new();
        let mut closure = |path: &str| -> Result<TemplateTree, AssetError> { Ok(TemplateTree::new(path)) };
        assert!(library.load_template_tree("cube.obj", &mut closure).is_some());
    }

    #[test]
    fn test_edit_copies_on_write() {
        let mut library = TemplateLibrary::new();
        library.create_template_tree("box").root_mut().add_generic_child("Lid");
        let shared = library.get("box").unwrap();

        library.get_mut("box").unwrap().root_mut().add_generic_child("Lock");
        assert_eq!(shared.node_count(), 2);
        assert_eq!(library.get("box").unwrap().node_count(), 3);

        let edited = library.copy_for_edit("box", "box_open").unwrap();
        edited.find_node_mut("Lid").unwrap().set_name("OpenLid");
        assert!(library.get("box").unwrap().find_node("Lid").is_some());
        assert!(library.get("box_open").unwrap().find_node("OpenLid").is_some());
        assert!(library.copy_for_edit("crate", "crate2").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut library = TemplateLibrary::new();
        library.insert(TemplateTree::with_root("lamp", TemplateNode::new("lamp")));
        library.insert(TemplateTree::with_root("lamp", TemplateNode::new("lamp").with_child(TemplateNode::new("Bulb"))));

        assert_eq!(library.len(), 1);
        assert_eq!(library.get("lamp").unwrap().node_count(), 2);
        assert!(library.remove("lamp").is_some());
        assert!(!library.contains("lamp"));
    }
}
