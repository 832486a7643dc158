//! Process-wide engine resources
//!
//! [`EngineContext`] holds the caches every scene draws from: loaded template
//! trees, named materials and fonts. It is created once by the host and passed
//! by reference wherever those caches are needed.

use std::sync::Arc;

use crate::assets::TemplateLoader;
use crate::core::config::ApplicationConfig;
use crate::foundation::collections::ComponentId;
use crate::render::{Font, FontLibrary, MaterialRegistry};
use crate::scene::{InstanceInfo, SceneTree};
use crate::template::TemplateLibrary;

/// Shared caches and configuration
#[derive(Debug)]
pub struct EngineContext {
    /// Loaded template trees
    pub templates: TemplateLibrary,
    /// Materials addressable by name
    pub materials: MaterialRegistry,
    /// Fonts used by text components
    pub fonts: FontLibrary,
    config: ApplicationConfig,
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::from_config(ApplicationConfig::default())
    }
}

impl EngineContext {
    /// Context with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Context configured from `config`
    ///
    /// Invalid values are logged and replaced with their defaults.
    pub fn from_config(mut config: ApplicationConfig) -> Self {
        config.sanitize();
        Self {
            templates: TemplateLibrary::from_config(&config),
            materials: MaterialRegistry::new(),
            fonts: FontLibrary::new(),
            config,
        }
    }

    /// Application configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Scene tree using this context's scene and animation settings
    pub fn create_scene(&self) -> SceneTree {
        SceneTree::with_config(&self.config)
    }

    /// Shared font for `path`
    pub fn font(&mut self, path: &str) -> Arc<Font> {
        self.fonts.get_or_load(path)
    }

    /// Load (or fetch from cache) the tree at `path` and instance it under `target`
    ///
    /// Returns `None` when loading fails or `target` is stale; both are logged.
    pub fn load_model(
        &mut self,
        scene: &mut SceneTree,
        path: &str,
        target: ComponentId,
        override_material: Option<&str>,
        loader: &mut dyn TemplateLoader,
    ) -> Option<InstanceInfo> {
        let tree = self.templates.load_template_tree(path, loader)?;
        scene.instantiate(&tree, target, override_material, &self.materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetError;
    use crate::core::config::DEFAULT_TICKS_PER_SECOND;
    use crate::render::Material;
    use crate::scene::{ComponentKind, TextData};
    use crate::template::{TemplateNode, TemplateTree};

    fn crate_loader(calls: &mut usize) -> impl FnMut(&str) -> Result<TemplateTree, AssetError> + '_ {
        move |path: &str| {
            *calls += 1;
            if path.ends_with("missing.obj") {
                return Err(AssetError::NotFound(path.to_string()));
            }
            let mut tree = TemplateTree::new(path);
            tree.root_mut().add_child(TemplateNode::mesh("lid"));
            Ok(tree)
        }
    }

    #[test]
    fn test_load_model_caches_tree() {
        let mut context = EngineContext::new();
        context.materials.register(Material::new("wood"));
        let mut scene = context.create_scene();
        let mut calls = 0;
        let mut loader = crate_loader(&mut calls);
        let root = scene.root();

        let first = context.load_model(&mut scene, "crate.obj", root, Some("wood"), &mut loader);
        let second = context.load_model(&mut scene, "crate.obj", root, None, &mut loader);
        drop(loader);

        assert_eq!(calls, 1);
        assert_eq!(first.unwrap().component_count, 2);
        assert_ne!(first.unwrap().root, second.unwrap().root);
        assert!(context.templates.contains("crate.obj"));
        assert_eq!(scene.component(scene.root()).unwrap().children().len(), 2);
    }

    #[test]
    fn test_load_model_failure_leaves_scene_untouched() {
        let mut context = EngineContext::new();
        let mut scene = context.create_scene();
        let mut calls = 0;
        let mut loader = crate_loader(&mut calls);
        let root = scene.root();

        assert!(context.load_model(&mut scene, "missing.obj", root, None, &mut loader).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_invalid_tick_rate_falls_back_to_default() {
        let mut config = ApplicationConfig::default();
        config.animation.default_ticks_per_second = 0.0;
        let context = EngineContext::from_config(config);

        assert_eq!(context.config().animation.default_ticks_per_second, DEFAULT_TICKS_PER_SECOND);
        assert_eq!(context.create_scene().animation_config().default_ticks_per_second, DEFAULT_TICKS_PER_SECOND);
    }

    #[test]
    fn test_text_components_share_fonts() {
        let mut context = EngineContext::new();
        let mut scene = context.create_scene();
        let label = TextData::new(context.font("fonts/mono.ttf"), "score");
        let title = TextData::new(context.font("fonts/mono.ttf"), "title");
        assert!(Arc::ptr_eq(&label.font, &title.font));

        let id = scene
            .create_component(scene.root(), "score", Default::default(), ComponentKind::Text(label))
            .unwrap();
        scene.component_mut(id).unwrap().as_text_mut().unwrap().content = "1200".to_string();
        assert_eq!(context.fonts.len(), 1);
    }
}
