//! # Unified Configuration System
//!
//! Consolidates all configuration structures for the scene core into a single
//! place. Every section is serde-derived and defaults field by field, so a
//! config file only needs to name the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging and debug features
//! - **Scene Config**: Template tree diagnostics and instancing naming
//! - **Animation Config**: Playback defaults applied when instancing
//! - **Asset Config**: Asset root and template caching

use serde::{Serialize, Deserialize};

use crate::animation::LoopMode;

// Re-export from the old config module for compatibility
pub use crate::config::{Config, ConfigError};

/// Tick rate used when an imported animation reports zero ticks per second
pub const DEFAULT_TICKS_PER_SECOND: f64 = 25.0;

/// # Engine Configuration
///
/// Core engine behavior configuration including logging and debug features.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level filter passed to env_logger (`error`, `warn`, `info`, ...)
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Dump template tree outlines at debug level while loading and instancing
    pub debug_template_trees: bool,
    /// Name given to the animation manager component created by instancing
    pub animation_manager_name: String,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            debug_template_trees: false,
            animation_manager_name: "animation_manager".to_string(),
        }
    }

    /// Enable template tree dumps
    pub fn with_tree_debugging(mut self, enabled: bool) -> Self {
        self.debug_template_trees = enabled;
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Animation Configuration
///
/// Playback defaults given to every animation instance created by instancing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// What happens when playback passes the end of an animation
    pub default_loop_mode: LoopMode,
    /// Start playing instanced animations immediately
    pub auto_play: bool,
    /// Tick rate substituted when an animation reports zero ticks per second
    pub default_ticks_per_second: f64,
}

impl AnimationConfig {
    /// Create a new animation configuration
    pub fn new() -> Self {
        Self {
            default_loop_mode: LoopMode::Loop,
            auto_play: false,
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
        }
    }

    /// Set the default loop mode
    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.default_loop_mode = mode;
        self
    }

    /// Start instanced animations immediately
    pub fn with_auto_play(mut self, enabled: bool) -> Self {
        self.auto_play = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_ticks_per_second.is_finite() && self.default_ticks_per_second > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default_ticks_per_second must be positive, got {}",
                self.default_ticks_per_second
            )));
        }
        Ok(())
    }

    /// Replace an invalid tick rate with [`DEFAULT_TICKS_PER_SECOND`]
    pub fn sanitize(&mut self) {
        if let Err(err) = self.validate() {
            log::warn!("{}; using {} ticks per second", err, DEFAULT_TICKS_PER_SECOND);
            self.default_ticks_per_second = DEFAULT_TICKS_PER_SECOND;
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Asset Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory prepended to relative template paths
    pub assets_dir: String,
    /// Whether loaded template trees are cached by path
    pub enable_caching: bool,
}

impl AssetConfig {
    /// Create a new asset configuration
    pub fn new() -> Self {
        Self {
            assets_dir: "resources".to_string(),
            enable_caching: true,
        }
    }

    /// Set assets directory
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Configure caching
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.enable_caching = enabled;
        self
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene tree configuration
    pub scene: SceneConfig,
    /// Animation playback defaults
    pub animation: AnimationConfig,
    /// Asset system configuration
    pub assets: AssetConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.engine.log_level
            )));
        }
        self.animation.validate()
    }

    /// Replace invalid values with their defaults, logging each one
    pub fn sanitize(&mut self) {
        if self.engine.log_level.parse::<log::LevelFilter>().is_err() {
            log::warn!("Unknown log level '{}'; using 'info'", self.engine.log_level);
            self.engine.log_level = EngineConfig::default().log_level;
        }
        self.animation.sanitize();
    }
}

impl Config for ApplicationConfig {}
