//! # Core Engine Module
//!
//! Shared abstractions used throughout the scene core.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for logging, scene, animation and assets
//! - **Foundation**: Low-level utilities (math, handles, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    SceneConfig,
    AnimationConfig,
    AssetConfig,
    Config,
    ConfigError,
};
