//! Asset loading interface
//!
//! Parsing model files is left to the host; it plugs in through
//! [`TemplateLoader`] and hands back fully built [`TemplateTree`]s.

use thiserror::Error;

use crate::template::TemplateTree;

/// Builds template trees from asset files
pub trait TemplateLoader {
    /// Load the tree stored at `path`
    fn load(&mut self, path: &str) -> Result<TemplateTree, AssetError>;
}

impl<F> TemplateLoader for F
where
    F: FnMut(&str) -> Result<TemplateTree, AssetError>,
{
    fn load(&mut self, path: &str) -> Result<TemplateTree, AssetError> {
        self(path)
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
