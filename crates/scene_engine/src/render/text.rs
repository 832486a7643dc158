//! Fonts shared by text components
//!
//! Rasterisation happens in the renderer; the scene only needs a shared handle
//! per font path so every text component using the same font points at the
//! same entry.

use std::collections::HashMap;
use std::sync::Arc;

/// A font known to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Path the font was requested from
    pub path: String,
    /// Pixel height glyphs were rasterised at
    pub pixel_height: u32,
}

/// Horizontal or vertical text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Left or top aligned
    #[default]
    Start,
    /// Centered
    Center,
    /// Right or bottom aligned
    End,
}

/// Cache of fonts keyed by path
#[derive(Debug)]
pub struct FontLibrary {
    fonts: HashMap<String, Arc<Font>>,
    pixel_height: u32,
}

impl FontLibrary {
    /// Default rasterisation height for newly requested fonts
    pub const DEFAULT_PIXEL_HEIGHT: u32 = 48;

    /// Create an empty font library
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            pixel_height: Self::DEFAULT_PIXEL_HEIGHT,
        }
    }

    /// Return the font for `path`, registering it on first use
    pub fn get_or_load(&mut self, path: &str) -> Arc<Font> {
        let pixel_height = self.pixel_height;
        let font = self.fonts.entry(path.to_string()).or_insert_with(|| {
            log::debug!("Registering font '{}' at {}px", path, pixel_height);
            Arc::new(Font {
                path: path.to_string(),
                pixel_height,
            })
        });
        Arc::clone(font)
    }

    /// Number of distinct fonts
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no font has been requested yet
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_shares_font() {
        let mut fonts = FontLibrary::new();
        let a = fonts.get_or_load("fonts/mono.ttf");
        let b = fonts.get_or_load("fonts/mono.ttf");
        let c = fonts.get_or_load("fonts/serif.ttf");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(fonts.len(), 2);
    }
}
