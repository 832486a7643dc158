//! Input state consumed by components during input handling
//!
//! Windowing and event polling happen outside the scene. The host feeds key
//! events into an [`InputManager`] and passes it to
//! [`SceneTree::handle_inputs_all`](crate::scene::SceneTree::handle_inputs_all)
//! as an [`InputState`].

use std::collections::HashSet;

use crate::foundation::math::Vec2;

/// Read-only view of the current input state
pub trait InputState {
    /// Whether `key` is currently held
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Mouse movement since the last frame, in pixels
    fn mouse_delta(&self) -> Vec2 {
        Vec2::zeros()
    }
}

/// Input manager
#[derive(Debug, Default)]
pub struct InputManager {
    keys_down: HashSet<KeyCode>,
    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; clears per-frame deltas
    pub fn update(&mut self) {
        self.mouse_delta = Vec2::zeros();
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Handle mouse movement
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        if let Some(previous) = self.mouse_position {
            self.mouse_delta += position - previous;
        }
        self.mouse_position = Some(position);
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.mouse_delta = Vec2::zeros();
    }
}

impl InputState for InputManager {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Left shift
    LeftShift,
    /// Left control
    LeftControl,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_and_release() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::W, true);
        assert!(input.is_key_down(KeyCode::W));
        assert!(!input.is_key_down(KeyCode::S));

        input.handle_key_input(KeyCode::W, false);
        assert!(!input.is_key_down(KeyCode::W));
    }

    #[test]
    fn test_mouse_delta_resets_each_frame() {
        let mut input = InputManager::new();
        input.handle_mouse_move(10.0, 10.0);
        input.handle_mouse_move(13.0, 6.0);
        assert_eq!(input.mouse_delta(), Vec2::new(3.0, -4.0));

        input.update();
        assert_eq!(input.mouse_delta(), Vec2::zeros());
    }
}
