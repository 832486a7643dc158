//! Payloads of the non-structural component kinds
//!
//! Cameras, lights, sound sources and text labels are leaves of the scene
//! hierarchy that other subsystems read from. They carry plain data plus the
//! few behaviours the scene drives itself (camera fly control, light radius).

use std::sync::Arc;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::input::{InputState, KeyCode};
use crate::render::{Font, TextAlignment};
use super::transform::Transform;

const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Whether this camera is the one the scene renders from
    pub active: bool,
    /// Fly speed in units per second; zero disables keyboard control
    pub speed_per_sec: f32,
}

impl CameraData {
    /// Camera with a 90 degree vertical field of view
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect,
            near: 0.01,
            far: 100.0,
            active: false,
            speed_per_sec: 0.0,
        }
    }

    /// Builder pattern: keyboard fly speed
    pub fn with_speed(mut self, speed_per_sec: f32) -> Self {
        self.speed_per_sec = speed_per_sec;
        self
    }

    /// Builder pattern: mark as the active camera
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Projection matrix
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }

    /// View matrix for a camera whose world matrix is `world`
    pub fn view(world: &Mat4) -> Mat4 {
        world.try_inverse().unwrap_or_else(Mat4::identity)
    }

    /// Move along the front vector with W/S, strafe with A/D, rise and sink with E/Q
    pub fn handle_inputs(&self, transform: &mut Transform, input: &dyn InputState, dt: f32) {
        if self.speed_per_sec <= 0.0 {
            return;
        }
        let front = transform.front();
        let right = front.cross(&UP);
        let right = if right.norm_squared() > f32::EPSILON { right.normalize() } else { Vec3::x() };

        let mut direction = Vec3::zeros();
        let bindings = [
            (KeyCode::W, front),
            (KeyCode::S, -front),
            (KeyCode::D, right),
            (KeyCode::A, -right),
            (KeyCode::E, UP),
            (KeyCode::Q, -UP),
        ];
        for (key, axis) in bindings {
            if input.is_key_down(key) {
                direction += axis;
            }
        }
        if direction.norm_squared() > 0.0 {
            let step = direction.normalize() * self.speed_per_sec * dt;
            transform.set_position(transform.position() + step);
        }
    }
}

/// Light categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Parallel rays
    Directional,
    /// Radiates in all directions
    Point,
    /// Cone of light
    Spot,
}

/// Phong light source
#[derive(Debug, Clone, PartialEq)]
pub struct LightData {
    /// Light category
    pub light_type: LightType,
    /// Ambient colour
    pub ambient: Vec3,
    /// Diffuse colour
    pub diffuse: Vec3,
    /// Specular colour
    pub specular: Vec3,
    /// Quadratic attenuation factor; zero means no falloff
    pub attenuation: f32,
    /// Inner and outer cone angles in radians for spot lights
    pub cone: (f32, f32),
    /// Distance beyond which the light contributes nothing visible
    pub radius: f32,
}

impl LightData {
    /// Light with white diffuse and specular and no falloff
    pub fn new(light_type: LightType) -> Self {
        let mut light = Self {
            light_type,
            ambient: Vec3::new(0.05, 0.05, 0.05),
            diffuse: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(1.0, 1.0, 1.0),
            attenuation: 0.0,
            cone: (0.0, 0.0),
            radius: 0.0,
        };
        light.calculate_light_radius();
        light
    }

    /// Builder pattern: set the quadratic attenuation and recompute the radius
    pub fn with_attenuation(mut self, attenuation: f32) -> Self {
        self.attenuation = attenuation.max(0.0);
        self.calculate_light_radius();
        self
    }

    /// Recompute [`radius`](Self::radius) from colour and attenuation
    ///
    /// The radius is where the brightest channel drops below 1/256.
    /// Directional lights and lights without falloff get an infinite radius.
    pub fn calculate_light_radius(&mut self) {
        let brightest = self.diffuse.max().max(self.specular.max());
        self.radius = if self.light_type == LightType::Directional || self.attenuation <= 0.0 {
            f32::INFINITY
        } else {
            ((256.0 * brightest - 1.0).max(0.0) / self.attenuation).sqrt()
        };
    }
}

/// Handle to an audio buffer owned by the audio engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundBufferId(pub u64);

/// Positional audio emitter
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSourceData {
    /// Buffer to play
    pub buffer: SoundBufferId,
    /// Volume multiplier
    pub gain: f32,
    /// Whether playback loops
    pub looping: bool,
}

impl SoundSourceData {
    /// Non-looping emitter at full volume
    pub fn new(buffer: SoundBufferId) -> Self {
        Self {
            buffer,
            gain: 1.0,
            looping: false,
        }
    }
}

/// World-space text label
#[derive(Debug, Clone)]
pub struct TextData {
    /// Font shared through the font library
    pub font: Arc<Font>,
    /// Text to draw
    pub content: String,
    /// Horizontal alignment
    pub horizontal: TextAlignment,
    /// Vertical alignment
    pub vertical: TextAlignment,
    /// Text colour
    pub color: Vec3,
}

impl TextData {
    /// White, start-aligned text
    pub fn new(font: Arc<Font>, content: impl Into<String>) -> Self {
        Self {
            font,
            content: content.into(),
            horizontal: TextAlignment::Start,
            vertical: TextAlignment::Start,
            color: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Change alignment on both axes
    pub fn set_alignment(&mut self, horizontal: TextAlignment, vertical: TextAlignment) {
        self.horizontal = horizontal;
        self.vertical = vertical;
    }
}
