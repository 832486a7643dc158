//! Time-bounded interpolators attached to transform fields
//!
//! An [`Interpolator`] owns its own time cursor. Each frame the owning
//! transform advances the cursor by the frame delta; once the cursor passes
//! `start_time` the interpolator produces values between its two endpoints,
//! and once it passes `start_time + duration` it reports the end value one last
//! time and is retired.

use std::fmt;
use std::str::FromStr;

use crate::foundation::math::{utils, Quat, Vec3};

/// Values that can be blended between two keyframes
pub trait Interpolate: Copy {
    /// Blend from `self` to `other`, `t` in `[0, 1]`
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        utils::lerp_vec3(self, other, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        utils::slerp(self, other, t)
    }
}

/// Transform field an interpolator writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformField {
    /// Local position
    Position,
    /// Local rotation
    Rotation,
    /// Local scale
    Scale,
}

impl TransformField {
    /// Field name as used by animation data (`"position"`, `"rotation"`, `"scale"`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }

    /// Whether `value` has the right shape for this field
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::Position | Self::Scale, FieldValue::Vector(_)) | (Self::Rotation, FieldValue::Rotation(_))
        )
    }
}

impl fmt::Display for TransformField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown field name
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transform field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for TransformField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(Self::Position),
            "rotation" => Ok(Self::Rotation),
            "scale" => Ok(Self::Scale),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// Value written into a transform field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Position or scale
    Vector(Vec3),
    /// Rotation
    Rotation(Quat),
}

impl From<Vec3> for FieldValue {
    fn from(value: Vec3) -> Self {
        Self::Vector(value)
    }
}

impl From<Quat> for FieldValue {
    fn from(value: Quat) -> Self {
        Self::Rotation(value)
    }
}

impl FieldValue {
    /// Blend two values of the same shape; `None` when the shapes differ
    pub fn interpolate(&self, other: &Self, t: f32) -> Option<Self> {
        match (self, other) {
            (Self::Vector(a), Self::Vector(b)) => Some(Self::Vector(a.interpolate(b, t))),
            (Self::Rotation(a), Self::Rotation(b)) => Some(Self::Rotation(a.interpolate(b, t))),
            _ => None,
        }
    }
}

/// Result of advancing an interpolator's cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolatorStep {
    /// Cursor has not reached the start time yet; nothing to write
    Pending,
    /// Cursor is inside the span
    Active(FieldValue),
    /// Cursor passed the span; the end value should be written and the interpolator retired
    Finished(FieldValue),
}

/// A time-bounded blend between two values of one transform field
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    field: TransformField,
    start_time: f64,
    duration: f64,
    start: FieldValue,
    end: FieldValue,
    cursor: f64,
}

impl Interpolator {
    /// Create an interpolator; `None` when a value does not fit `field`
    ///
    /// A negative duration is treated as zero.
    pub fn new(
        field: TransformField,
        start_time: f64,
        duration: f64,
        start: FieldValue,
        end: FieldValue,
    ) -> Option<Self> {
        if !field.accepts(&start) || !field.accepts(&end) {
            return None;
        }
        Some(Self {
            field,
            start_time,
            duration: duration.max(0.0),
            start,
            end,
            cursor: 0.0,
        })
    }

    /// Field this interpolator writes into
    pub fn field(&self) -> TransformField {
        self.field
    }

    /// Time at which the interpolator starts producing values
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Length of the span
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time at which the interpolator retires
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Current position of the time cursor
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Value at an arbitrary time, clamped to the span
    pub fn sample_at(&self, time: f64) -> FieldValue {
        if self.duration <= 0.0 || time >= self.end_time() {
            return self.end;
        }
        if time <= self.start_time {
            return self.start;
        }
        let t = ((time - self.start_time) / self.duration) as f32;
        // Shapes are validated in new()
        self.start.interpolate(&self.end, t).unwrap_or(self.end)
    }

    /// Move the cursor forward by `dt` seconds and report what to write
    pub fn advance(&mut self, dt: f64) -> InterpolatorStep {
        self.cursor += dt;
        if self.cursor < self.start_time {
            InterpolatorStep::Pending
        } else if self.duration <= 0.0 || self.cursor >= self.end_time() {
            InterpolatorStep::Finished(self.end)
        } else {
            InterpolatorStep::Active(self.sample_at(self.cursor))
        }
    }
}
