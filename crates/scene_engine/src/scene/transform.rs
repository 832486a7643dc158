//! Live transforms and the arena that owns them
//!
//! Every component owns one [`Transform`] stored in the scene's
//! [`TransformArena`]. Parent links are arena handles, so world matrices are
//! composed on demand by walking up the chain. Interpolators attached to a
//! transform drive its local fields over time.

use bitflags::bitflags;

use crate::animation::{FieldValue, Interpolator, InterpolatorStep, TransformField};
use crate::foundation::collections::{SlotMap, TransformId};
use crate::foundation::math::{LocalTransform, Mat4, Quat, Vec3};
use super::error::SceneError;

bitflags! {
    /// Fields protected from interpolator and animation writes
    ///
    /// Explicit setters ignore these flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Constraints: u8 {
        /// Keep position x
        const LOCK_X = 1 << 0;
        /// Keep position y
        const LOCK_Y = 1 << 1;
        /// Keep position z
        const LOCK_Z = 1 << 2;
        /// Keep rotation
        const LOCK_ROTATION = 1 << 3;
        /// Keep scale
        const LOCK_SCALE = 1 << 4;
        /// Keep every position axis
        const LOCK_POSITION = Self::LOCK_X.bits() | Self::LOCK_Y.bits() | Self::LOCK_Z.bits();
    }
}

/// Forward direction of an unrotated transform
pub const DEFAULT_FRONT: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Position, rotation, scale and front vector of one component
#[derive(Debug, Clone)]
pub struct Transform {
    local: LocalTransform,
    front: Vec3,
    constraints: Constraints,
    parent: Option<TransformId>,
    interpolators: Vec<Interpolator>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(LocalTransform::identity())
    }
}

impl Transform {
    /// Unparented transform with the given local fields
    pub fn new(local: LocalTransform) -> Self {
        Self {
            front: local.rotation * DEFAULT_FRONT,
            local,
            constraints: Constraints::empty(),
            parent: None,
            interpolators: Vec::new(),
        }
    }

    /// Local fields
    pub fn local(&self) -> &LocalTransform {
        &self.local
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.local.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.local.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.local.scale
    }

    /// Front vector
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Constraint flags
    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    /// Parent transform, if linked
    pub fn parent(&self) -> Option<TransformId> {
        self.parent
    }

    /// Set local position
    pub fn set_position(&mut self, position: Vec3) {
        self.local.position = position;
    }

    /// Set local rotation; the front vector follows
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.local.rotation = rotation;
        self.front = rotation * DEFAULT_FRONT;
    }

    /// Set local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.local.scale = scale;
    }

    /// Set the front vector without touching rotation
    pub fn set_front(&mut self, front: Vec3) {
        self.front = front;
    }

    /// Replace all local fields; the front vector follows the new rotation
    pub fn set_local(&mut self, local: LocalTransform) {
        self.local = local;
        self.front = local.rotation * DEFAULT_FRONT;
    }

    /// Replace the constraint flags
    pub fn set_constraints(&mut self, constraints: Constraints) {
        self.constraints = constraints;
    }

    /// Copy local fields, front vector and constraints from `other`
    ///
    /// The parent link and interpolators are left as they are.
    pub fn copy_fields_from(&mut self, other: &Transform) {
        self.local = other.local;
        self.front = other.front;
        self.constraints = other.constraints;
    }

    /// Local matrix (TRS)
    pub fn local_matrix(&self) -> Mat4 {
        self.local.to_matrix()
    }

    /// Write an animated value into a field, honouring the constraint flags
    pub fn apply_field(&mut self, field: TransformField, value: FieldValue) {
        match (field, value) {
            (TransformField::Position, FieldValue::Vector(mut position)) => {
                let current = self.local.position;
                if self.constraints.contains(Constraints::LOCK_X) {
                    position.x = current.x;
                }
                if self.constraints.contains(Constraints::LOCK_Y) {
                    position.y = current.y;
                }
                if self.constraints.contains(Constraints::LOCK_Z) {
                    position.z = current.z;
                }
                self.local.position = position;
            }
            (TransformField::Rotation, FieldValue::Rotation(rotation)) => {
                if !self.constraints.contains(Constraints::LOCK_ROTATION) {
                    self.set_rotation(rotation);
                }
            }
            (TransformField::Scale, FieldValue::Vector(scale)) => {
                if !self.constraints.contains(Constraints::LOCK_SCALE) {
                    self.local.scale = scale;
                }
            }
            (field, value) => {
                log::warn!("Ignoring {:?} written to transform field '{}'", value, field);
            }
        }
    }

    /// Attach an interpolator to `field`
    ///
    /// Interpolators run in the order they were added, so when several cover
    /// the same field at the same time the most recently added one wins.
    /// Returns `false` (and logs) when a value does not fit the field.
    pub fn add_interpolator(
        &mut self,
        field: TransformField,
        start_time: f64,
        duration: f64,
        start_value: impl Into<FieldValue>,
        end_value: impl Into<FieldValue>,
    ) -> bool {
        match Interpolator::new(field, start_time, duration, start_value.into(), end_value.into()) {
            Some(interpolator) => {
                self.interpolators.push(interpolator);
                true
            }
            None => {
                log::warn!("Interpolator values do not match transform field '{}'", field);
                false
            }
        }
    }

    /// Drop every interpolator on `field`, then attach a new one
    pub fn replace_interpolators(
        &mut self,
        field: TransformField,
        start_time: f64,
        duration: f64,
        start_value: impl Into<FieldValue>,
        end_value: impl Into<FieldValue>,
    ) -> bool {
        self.interpolators.retain(|interpolator| interpolator.field() != field);
        self.add_interpolator(field, start_time, duration, start_value, end_value)
    }

    /// Active interpolators, in application order
    pub fn interpolators(&self) -> &[Interpolator] {
        &self.interpolators
    }

    /// Number of interpolators still running on `field`
    pub fn interpolator_count(&self, field: TransformField) -> usize {
        self.interpolators.iter().filter(|interpolator| interpolator.field() == field).count()
    }

    /// Drop all interpolators
    pub fn clear_interpolators(&mut self) {
        self.interpolators.clear();
    }

    /// Advance every interpolator by `dt` seconds and write the results
    ///
    /// Interpolators past their span write their end value and are removed.
    pub fn update(&mut self, dt: f32) {
        if self.interpolators.is_empty() {
            return;
        }
        let mut interpolators = std::mem::take(&mut self.interpolators);
        interpolators.retain_mut(|interpolator| match interpolator.advance(f64::from(dt)) {
            InterpolatorStep::Pending => true,
            InterpolatorStep::Active(value) => {
                self.apply_field(interpolator.field(), value);
                true
            }
            InterpolatorStep::Finished(value) => {
                self.apply_field(interpolator.field(), value);
                false
            }
        });
        self.interpolators = interpolators;
    }
}

/// Owner of every transform in a scene
#[derive(Debug, Default)]
pub struct TransformArena {
    transforms: SlotMap<TransformId, Transform>,
}

impl TransformArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a transform; its parent link is cleared
    pub fn insert(&mut self, mut transform: Transform) -> TransformId {
        transform.parent = None;
        self.transforms.insert(transform)
    }

    /// Remove a transform and unlink every transform parented to it
    pub fn remove(&mut self, id: TransformId) -> Option<Transform> {
        let removed = self.transforms.remove(id)?;
        for (_, transform) in self.transforms.iter_mut() {
            if transform.parent == Some(id) {
                transform.parent = None;
            }
        }
        Some(removed)
    }

    /// Transform by handle
    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id)
    }

    /// Mutable transform by handle
    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.transforms.get_mut(id)
    }

    /// Whether `id` is live
    pub fn contains(&self, id: TransformId) -> bool {
        self.transforms.contains_key(id)
    }

    /// Number of transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Parent of `id`
    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.transforms.get(id).and_then(|transform| transform.parent)
    }

    /// Link `child` under `parent`, or unlink it with `None`
    ///
    /// Local fields are left untouched; only world composition changes.
    pub fn set_parent(&mut self, child: TransformId, parent: Option<TransformId>) -> Result<(), SceneError> {
        if !self.transforms.contains_key(child) {
            return Err(SceneError::StaleTransform(child));
        }
        if let Some(parent) = parent {
            if !self.transforms.contains_key(parent) {
                return Err(SceneError::StaleTransform(parent));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(SceneError::TransformCycle { child, parent });
            }
        }
        if let Some(transform) = self.transforms.get_mut(child) {
            transform.parent = parent;
        }
        Ok(())
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    fn is_ancestor_or_self(&self, ancestor: TransformId, id: TransformId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// World matrix: parent world times local, or local when unparented
    pub fn world_matrix(&self, id: TransformId) -> Option<Mat4> {
        let transform = self.transforms.get(id)?;
        let mut matrix = transform.local_matrix();
        let mut parent = transform.parent;
        while let Some(parent_id) = parent {
            let Some(parent_transform) = self.transforms.get(parent_id) else {
                break;
            };
            matrix = parent_transform.local_matrix() * matrix;
            parent = parent_transform.parent;
        }
        Some(matrix)
    }

    /// World position, rotation and scale (shear discarded)
    pub fn world_transform(&self, id: TransformId) -> Option<LocalTransform> {
        self.world_matrix(id).map(|matrix| LocalTransform::from_matrix(&matrix))
    }

    /// Advance the interpolators of one transform
    pub fn update(&mut self, id: TransformId, dt: f32) {
        if let Some(transform) = self.transforms.get_mut(id) {
            transform.update(dt);
        }
    }
}
