//! Skeletons assembled while instancing template trees
//!
//! A [`SkeletonInfo`] collects the bone components of one instancing pass.
//! Once finalised its bones are sorted by bone ID and its matrix batch is
//! sized so the matrix for bone `n` lives at index `n`.

use crate::foundation::collections::{ComponentId, TransformId};
use crate::foundation::math::Mat4;
use crate::template::BoneId;
use super::transform::TransformArena;

/// Column-major 4x4 matrix as uploaded to the GPU
pub type GpuMatrix = [[f32; 4]; 4];

/// A bone component registered with a skeleton
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonBone {
    /// Bone component
    pub component: ComponentId,
    /// Transform of the bone component
    pub transform: TransformId,
    /// Bone ID from the tree's bone mapping
    pub bone_id: BoneId,
    /// Mesh space to bone space in bind pose
    pub offset: Mat4,
}

/// Skinning matrices indexed by bone ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneMatrixBatch {
    matrices: Vec<GpuMatrix>,
}

impl BoneMatrixBatch {
    /// Number of bones the batch is sized for
    pub fn bone_count(&self) -> usize {
        self.matrices.len()
    }

    /// Resize to `count` bones; new slots hold identity
    pub fn resize(&mut self, count: usize) {
        self.matrices.resize(count, Mat4::identity().into());
    }

    /// Matrix for `bone`
    pub fn get(&self, bone: BoneId) -> Option<Mat4> {
        self.matrices.get(bone.index()).map(|columns| Mat4::from(*columns))
    }

    /// Store the matrix for `bone`; ignored when out of range
    pub fn set(&mut self, bone: BoneId, matrix: &Mat4) {
        match self.matrices.get_mut(bone.index()) {
            Some(slot) => *slot = (*matrix).into(),
            None => log::warn!("Bone {} is outside a batch of {} bones", bone, self.matrices.len()),
        }
    }

    /// Matrices in bone ID order
    pub fn matrices(&self) -> &[GpuMatrix] {
        &self.matrices
    }

    /// Raw bytes ready for a uniform or storage buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }
}

/// Bones and skinning state of one instanced template tree
#[derive(Debug, Clone, Default)]
pub struct SkeletonInfo {
    bones: Vec<SkeletonBone>,
    models: Vec<ComponentId>,
    global_inverse: Option<TransformId>,
    batch: BoneMatrixBatch,
}

impl SkeletonInfo {
    /// Empty skeleton
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bone; order is fixed by [`finalize`](Self::finalize)
    pub fn add_bone(&mut self, bone: SkeletonBone) {
        self.bones.push(bone);
    }

    /// Register a model component skinned by this skeleton
    pub fn add_model(&mut self, model: ComponentId) {
        self.models.push(model);
    }

    /// Registered bones
    pub fn bones(&self) -> &[SkeletonBone] {
        &self.bones
    }

    /// Registered model components
    pub fn models(&self) -> &[ComponentId] {
        &self.models
    }

    /// Bone registered for `bone_id`
    pub fn bone(&self, bone_id: BoneId) -> Option<&SkeletonBone> {
        self.bones.iter().find(|bone| bone.bone_id == bone_id)
    }

    /// Sort bones by ascending bone ID (stable for equal IDs)
    pub fn sort_bones(&mut self) {
        self.bones.sort_by_key(|bone| bone.bone_id);
    }

    /// Whether bones are in non-decreasing bone ID order
    pub fn is_sorted(&self) -> bool {
        self.bones.windows(2).all(|pair| pair[0].bone_id <= pair[1].bone_id)
    }

    /// Transform whose world matrix is undone before skinning
    pub fn global_inverse_transform(&self) -> Option<TransformId> {
        self.global_inverse
    }

    /// Set the transform whose world matrix is undone before skinning
    pub fn set_global_inverse_transform(&mut self, transform: TransformId) {
        self.global_inverse = Some(transform);
    }

    /// Size the matrix batch for the highest registered bone ID
    pub fn recalculate_bone_count(&mut self) {
        let count = self.bones.iter().map(|bone| bone.bone_id.index() + 1).max().unwrap_or(0);
        self.batch.resize(count);
    }

    /// Sort bones, set the global inverse transform and size the batch
    pub fn finalize(&mut self, global_inverse: TransformId) {
        self.sort_bones();
        self.set_global_inverse_transform(global_inverse);
        self.recalculate_bone_count();
    }

    /// Number of matrices the GPU buffer needs
    pub fn bone_count(&self) -> usize {
        self.batch.bone_count()
    }

    /// Skinning matrix batch
    pub fn batch(&self) -> &BoneMatrixBatch {
        &self.batch
    }

    /// Forget every bone and model belonging to `component`
    pub fn remove_component(&mut self, component: ComponentId) {
        self.bones.retain(|bone| bone.component != component);
        self.models.retain(|&model| model != component);
    }

    /// Whether nothing references this skeleton any more
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty() && self.models.is_empty()
    }

    /// Recompute every skinning matrix as
    /// `inverse(world(global)) * world(bone) * offset`
    ///
    /// Bones whose transform no longer exists keep their previous matrix.
    pub fn update_bone_matrices(&mut self, transforms: &TransformArena) {
        let global_inverse = self
            .global_inverse
            .and_then(|id| transforms.world_matrix(id))
            .and_then(|world| world.try_inverse())
            .unwrap_or_else(Mat4::identity);

        for bone in &self.bones {
            let Some(world) = transforms.world_matrix(bone.transform) else {
                log::trace!("Skipping bone {} with a stale transform", bone.bone_id);
                continue;
            };
            self.batch.set(bone.bone_id, &(global_inverse * world * bone.offset));
        }
    }
}
