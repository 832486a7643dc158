//! Skeleton assembly and skinning matrices

use approx::assert_relative_eq;

use super::*;
use crate::render::MaterialRegistry;
use crate::template::BoneId;

#[test]
fn test_skeleton_is_sorted_and_sized() {
    let mut tree = character_tree();
    // Pre-assigned IDs out of tree order
    if let Some(bone) = tree.find_node_mut("hips").and_then(|node| node.as_bone_bearing_mut()) {
        bone.bone_id = Some(BoneId(4));
    }
    let mut scene = SceneTree::new();
    let info = scene.instantiate(&tree, scene.root(), None, &MaterialRegistry::new()).unwrap();

    let skeleton = scene.skeleton(info.skeleton.unwrap()).unwrap();
    assert!(skeleton.is_sorted());
    let ids: Vec<u32> = skeleton.bones().iter().map(|bone| bone.bone_id.0).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(skeleton.bone_count(), 5);
    assert_eq!(skeleton.models().len(), 1);

    let root_transform = scene.component(info.root).unwrap().transform();
    assert_eq!(skeleton.global_inverse_transform(), Some(root_transform));
}

#[test]
fn test_bone_components_carry_ids_and_offsets() {
    let tree = character_tree();
    let mut scene = SceneTree::new();
    let info = scene.instantiate(&tree, scene.root(), None, &MaterialRegistry::new()).unwrap();

    let spine = scene.search_from(info.root, "spine").unwrap();
    let bone = scene.component(spine).unwrap().as_bone().unwrap();
    assert_eq!(bone.bone_id, Some(BoneId(1)));
    assert_eq!(bone.skeleton, info.skeleton);
    assert_relative_eq!(bone.offset, Mat4::new_translation(&Vec3::new(0.0, -1.5, 0.0)));
}

#[test]
fn test_bind_pose_matrices_are_identity_wherever_placed() {
    let tree = character_tree();
    let mut scene = SceneTree::new();
    let spawn = spawn_point(&mut scene, Vec3::new(10.0, 0.0, -3.0));
    let info = scene.instantiate(&tree, spawn, None, &MaterialRegistry::new()).unwrap();

    scene.update_skeletons();
    let skeleton = scene.skeleton(info.skeleton.unwrap()).unwrap();
    for bone in [BoneId(0), BoneId(1)] {
        assert_relative_eq!(skeleton.batch().get(bone).unwrap(), Mat4::identity(), epsilon = 1e-5);
    }
    assert_eq!(skeleton.batch().as_bytes().len(), 2 * std::mem::size_of::<[[f32; 4]; 4]>());
}

#[test]
fn test_moving_a_bone_moves_its_children() {
    let tree = character_tree();
    let mut scene = SceneTree::new();
    let info = scene.instantiate(&tree, scene.root(), None, &MaterialRegistry::new()).unwrap();

    let hips = scene.search_from(info.root, "hips").unwrap();
    scene.transform_mut(hips).unwrap().set_position(Vec3::new(0.0, 3.0, 0.0));
    scene.update_skeletons();

    let batch = scene.skeleton(info.skeleton.unwrap()).unwrap().batch();
    for bone in [BoneId(0), BoneId(1)] {
        let matrix = batch.get(bone).unwrap();
        assert_relative_eq!(matrix.column(3).xyz(), Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }
}

#[test]
fn test_unmapped_bone_is_left_out_of_skeleton() {
    let mut tree = TemplateTree::new("models/unmapped.dae");
    tree.root_mut().add_bone_child("orphan");
    let mut scene = SceneTree::new();
    let info = scene.instantiate(&tree, scene.root(), None, &MaterialRegistry::new()).unwrap();

    assert_eq!(info.component_count, 2);
    let orphan = scene.search_from(info.root, "orphan").unwrap();
    assert_eq!(scene.component(orphan).unwrap().as_bone().unwrap().bone_id, None);

    let skeleton = scene.skeleton(info.skeleton.unwrap()).unwrap();
    assert!(skeleton.bones().is_empty());
    assert_eq!(skeleton.bone_count(), 0);
}

#[test]
fn test_bone_found_through_mapping_when_node_has_no_id() {
    let mut tree = TemplateTree::new("models/late.dae");
    tree.root_mut().add_bone_child("arm");
    tree.bone_mapping_mut().get_bone_id("leg");
    tree.bone_mapping_mut().get_bone_id("arm");
    let mut scene = SceneTree::new();
    let info = scene.instantiate(&tree, scene.root(), None, &MaterialRegistry::new()).unwrap();

    let skeleton = scene.skeleton(info.skeleton.unwrap()).unwrap();
    assert_eq!(skeleton.bones()[0].bone_id, BoneId(1));
    assert_eq!(skeleton.bone_count(), 2);
}

#[test]
fn test_trees_without_bones_get_no_skeleton() {
    let mut tree = TemplateTree::new("models/crate.obj");
    tree.root_mut().add_mesh_child("crate");
    let mut scene = SceneTree::new();
    let info = scene.instantiate(&tree, scene.root(), None, &MaterialRegistry::new()).unwrap();

    assert!(info.skeleton.is_none());
    assert_eq!(scene.skeletons().count(), 0);
    let model = scene.search_from(info.root, "crate").unwrap();
    assert_eq!(scene.component(model).unwrap().as_model().unwrap().skeleton, None);
}
