//! Skeletal animation through the public API.

use approx::assert_relative_eq;
use skinraster::animation::{evaluate, sample};
use skinraster::prelude::*;

const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

fn assert_point(actual: Vec3, expected: Vec3) {
    assert_relative_eq!(actual.x, expected.x, epsilon = 1e-4);
    assert_relative_eq!(actual.y, expected.y, epsilon = 1e-4);
    assert_relative_eq!(actual.z, expected.z, epsilon = 1e-4);
}

/// `shoulder` at the origin with `elbow` two units up its Y axis.
fn arm() -> (NodeTree, Skeleton) {
    let mut tree = NodeTree::new("shoulder", Mat4::identity());
    let root = tree.root().expect("root");
    tree.add_child(root, "elbow", Mat4::translation(0.0, 2.0, 0.0))
        .expect("root belongs to tree");

    let mut skeleton = Skeleton::new();
    skeleton.add_bone("shoulder", Mat4::identity());
    skeleton.add_bone("elbow", Mat4::translation(0.0, -2.0, 0.0));
    (tree, skeleton)
}

fn channel(node: &str, keys: &[(f32, f32)]) -> NodeChannel {
    let mut channel = NodeChannel::new(node);
    channel.rotations = keys
        .iter()
        .map(|&(time, degrees)| Keyframe::new(time, Quat::from_axis_angle(Z, degrees)))
        .collect();
    channel
}

#[test]
fn keys_are_blended_and_clamped() {
    let keys = [
        Keyframe::new(0.0, Vec3::ZERO),
        Keyframe::new(10.0, Vec3::new(10.0, 0.0, 0.0)),
        Keyframe::new(20.0, Vec3::new(10.0, 20.0, 0.0)),
    ];
    assert_eq!(sample(&keys, 5.0), Some(Vec3::new(5.0, 0.0, 0.0)));
    assert_eq!(sample(&keys, 15.0), Some(Vec3::new(10.0, 10.0, 0.0)));
    assert_eq!(sample(&keys, 25.0), Some(Vec3::new(10.0, 20.0, 0.0)));
    assert_eq!(sample::<Vec3>(&[], 1.0), None);
}

#[test]
fn bind_pose_leaves_vertices_in_place() {
    let (tree, mut skeleton) = arm();
    let clip = Animation::new("idle", 25.0, 10.0);
    let transforms = evaluate(&tree, &clip, &mut skeleton, 0.3);
    for transform in transforms {
        assert_point(transform.transform_point(Vec3::new(0.5, 3.0, 0.0)), Vec3::new(0.5, 3.0, 0.0));
    }
}

#[test]
fn rotating_the_root_carries_the_child() {
    let (tree, mut skeleton) = arm();
    let mut clip = Animation::new("raise", 1.0, 4.0);
    clip.add_channel(channel("shoulder", &[(0.0, 0.0), (2.0, 90.0)]));

    // 1 tick per second: at 1 s the shoulder has turned 45 degrees.
    let transforms = evaluate(&tree, &clip, &mut skeleton, 1.0);
    let s = std::f32::consts::FRAC_1_SQRT_2;
    assert_point(transforms[0].transform_point(Vec3::new(0.0, 2.0, 0.0)), Vec3::new(-2.0 * s, 2.0 * s, 0.0));
    // The elbow keeps its bind offset relative to the shoulder.
    assert_point(transforms[1].transform_point(Vec3::new(0.0, 3.0, 0.0)), Vec3::new(-3.0 * s, 3.0 * s, 0.0));
}

#[test]
fn child_channel_rotates_about_its_own_pivot() {
    let (tree, mut skeleton) = arm();
    let mut clip = Animation::new("bend", 1.0, 4.0);
    let mut elbow = channel("elbow", &[(0.0, 90.0)]);
    elbow.positions = vec![Keyframe::new(0.0, Vec3::new(0.0, 2.0, 0.0))];
    clip.add_channel(elbow);

    let transforms = evaluate(&tree, &clip, &mut skeleton, 0.0);
    // A point one unit past the elbow swings to the elbow's left.
    assert_point(transforms[1].transform_point(Vec3::new(0.0, 3.0, 0.0)), Vec3::new(-1.0, 2.0, 0.0));
    assert_point(transforms[0].transform_point(Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn playback_wraps_around_the_duration() {
    let (tree, mut skeleton) = arm();
    let mut clip = Animation::new("spin", 2.0, 4.0);
    clip.add_channel(channel("shoulder", &[(0.0, 0.0), (4.0, 80.0)]));

    // 2.5 s at 2 ticks/s is tick 5, which wraps to tick 1 (20 degrees).
    let wrapped = evaluate(&tree, &clip, &mut skeleton, 2.5);
    let direct = evaluate(&tree, &clip, &mut skeleton, 0.5);
    for (a, b) in wrapped.iter().zip(&direct) {
        let p = Vec3::new(1.0, 0.0, 0.0);
        assert_point(a.transform_point(p), b.transform_point(p));
    }
    let (sin, cos) = 20f32.to_radians().sin_cos();
    assert_point(wrapped[0].transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(cos, sin, 0.0));
}

#[test]
fn skeleton_root_is_found_below_helper_nodes() {
    let mut tree = NodeTree::new("scene", Mat4::identity());
    let root = tree.root().expect("root");
    let armature = tree.add_child(root, "armature", Mat4::identity()).expect("child");
    tree.add_child(armature, "hips", Mat4::identity()).expect("child");

    let mut skeleton = Skeleton::new();
    skeleton.add_bone("hips", Mat4::identity());
    let hips = skeleton.find_root_bone(&tree).expect("hips is a bone");
    assert_eq!(tree.get(hips).map(|n| n.name.as_str()), Some("hips"));
}
