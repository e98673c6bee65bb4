//! Skeletal animation: scene hierarchy, keyframed clips and the evaluator
//! that turns a playback time into one skinning matrix per bone.

mod clip;
mod node;
mod skeleton;

pub use clip::{sample, Animation, Interpolate, Keyframe, NodeChannel, DEFAULT_TICKS_PER_SECOND};
pub use node::{Node, NodeId, NodeTree};
pub use skeleton::{Bone, Skeleton};

use crate::math::mat4::Mat4;

/// Poses `skeleton` at `seconds` of playback and returns its final
/// transforms, indexed by bone.
///
/// The tree is walked depth-first from the root with an identity parent
/// transform. A node that has a channel in `animation` *and* names a bone
/// takes its local transform from the interpolated keys; every other node
/// keeps its bind-pose transform. Each bone node stores
/// `global * offset` into its [`Bone::final_transform`]. Bones that no node
/// names keep whatever transform they had before.
pub fn evaluate(
    tree: &NodeTree,
    animation: &Animation,
    skeleton: &mut Skeleton,
    seconds: f32,
) -> Vec<Mat4> {
    let ticks = animation.ticks_at(seconds);
    if let Some(root) = tree.root() {
        visit(tree, root, animation, skeleton, ticks, Mat4::identity());
    }
    skeleton.final_transforms()
}

fn visit(
    tree: &NodeTree,
    id: NodeId,
    animation: &Animation,
    skeleton: &mut Skeleton,
    ticks: f32,
    parent: Mat4,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let bone = skeleton.index_of(&node.name);

    let local = match (animation.channel(&node.name), bone) {
        (Some(channel), Some(_)) => channel.local_transform(ticks),
        _ => node.transform,
    };
    let global = parent * local;

    if let Some(bone) = bone.and_then(|index| skeleton.bone_mut(index)) {
        bone.final_transform = global * bone.offset;
    }

    for &child in &node.children {
        visit(tree, child, animation, skeleton, ticks, global);
    }
}
