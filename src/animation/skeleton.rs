//! Bones of a skinned mesh and the name table that indexes them.

use std::collections::{HashMap, VecDeque};

use super::node::{NodeId, NodeTree};
use crate::math::mat4::Mat4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    /// Inverse bind pose: mesh space to bone space. Fixed at load time.
    pub offset: Mat4,
    /// `global node transform * offset`, rewritten by every evaluation.
    pub final_transform: Mat4,
}

/// Bones in insertion order plus a name → index map.
///
/// Indices are stable once assigned; vertex weights refer to bones by them.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    bone_map: HashMap<String, usize>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bone and returns its index. A name that is already
    /// present keeps its original index and offset.
    pub fn add_bone(&mut self, name: impl Into<String>, offset: Mat4) -> usize {
        let name = name.into();
        if let Some(&index) = self.bone_map.get(&name) {
            return index;
        }
        let index = self.bones.len();
        self.bones.push(Bone {
            offset,
            final_transform: Mat4::identity(),
        });
        self.bone_map.insert(name, index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bone_map.get(name).copied()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_mut(&mut self, index: usize) -> Option<&mut Bone> {
        self.bones.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Copies out the current final transforms, indexed by bone.
    pub fn final_transforms(&self) -> Vec<Mat4> {
        self.bones.iter().map(|b| b.final_transform).collect()
    }

    /// Breadth-first search for the shallowest node that names a bone.
    ///
    /// Rigs exported from some tools hang the skeleton below helper nodes, so
    /// the first bone, not the scene root, is the animation root.
    pub fn find_root_bone(&self, tree: &NodeTree) -> Option<NodeId> {
        let mut queue = VecDeque::from([tree.root()?]);
        while let Some(id) = queue.pop_front() {
            let node = tree.get(id)?;
            if self.bone_map.contains_key(&node.name) {
                return Some(id);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }
}
