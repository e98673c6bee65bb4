//! Per-vertex attribute storage addressed by typed handles.
//!
//! Each `add_*` call takes ownership of a buffer and returns a handle that
//! stays valid for the life of the store. Handles come from one counter that
//! starts at 1 and is never reused, so a handle of one kind never aliases a
//! handle of another even if the raw numbers are compared.

use std::collections::HashMap;

use crate::error::{BufferKind, RenderError};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

macro_rules! buffer_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const KIND: BufferKind = $kind;

            /// The raw handle value, unique across every buffer kind.
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

buffer_id!(
    /// Handle to a buffer of object-space positions.
    PositionBufferId,
    BufferKind::Position
);
buffer_id!(
    /// Handle to a buffer of object-space normals.
    NormalBufferId,
    BufferKind::Normal
);
buffer_id!(
    /// Handle to a buffer of texture coordinates.
    UvBufferId,
    BufferKind::Uv
);
buffer_id!(
    /// Handle to a buffer of RGBA vertex colours.
    ColorBufferId,
    BufferKind::Color
);
buffer_id!(
    /// Handle to a buffer of triangle index triples.
    IndexBufferId,
    BufferKind::Index
);
buffer_id!(
    /// Handle to a buffer of per-vertex bone influence lists.
    BoneWeightBufferId,
    BufferKind::BoneWeight
);

/// One bone's influence on a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub bone: usize,
    pub weight: f32,
}

impl VertexWeight {
    pub fn new(bone: usize, weight: f32) -> Self {
        Self { bone, weight }
    }
}

/// Influence list of every vertex. An empty list marks an unskinned vertex.
pub type BoneWeights = Vec<Vec<VertexWeight>>;

/// Owns every vertex attribute buffer uploaded to a renderer.
///
/// There is no removal API; buffers live as long as the store.
#[derive(Debug)]
pub struct BufferStore {
    next_id: u32,
    positions: HashMap<u32, Vec<Vec3>>,
    normals: HashMap<u32, Vec<Vec3>>,
    uvs: HashMap<u32, Vec<Vec2>>,
    colors: HashMap<u32, Vec<Vec4>>,
    indices: HashMap<u32, Vec<[u32; 3]>>,
    bone_weights: HashMap<u32, BoneWeights>,
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            positions: HashMap::new(),
            normals: HashMap::new(),
            uvs: HashMap::new(),
            colors: HashMap::new(),
            indices: HashMap::new(),
            bone_weights: HashMap::new(),
        }
    }

    fn next_id(&mut self, kind: BufferKind, len: usize) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("registered {kind} buffer {id} ({len} entries)");
        id
    }

    pub fn add_positions(&mut self, buffer: Vec<Vec3>) -> PositionBufferId {
        let id = self.next_id(PositionBufferId::KIND, buffer.len());
        self.positions.insert(id, buffer);
        PositionBufferId(id)
    }

    pub fn add_normals(&mut self, buffer: Vec<Vec3>) -> NormalBufferId {
        let id = self.next_id(NormalBufferId::KIND, buffer.len());
        self.normals.insert(id, buffer);
        NormalBufferId(id)
    }

    pub fn add_uvs(&mut self, buffer: Vec<Vec2>) -> UvBufferId {
        let id = self.next_id(UvBufferId::KIND, buffer.len());
        self.uvs.insert(id, buffer);
        UvBufferId(id)
    }

    pub fn add_colors(&mut self, buffer: Vec<Vec4>) -> ColorBufferId {
        let id = self.next_id(ColorBufferId::KIND, buffer.len());
        self.colors.insert(id, buffer);
        ColorBufferId(id)
    }

    pub fn add_indices(&mut self, buffer: Vec<[u32; 3]>) -> IndexBufferId {
        let id = self.next_id(IndexBufferId::KIND, buffer.len());
        self.indices.insert(id, buffer);
        IndexBufferId(id)
    }

    pub fn add_bone_weights(&mut self, buffer: BoneWeights) -> BoneWeightBufferId {
        let id = self.next_id(BoneWeightBufferId::KIND, buffer.len());
        self.bone_weights.insert(id, buffer);
        BoneWeightBufferId(id)
    }

    pub fn positions(&self, id: PositionBufferId) -> Option<&[Vec3]> {
        self.positions.get(&id.0).map(Vec::as_slice)
    }

    pub fn normals(&self, id: NormalBufferId) -> Option<&[Vec3]> {
        self.normals.get(&id.0).map(Vec::as_slice)
    }

    pub fn uvs(&self, id: UvBufferId) -> Option<&[Vec2]> {
        self.uvs.get(&id.0).map(Vec::as_slice)
    }

    pub fn colors(&self, id: ColorBufferId) -> Option<&[Vec4]> {
        self.colors.get(&id.0).map(Vec::as_slice)
    }

    pub fn indices(&self, id: IndexBufferId) -> Option<&[[u32; 3]]> {
        self.indices.get(&id.0).map(Vec::as_slice)
    }

    pub fn bone_weights(&self, id: BoneWeightBufferId) -> Option<&[Vec<VertexWeight>]> {
        self.bone_weights.get(&id.0).map(Vec::as_slice)
    }

    /// Total number of buffers registered so far.
    pub fn len(&self) -> usize {
        (self.next_id - 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_id == 1
    }
}

/// Looks up a buffer, turning a missing handle into [`RenderError::UnknownBuffer`].
pub(crate) fn require<T>(found: Option<T>, kind: BufferKind, id: u32) -> Result<T, RenderError> {
    found.ok_or(RenderError::UnknownBuffer { kind, id })
}
