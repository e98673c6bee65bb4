//! Error types for asset loading and draw-call validation.

use std::fmt;

/// Which attribute buffer an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Position,
    Normal,
    Uv,
    Color,
    Index,
    BoneWeight,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Position => write!(f, "position"),
            BufferKind::Normal => write!(f, "normal"),
            BufferKind::Uv => write!(f, "uv"),
            BufferKind::Color => write!(f, "color"),
            BufferKind::Index => write!(f, "index"),
            BufferKind::BoneWeight => write!(f, "bone-weight"),
        }
    }
}

/// Error type for model, texture and config loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Obj(tobj::LoadError),
    Image(image::ImageError),
    Config(ron::error::SpannedError),
    /// The file parsed but lacks something the renderer needs.
    MissingData(String),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Image(e)
    }
}

impl From<ron::error::SpannedError> for LoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        LoadError::Config(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {e}"),
            LoadError::Obj(e) => write!(f, "OBJ error: {e}"),
            LoadError::Image(e) => write!(f, "image error: {e}"),
            LoadError::Config(e) => write!(f, "config error: {e}"),
            LoadError::MissingData(what) => write!(f, "missing data: {what}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Obj(e) => Some(e),
            LoadError::Image(e) => Some(e),
            LoadError::Config(e) => Some(e),
            LoadError::MissingData(_) => None,
        }
    }
}

/// A draw call whose buffers break the per-mesh invariants.
///
/// Validation runs before any pixel is touched, so a failed draw leaves the
/// render target and depth buffer unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A handle that was never returned by the buffer store.
    UnknownBuffer { kind: BufferKind, id: u32 },
    /// A per-vertex buffer whose length differs from the position buffer.
    BufferLengthMismatch {
        kind: BufferKind,
        expected: usize,
        actual: usize,
    },
    /// An index triple that points past the end of the vertex buffers.
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        len: usize,
    },
    /// A bone weight that names a bone the draw call has no transform for.
    BoneOutOfRange {
        vertex: usize,
        bone: usize,
        bones: usize,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownBuffer { kind, id } => {
                write!(f, "unknown {kind} buffer handle {id}")
            }
            RenderError::BufferLengthMismatch {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "{kind} buffer has {actual} entries, expected {expected}"
            ),
            RenderError::IndexOutOfRange {
                triangle,
                index,
                len,
            } => write!(
                f,
                "triangle {triangle} references vertex {index} but only {len} exist"
            ),
            RenderError::BoneOutOfRange {
                vertex,
                bone,
                bones,
            } => write!(
                f,
                "vertex {vertex} is weighted to bone {bone} but only {bones} transforms were supplied"
            ),
        }
    }
}

impl std::error::Error for RenderError {}
