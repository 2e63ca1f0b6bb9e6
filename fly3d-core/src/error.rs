/// Error types for the geometry and transform core
use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::TextureKind;

/// Invalid input to a matrix constructor
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TransformError {
    #[error("near and far clip planes must satisfy 0 < near < far (near = {near}, far = {far})")]
    InvalidDepthRange { near: f32, far: f32 },

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),

    #[error("vertical field of view must lie in (0, pi) radians, got {0}")]
    InvalidFieldOfView(f32),

    #[error("target coincides with position, forward direction is undefined")]
    DegenerateForward,

    #[error("up vector is parallel to the forward direction")]
    DegenerateUp,
}

/// Violation of the mesh buffer contract
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("index {index} at position {position} is out of bounds for {len} vertices")]
    IndexOutOfBounds {
        position: usize,
        index: u32,
        len: usize,
    },

    #[error("{len} entries do not form whole triangles")]
    NotTriangulated { len: usize },

    #[error("mesh has more than {max} {kind:?} textures")]
    TooManyTextures { kind: TextureKind, max: usize },
}

/// Failure while parsing model text
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed `{keyword}` directive: {text}")]
    Malformed {
        line: usize,
        keyword: &'static str,
        text: String,
    },

    #[error("line {line}: face has {corners} corners, only triangles are supported")]
    NotTriangle { line: usize, corners: usize },

    #[error("line {line}: {pool} index {index} is out of range (pool holds {len})")]
    IndexOutOfRange {
        line: usize,
        pool: &'static str,
        index: i64,
        len: usize,
    },

    #[error("could not reserve memory for model buffers: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

/// Failure while loading a model file from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
