/// Fly3D Core Library - Shared geometry and transformation logic
///
/// This library provides the stateless core for first-person 3D rendering:
/// vector and matrix math, a yaw/pitch camera, mesh buffers and a loader for
/// triangle models written in OBJ text.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod projection;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::{Camera, CameraSettings, Movement};
pub use error::{LoadError, MeshError, ParseError, TransformError};
pub use geometry::{Mesh, TextureKind, TextureRef, TextureSlot, Triangle, Vertex};
pub use obj::{IndexBase, ObjOptions};
pub use projection::Perspective;
pub use transform::{RotationState, Transform};
