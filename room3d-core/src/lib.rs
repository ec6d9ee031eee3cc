//! room3d Core Library - Transform stack and procedural geometry for a furnished room
//!
//! This library builds the merged vertex/index buffers for every primitive the
//! room uses, and traverses the room with a model-matrix stack, handing
//! `(matrix, index range)` draws to any rasterizer implementing `DrawTarget`.

pub mod composite;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod registry;
pub mod scene;
pub mod stack;
pub mod state;
pub mod transform;

// Re-export commonly used types
pub use config::{RoomConfig, RoomSize};
pub use draw::{DrawCall, DrawRecorder, DrawTarget, Light, Surface, TextureFlags, TextureSlot};
pub use error::{Result, SceneError};
pub use geometry::{build_cube, build_square, Color, GeometryRecord, TexTiling};
pub use projection::Camera;
pub use registry::{register_shapes, DrawRange, RegisteredGeometry, ShapeCatalog, ShapeKind, TiltFamily};
pub use scene::{FrameStats, Scene};
pub use stack::TransformStack;
pub use state::{Axis, Command, Direction, SceneState};
pub use transform::{Mat4, Vec3, ViewAngles};
