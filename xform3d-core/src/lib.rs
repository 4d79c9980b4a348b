//! xform3d Core Library - affine transforms and interactive camera state
//!
//! This library provides the window-independent core of the viewer: the
//! `Vec3`/`Mat4` primitives, the model transform state machine, the camera
//! controller and the input event routing. Hosts feed decoded events in and
//! read back column-major matrices for upload.

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod mat4;
pub mod projection;
pub mod transform;
pub mod vec3;

// Re-export commonly used types
pub use camera::{CameraController, CameraSettings};
pub use config::Settings;
pub use error::{Error, Result};
pub use input::{
    Action, CursorHint, DragMode, InputEvent, Interaction, Key, Modifiers, MouseButton, Response,
};
pub use mat4::{Axis, Init, Mat4};
pub use projection::Frustum;
pub use transform::{Pivot, Spin, TransformCommand, TransformSettings, TransformState, Viewport};
pub use vec3::Vec3;
