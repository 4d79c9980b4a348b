//! Perspective frustum parameters and the projection matrix built from them
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mat4::Mat4;

/// Off-center perspective frustum in eye space.
///
/// `left`/`right`/`bottom`/`top` are the extents of the near plane. Values
/// coming from configuration must go through [`Frustum::validate`] before a
/// matrix is built from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Frustum {
    pub fn new(near: f32, far: f32, left: f32, right: f32, bottom: f32, top: f32) -> Result<Self> {
        let frustum = Self {
            near,
            far,
            left,
            right,
            bottom,
            top,
        };
        frustum.validate()?;
        Ok(frustum)
    }

    /// Symmetric frustum from a vertical field of view in degrees.
    pub fn symmetric(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        if !(fovy_degrees > 0.0 && fovy_degrees < 180.0) {
            return Err(Error::InvalidFrustum(format!(
                "field of view {fovy_degrees} must be in (0, 180) degrees"
            )));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(Error::InvalidFrustum(format!("aspect ratio {aspect} must be positive")));
        }
        let top = near * (fovy_degrees.to_radians() / 2.0).tan();
        let right = top * aspect;
        Self::new(near, far, -right, right, -top, top)
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.near, self.far, self.left, self.right, self.bottom, self.top];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidFrustum("parameters must be finite".to_string()));
        }
        if self.near <= 0.0 {
            return Err(Error::InvalidFrustum(format!("near plane {} must be positive", self.near)));
        }
        if self.far <= self.near {
            return Err(Error::InvalidFrustum(format!(
                "far plane {} must lie beyond near plane {}",
                self.far, self.near
            )));
        }
        if self.right == self.left {
            return Err(Error::InvalidFrustum("left and right extents coincide".to_string()));
        }
        if self.top == self.bottom {
            return Err(Error::InvalidFrustum("bottom and top extents coincide".to_string()));
        }
        Ok(())
    }

    /// Width over height of the near plane.
    pub fn aspect(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }

    /// Rescales the horizontal extents to `aspect`, keeping the vertical
    /// extents, the horizontal center and the depth range.
    pub fn with_aspect(&self, aspect: f32) -> Result<Self> {
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(Error::InvalidFrustum(format!("aspect ratio {aspect} must be positive")));
        }
        let center = (self.left + self.right) / 2.0;
        let half_width = (self.top - self.bottom) * aspect / 2.0;
        Self::new(
            self.near,
            self.far,
            center - half_width,
            center + half_width,
            self.bottom,
            self.top,
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective(self.near, self.far, self.left, self.right, self.bottom, self.top)
    }
}

impl Default for Frustum {
    /// 60 degree vertical field of view, square aspect, depth 0.1..100.
    fn default() -> Self {
        let top = 0.1 * 30.0_f32.to_radians().tan();
        Self {
            near: 0.1,
            far: 100.0,
            left: -top,
            right: top,
            bottom: -top,
            top,
        }
    }
}
