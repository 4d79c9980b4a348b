//! Interactive camera: eye, gaze and up vectors plus the cached view and
//! projection matrices derived from them.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::mat4::{Axis, Mat4};
use crate::projection::Frustum;
use crate::vec3::{Vec3, UNIT_EPSILON};

/// Initial camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: Vec3,
    /// Gaze direction; normalized on use.
    pub view_dir: Vec3,
    pub up_dir: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            view_dir: Vec3::new(0.0, 0.0, -1.0),
            up_dir: Vec3::Y,
        }
    }
}

/// Camera controller with look-around yaw and dolly navigation.
///
/// `eye`, `view_dir` and `up_dir` are the source of truth; the view and
/// projection matrices are caches rebuilt synchronously on every change.
/// A change that would produce a degenerate basis is rejected and the
/// previous state is kept.
#[derive(Debug, Clone)]
pub struct CameraController {
    eye: Vec3,
    view_dir: Vec3,
    up_dir: Vec3,
    base_frustum: Frustum,
    frustum: Frustum,
    view: Mat4,
    projection: Mat4,
}

impl CameraController {
    pub fn new(settings: CameraSettings, frustum: Frustum) -> Result<Self> {
        frustum.validate()?;
        let view = view_matrix(settings.eye, settings.view_dir, settings.up_dir)?;
        debug!(eye = %settings.eye, view_dir = %settings.view_dir, "Camera created");
        Ok(Self {
            eye: settings.eye,
            view_dir: settings.view_dir,
            up_dir: settings.up_dir,
            base_frustum: frustum,
            frustum,
            view,
            projection: frustum.matrix(),
        })
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn view_dir(&self) -> Vec3 {
        self.view_dir
    }

    pub fn up_dir(&self) -> Vec3 {
        self.up_dir
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view_column_major(&self) -> [f32; 16] {
        self.view.dump_column_wise()
    }

    pub fn projection_column_major(&self) -> [f32; 16] {
        self.projection.dump_column_wise()
    }

    /// Moves the eye `step` units along the gaze (negative steps back off).
    pub fn dolly(&mut self, step: f32) -> Result<()> {
        let eye = self.eye + self.view_dir.unit() * step;
        trace!(step, eye = %eye, "camera::dolly");
        self.commit(eye, self.view_dir)
    }

    /// Turns the gaze about the world Y axis by `angle_degrees`.
    ///
    /// The eye stays where it is, so this is a look-around yaw rather than
    /// an orbit of the eye around a target.
    pub fn orbit(&mut self, angle_degrees: f32) -> Result<()> {
        let view_dir = Mat4::rotation(angle_degrees, Axis::Y).transform_vector(self.view_dir);
        trace!(angle_degrees, view_dir = %view_dir, "camera::orbit");
        self.commit(self.eye, view_dir)
    }

    pub fn set_view_direction(&mut self, view_dir: Vec3) -> Result<()> {
        self.commit(self.eye, view_dir)
    }

    /// Points the gaze from the current eye at `target`.
    pub fn look_at(&mut self, target: Vec3) -> Result<()> {
        self.commit(self.eye, target - self.eye)
    }

    /// Rebuilds the projection for a new viewport size.
    ///
    /// Vertical extents and depth range of the initial frustum are kept and
    /// the horizontal extents follow the aspect ratio. A zero-sized viewport
    /// (minimized window) is ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            debug!(width, height, "Ignoring resize to empty viewport");
            return Ok(());
        }
        let frustum = self.base_frustum.with_aspect(width as f32 / height as f32)?;
        self.frustum = frustum;
        self.projection = frustum.matrix();
        debug!(width, height, aspect = frustum.aspect(), "Projection rebuilt");
        Ok(())
    }

    fn commit(&mut self, eye: Vec3, view_dir: Vec3) -> Result<()> {
        match view_matrix(eye, view_dir, self.up_dir) {
            Ok(view) => {
                self.eye = eye;
                self.view_dir = view_dir;
                self.view = view;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, view_dir = %view_dir, "Camera update rejected");
                Err(err)
            }
        }
    }
}

/// Builds a view matrix from the right/up/back basis of a camera.
///
/// `n = -unit(view_dir)`, `u = unit(unit(up_dir) × n)`, `v = n × u` and
/// `d = (-eye·u, -eye·v, -eye·n)`.
pub fn view_matrix(eye: Vec3, view_dir: Vec3, up_dir: Vec3) -> Result<Mat4> {
    let n = -view_dir.unit();
    let right = up_dir.unit().cross(n);
    if right.norm() < UNIT_EPSILON {
        return Err(Error::DegenerateBasis);
    }
    let u = right.unit();
    let v = n.cross(u);
    let d = Vec3::new(-eye.dot(u), -eye.dot(v), -eye.dot(n));
    Ok(Mat4::view_from_basis(u, v, n, d))
}
