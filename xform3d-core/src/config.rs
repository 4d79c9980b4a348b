//! Configuration system.
//!
//! Settings are read from JSON. Every field has a default, so `{}` is a valid
//! document and hosts only spell out what they change.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::camera::CameraSettings;
use crate::error::{Error, Result};
use crate::projection::Frustum;
use crate::transform::{TransformSettings, Viewport};

/// Root settings for an [`Interaction`](crate::input::Interaction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial window size in pixels.
    pub window: Viewport,
    pub transform: TransformSettings,
    pub camera: CameraSettings,
    /// Frustum for a square viewport; horizontal extents follow the window.
    pub frustum: Frustum,
    /// Eye movement per dolly key press, in world units.
    pub dolly_step: f32,
    /// Gaze yaw per look-around key press, in degrees.
    pub orbit_step_degrees: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: Viewport::default(),
            transform: TransformSettings::default(),
            camera: CameraSettings::default(),
            frustum: Frustum::default(),
            dolly_step: 0.1,
            orbit_step_degrees: 5.0,
        }
    }
}

impl Settings {
    /// Parses settings from JSON and validates them.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&text)?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.frustum.validate()?;
        let t = &self.transform;
        if !(t.scale_step.is_finite() && t.scale_step > 0.0 && t.scale_step < 1.0) {
            return Err(Error::Config(format!(
                "transform.scale_step {} must be in (0, 1)",
                t.scale_step
            )));
        }
        if !(t.translate_limit.is_finite() && t.translate_limit >= 0.0) {
            return Err(Error::Config(format!(
                "transform.translate_limit {} must be non-negative",
                t.translate_limit
            )));
        }
        let steps = [
            ("transform.rotate_step_degrees", t.rotate_step_degrees),
            ("dolly_step", self.dolly_step),
            ("orbit_step_degrees", self.orbit_step_degrees),
        ];
        for (name, value) in steps {
            if !value.is_finite() {
                return Err(Error::Config(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Pivot;
    use crate::vec3::Vec3;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.window, Viewport::new(600, 600));
    }

    #[test]
    fn test_partial_document_overrides_fields() {
        let json = r#"{
            "window": { "width": 800, "height": 600 },
            "transform": { "rotate_step_degrees": 5.0, "pivot": "origin" },
            "camera": { "eye": { "x": 0.0, "y": 1.0, "z": 5.0 } }
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.window, Viewport::new(800, 600));
        assert_eq!(settings.transform.rotate_step_degrees, 5.0);
        assert_eq!(settings.transform.scale_step, 0.02);
        assert_eq!(settings.transform.pivot, Pivot::Origin);
        assert_eq!(settings.camera.eye, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(settings.camera.up_dir, Vec3::Y);
    }

    #[test]
    fn test_invalid_documents_are_rejected() {
        assert!(matches!(Settings::from_json_str("{ not json"), Err(Error::Config(_))));
        assert!(matches!(
            Settings::from_json_str(r#"{ "transform": { "scale_step": 1.5 } }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::from_json_str(
                r#"{ "frustum": { "near": 1.0, "far": 0.5, "left": -1, "right": 1, "bottom": -1, "top": 1 } }"#
            ),
            Err(Error::InvalidFrustum(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            Settings::load("/nonexistent/xform3d/settings.json"),
            Err(Error::Io(_))
        ));
    }
}
