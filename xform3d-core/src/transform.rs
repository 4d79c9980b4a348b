//! Interactive model matrix driven by transform commands
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::mat4::{Axis, Mat4};
use crate::vec3::Vec3;

/// Rotation sense as seen by a viewer looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// Direction for a horizontal cursor delta; `None` when there was no
    /// horizontal motion.
    pub fn from_cursor_dx(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Spin::Clockwise)
        } else if dx < 0.0 {
            Some(Spin::CounterClockwise)
        } else {
            None
        }
    }

    fn sign(self) -> f32 {
        match self {
            Spin::Clockwise => -1.0,
            Spin::CounterClockwise => 1.0,
        }
    }
}

/// Composition policy for drag rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    /// `T(c) * R * T(-c) * M` with `c` the current translation of `M`: the
    /// object spins in place.
    #[default]
    ObjectCenter,
    /// `R * M`: the object swings around the world origin.
    Origin,
}

/// Window size in pixels, used to map cursor deltas to clip units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600, 600)
    }
}

/// A single update of the model matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformCommand {
    Reset,
    /// Scale by `factor` along `axis`, composed in world space.
    ScaleAxis { axis: Axis, factor: f32 },
    /// Rotate by the configured small angle about Z.
    RotateAboutPivot { direction: Spin, pivot: Pivot },
    /// Translate by a cursor delta in pixels, then clamp x/y translation.
    TranslateByCursor { dx: f64, dy: f64, viewport: Viewport },
}

/// Step sizes and bounds for model updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Relative scale change per key press (`1 ± scale_step`).
    pub scale_step: f32,
    /// Rotation per drag event, in degrees.
    pub rotate_step_degrees: f32,
    /// Bound on |x| and |y| of the model translation.
    pub translate_limit: f32,
    pub pivot: Pivot,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            scale_step: 0.02,
            rotate_step_degrees: 2.0,
            translate_limit: 1.0,
            pivot: Pivot::ObjectCenter,
        }
    }
}

/// The model matrix and the rules that update it.
#[derive(Debug, Clone)]
pub struct TransformState {
    model: Mat4,
    settings: TransformSettings,
}

impl TransformState {
    pub fn new(settings: TransformSettings) -> Self {
        Self {
            model: Mat4::IDENTITY,
            settings,
        }
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    pub fn column_major(&self) -> [f32; 16] {
        self.model.dump_column_wise()
    }

    pub fn reset(&mut self) {
        self.model = Mat4::IDENTITY;
    }

    pub fn apply(&mut self, command: TransformCommand) {
        trace!(?command, "transform::apply");
        match command {
            TransformCommand::Reset => self.reset(),
            TransformCommand::ScaleAxis { axis, factor } => {
                let scale = match axis {
                    Axis::X => Mat4::scale(factor, 1.0, 1.0),
                    Axis::Y => Mat4::scale(1.0, factor, 1.0),
                    Axis::Z => Mat4::scale(1.0, 1.0, factor),
                };
                self.model = scale.multiply(&self.model);
            }
            TransformCommand::RotateAboutPivot { direction, pivot } => {
                let rotation =
                    Mat4::rotation(direction.sign() * self.settings.rotate_step_degrees, Axis::Z);
                self.model = match pivot {
                    Pivot::ObjectCenter => {
                        let center = self.model.translation_vec3();
                        Mat4::translation(center)
                            .multiply(&rotation)
                            .multiply(&Mat4::translation(-center))
                            .multiply(&self.model)
                    }
                    Pivot::Origin => rotation.multiply(&self.model),
                };
            }
            TransformCommand::TranslateByCursor { dx, dy, viewport } => {
                if viewport.is_empty() {
                    return;
                }
                // No step longer than `reach` can land anywhere but the
                // clamp, and bounding it in f64 keeps the f32 offset finite.
                let current = self.model.translation_vec3();
                let reach = f64::from(self.settings.translate_limit)
                    + f64::from(current.x.abs().max(current.y.abs()));
                let to_clip = |delta: f64, extent: u32| {
                    (delta * 2.0 / f64::from(extent)).clamp(-reach, reach)
                };
                let (x, y) = (to_clip(dx, viewport.width), to_clip(-dy, viewport.height));
                if x.is_nan() || y.is_nan() {
                    warn!(dx, dy, "Ignoring non-finite cursor translation");
                    return;
                }
                let offset = Vec3::new(x as f32, y as f32, 0.0);
                self.model = Mat4::translation(offset).multiply(&self.model);
                self.clamp_translation();
            }
        }
    }

    fn clamp_translation(&mut self) {
        let limit = self.settings.translate_limit;
        let (x, y, _) = self.model.translation_mut();
        *x = x.clamp(-limit, limit);
        *y = y.clamp(-limit, limit);
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(TransformSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rotate(state: &mut TransformState, direction: Spin, pivot: Pivot) {
        state.apply(TransformCommand::RotateAboutPivot { direction, pivot });
    }

    #[test]
    fn test_starts_at_identity_and_resets() {
        let mut state = TransformState::default();
        assert_eq!(*state.model(), Mat4::IDENTITY);
        state.apply(TransformCommand::ScaleAxis { axis: Axis::X, factor: 3.0 });
        state.apply(TransformCommand::Reset);
        assert_eq!(*state.model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_scale_composes_in_world_space() {
        let mut state = TransformState::default();
        state.apply(TransformCommand::TranslateByCursor {
            dx: 150.0,
            dy: 0.0,
            viewport: Viewport::new(600, 600),
        });
        state.apply(TransformCommand::ScaleAxis { axis: Axis::X, factor: 2.0 });
        // World-space scaling also scales the existing translation.
        assert_abs_diff_eq!(
            state.model().translation_vec3(),
            Vec3::new(1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
        state.apply(TransformCommand::ScaleAxis { axis: Axis::Y, factor: 0.5 });
        let rows = state.model().to_rows();
        assert_eq!(rows[0][0], 2.0);
        assert_eq!(rows[1][1], 0.5);
        assert_eq!(rows[2][2], 1.0);
    }

    #[test]
    fn test_translate_by_cursor_clamps_to_limit() {
        let mut state = TransformState::default();
        let viewport = Viewport::new(600, 600);
        for _ in 0..5 {
            state.apply(TransformCommand::TranslateByCursor { dx: 1000.0, dy: 0.0, viewport });
            assert_eq!(state.model().translation_vec3().x, 1.0);
        }
        state.apply(TransformCommand::TranslateByCursor { dx: -300.0, dy: 0.0, viewport });
        assert_abs_diff_eq!(state.model().translation_vec3().x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translate_by_cursor_flips_y() {
        let mut state = TransformState::default();
        state.apply(TransformCommand::TranslateByCursor {
            dx: 0.0,
            dy: 100.0,
            viewport: Viewport::new(800, 400),
        });
        assert_abs_diff_eq!(
            state.model().translation_vec3(),
            Vec3::new(0.0, -0.5, 0.0),
            epsilon = 1e-6
        );
        state.apply(TransformCommand::TranslateByCursor {
            dx: 0.0,
            dy: -10_000.0,
            viewport: Viewport::new(800, 400),
        });
        assert_eq!(state.model().translation_vec3().y, 1.0);
    }

    #[test]
    fn test_huge_cursor_delta_pins_to_limit_without_nan() {
        let mut state = TransformState::default();
        let viewport = Viewport::new(600, 600);
        state.apply(TransformCommand::TranslateByCursor { dx: 1e300, dy: 0.0, viewport });
        let rows = state.model().to_rows();
        assert!(rows.iter().flatten().all(|value| value.is_finite()));
        assert_eq!(rows[0][0], 1.0);
        assert_eq!(state.model().translation_vec3(), Vec3::new(1.0, 0.0, 0.0));

        state.apply(TransformCommand::TranslateByCursor { dx: -1e300, dy: 1e300, viewport });
        assert_eq!(state.model().translation_vec3(), Vec3::new(-1.0, -1.0, 0.0));

        state.apply(TransformCommand::TranslateByCursor { dx: f64::NAN, dy: 0.0, viewport });
        assert_eq!(state.model().translation_vec3(), Vec3::new(-1.0, -1.0, 0.0));
    }

    #[test]
    fn test_translate_with_empty_viewport_is_noop() {
        let mut state = TransformState::default();
        state.apply(TransformCommand::TranslateByCursor {
            dx: 10.0,
            dy: 10.0,
            viewport: Viewport::new(0, 600),
        });
        assert_eq!(*state.model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_object_center_pivot_keeps_translation() {
        let mut state = TransformState::default();
        state.apply(TransformCommand::TranslateByCursor {
            dx: 150.0,
            dy: -150.0,
            viewport: Viewport::new(600, 600),
        });
        let center = state.model().translation_vec3();
        for _ in 0..10 {
            rotate(&mut state, Spin::Clockwise, Pivot::ObjectCenter);
        }
        assert_abs_diff_eq!(state.model().translation_vec3(), center, epsilon = 1e-5);
        let x_axis = state.model().transform_vector(Vec3::X);
        assert_abs_diff_eq!(
            x_axis,
            Mat4::rotation(-20.0, Axis::Z).transform_vector(Vec3::X),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_origin_pivot_swings_translation() {
        let mut state = TransformState::default();
        state.apply(TransformCommand::TranslateByCursor {
            dx: 150.0,
            dy: 0.0,
            viewport: Viewport::new(600, 600),
        });
        for _ in 0..45 {
            rotate(&mut state, Spin::CounterClockwise, Pivot::Origin);
        }
        assert_abs_diff_eq!(
            state.model().translation_vec3(),
            Vec3::new(0.0, 0.5, 0.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_clockwise_then_counter_clockwise_cancels() {
        let mut state = TransformState::default();
        rotate(&mut state, Spin::Clockwise, Pivot::ObjectCenter);
        rotate(&mut state, Spin::CounterClockwise, Pivot::ObjectCenter);
        assert_abs_diff_eq!(*state.model(), Mat4::IDENTITY, epsilon = 1e-6);
    }

    #[test]
    fn test_spin_from_cursor_dx() {
        assert_eq!(Spin::from_cursor_dx(3.0), Some(Spin::Clockwise));
        assert_eq!(Spin::from_cursor_dx(-0.5), Some(Spin::CounterClockwise));
        assert_eq!(Spin::from_cursor_dx(0.0), None);
    }
}
