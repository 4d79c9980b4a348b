//! Decoded input events and the drag/key state machine that routes them to
//! the model transform and the camera.
//!
//! Hosts translate their windowing library's events into [`InputEvent`]s and
//! feed them, in arrival order, to [`Interaction::handle`]. Matrices are read
//! back once per frame through the `*_column_major` accessors.

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::camera::CameraController;
use crate::config::Settings;
use crate::error::Result;
use crate::mat4::Axis;
use crate::transform::{Spin, TransformCommand, TransformState, Viewport};

bitflags! {
    /// Modifier keys held during a key or button event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        const SUPER = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, action: Action, mods: Modifiers },
    MouseButton { button: MouseButton, action: Action, mods: Modifiers },
    CursorMove { x: f64, y: f64 },
    Resize { width: u32, height: u32 },
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Nothing changed.
    Ignored,
    /// A matrix changed and the frame should be redrawn.
    Updated,
    /// The user asked to quit.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    Rotate,
    Translate,
}

/// Cursor shape a host may show for the current drag mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Arrow,
    Hand,
}

/// Owned interaction state: model transform, camera, drag mode and viewport.
#[derive(Debug, Clone)]
pub struct Interaction {
    transform: TransformState,
    camera: CameraController,
    drag: DragMode,
    cursor: (f64, f64),
    viewport: Viewport,
    dolly_step: f32,
    orbit_step_degrees: f32,
}

impl Interaction {
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let mut camera = CameraController::new(settings.camera, settings.frustum)?;
        camera.resize(settings.window.width, settings.window.height)?;
        Ok(Self {
            transform: TransformState::new(settings.transform),
            camera,
            drag: DragMode::Idle,
            cursor: (0.0, 0.0),
            viewport: settings.window,
            dolly_step: settings.dolly_step,
            orbit_step_degrees: settings.orbit_step_degrees,
        })
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn cursor_hint(&self) -> CursorHint {
        match self.drag {
            DragMode::Idle => CursorHint::Arrow,
            DragMode::Rotate | DragMode::Translate => CursorHint::Hand,
        }
    }

    pub fn model_column_major(&self) -> [f32; 16] {
        self.transform.column_major()
    }

    pub fn view_column_major(&self) -> [f32; 16] {
        self.camera.view_column_major()
    }

    pub fn projection_column_major(&self) -> [f32; 16] {
        self.camera.projection_column_major()
    }

    /// Applies one event. Errors come from camera updates that were
    /// rejected; the previous camera state is kept in that case.
    pub fn handle(&mut self, event: InputEvent) -> Result<Response> {
        match event {
            InputEvent::Key { key, action, .. } => self.on_key(key, action),
            InputEvent::MouseButton { button, action, mods } => {
                Ok(self.on_mouse_button(button, action, mods))
            }
            InputEvent::CursorMove { x, y } => Ok(self.on_cursor_move(x, y)),
            InputEvent::Resize { width, height } => self.on_resize(width, height),
        }
    }

    fn on_key(&mut self, key: Key, action: Action) -> Result<Response> {
        if action == Action::Release {
            return Ok(Response::Ignored);
        }
        // Shift and caps lock deliver upper case letters
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        let step = self.transform.settings().scale_step;
        match key {
            Key::Escape | Key::Char('q') => return Ok(Response::Quit),
            Key::Right => self.scale(Axis::X, 1.0 + step),
            Key::Left => self.scale(Axis::X, 1.0 - step),
            Key::Up => self.scale(Axis::Y, 1.0 + step),
            Key::Down => self.scale(Axis::Y, 1.0 - step),
            Key::Char('r') => self.transform.apply(TransformCommand::Reset),
            Key::Char('w') => self.camera.dolly(self.dolly_step)?,
            Key::Char('s') => self.camera.dolly(-self.dolly_step)?,
            Key::Char('a') => self.camera.orbit(self.orbit_step_degrees)?,
            Key::Char('d') => self.camera.orbit(-self.orbit_step_degrees)?,
            _ => return Ok(Response::Ignored),
        }
        Ok(Response::Updated)
    }

    fn scale(&mut self, axis: Axis, factor: f32) {
        self.transform.apply(TransformCommand::ScaleAxis { axis, factor });
    }

    fn on_mouse_button(
        &mut self,
        button: MouseButton,
        action: Action,
        mods: Modifiers,
    ) -> Response {
        if button != MouseButton::Left {
            return Response::Ignored;
        }
        match action {
            Action::Press => {
                self.drag = if mods.is_empty() {
                    DragMode::Rotate
                } else {
                    DragMode::Translate
                };
                debug!(mode = ?self.drag, x = self.cursor.0, y = self.cursor.1, "Drag started");
                Response::Ignored
            }
            Action::Release => {
                if self.drag != DragMode::Idle {
                    debug!(mode = ?self.drag, "Drag ended");
                }
                self.drag = DragMode::Idle;
                Response::Ignored
            }
            Action::Repeat => Response::Ignored,
        }
    }

    fn on_cursor_move(&mut self, x: f64, y: f64) -> Response {
        let (dx, dy) = (x - self.cursor.0, y - self.cursor.1);
        self.cursor = (x, y);
        let command = match self.drag {
            DragMode::Idle => return Response::Ignored,
            DragMode::Rotate => match Spin::from_cursor_dx(dx) {
                Some(direction) => TransformCommand::RotateAboutPivot {
                    direction,
                    pivot: self.transform.settings().pivot,
                },
                None => return Response::Ignored,
            },
            DragMode::Translate => TransformCommand::TranslateByCursor {
                dx,
                dy,
                viewport: self.viewport,
            },
        };
        trace!(dx, dy, "Drag motion");
        self.transform.apply(command);
        Response::Updated
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<Response> {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            debug!(width, height, "Ignoring resize to empty viewport");
            return Ok(Response::Ignored);
        }
        self.camera.resize(width, height)?;
        self.viewport = viewport;
        Ok(Response::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat4::Mat4;
    use approx::assert_abs_diff_eq;

    fn interaction() -> Interaction {
        Interaction::new(&Settings::default()).unwrap()
    }

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, action: Action::Press, mods: Modifiers::empty() }
    }

    fn button(action: Action, mods: Modifiers) -> InputEvent {
        InputEvent::MouseButton { button: MouseButton::Left, action, mods }
    }

    #[test]
    fn test_quit_keys() {
        let mut ui = interaction();
        assert_eq!(ui.handle(press(Key::Escape)).unwrap(), Response::Quit);
        assert_eq!(ui.handle(press(Key::Char('q'))).unwrap(), Response::Quit);
        assert_eq!(ui.handle(press(Key::Char('Q'))).unwrap(), Response::Quit);
    }

    #[test]
    fn test_arrow_keys_scale_and_release_is_ignored() {
        let mut ui = interaction();
        assert_eq!(ui.handle(press(Key::Right)).unwrap(), Response::Updated);
        let release = InputEvent::Key {
            key: Key::Right,
            action: Action::Release,
            mods: Modifiers::empty(),
        };
        assert_eq!(ui.handle(release).unwrap(), Response::Ignored);
        assert_abs_diff_eq!(ui.transform().model().to_rows()[0][0], 1.02);

        ui.handle(press(Key::Down)).unwrap();
        assert_abs_diff_eq!(ui.transform().model().to_rows()[1][1], 0.98);

        ui.handle(press(Key::Char('r'))).unwrap();
        assert_eq!(*ui.transform().model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_letter_bindings_ignore_case() {
        let mut ui = interaction();
        let eye = ui.camera().eye();
        assert_eq!(ui.handle(press(Key::Char('W'))).unwrap(), Response::Updated);
        assert!(ui.camera().eye().z < eye.z);
        ui.handle(press(Key::Char('S'))).unwrap();
        assert_abs_diff_eq!(ui.camera().eye(), eye, epsilon = 1e-6);

        ui.handle(press(Key::Right)).unwrap();
        assert_eq!(ui.handle(press(Key::Char('R'))).unwrap(), Response::Updated);
        assert_eq!(*ui.transform().model(), Mat4::IDENTITY);
        assert_eq!(ui.handle(press(Key::Char('Z'))).unwrap(), Response::Ignored);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut ui = interaction();
        assert_eq!(
            ui.handle(InputEvent::CursorMove { x: 500.0, y: 10.0 }).unwrap(),
            Response::Ignored
        );
        assert_eq!(*ui.transform().model(), Mat4::IDENTITY);
        assert_eq!(ui.drag_mode(), DragMode::Idle);
    }

    #[test]
    fn test_plain_press_rotates_and_modifier_press_translates() {
        let mut ui = interaction();
        ui.handle(button(Action::Press, Modifiers::empty())).unwrap();
        assert_eq!(ui.drag_mode(), DragMode::Rotate);
        assert_eq!(ui.cursor_hint(), CursorHint::Hand);
        ui.handle(button(Action::Release, Modifiers::empty())).unwrap();
        assert_eq!(ui.drag_mode(), DragMode::Idle);
        assert_eq!(ui.cursor_hint(), CursorHint::Arrow);

        ui.handle(button(Action::Press, Modifiers::ALT)).unwrap();
        assert_eq!(ui.drag_mode(), DragMode::Translate);
    }

    #[test]
    fn test_other_buttons_do_not_start_drags() {
        let mut ui = interaction();
        let right = InputEvent::MouseButton {
            button: MouseButton::Right,
            action: Action::Press,
            mods: Modifiers::empty(),
        };
        assert_eq!(ui.handle(right).unwrap(), Response::Ignored);
        assert_eq!(ui.drag_mode(), DragMode::Idle);
    }

    #[test]
    fn test_vertical_motion_does_not_rotate() {
        let mut ui = interaction();
        ui.handle(InputEvent::CursorMove { x: 100.0, y: 100.0 }).unwrap();
        ui.handle(button(Action::Press, Modifiers::empty())).unwrap();
        let response = ui.handle(InputEvent::CursorMove { x: 100.0, y: 150.0 }).unwrap();
        assert_eq!(response, Response::Ignored);
        assert_eq!(*ui.transform().model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_resize_updates_viewport_and_projection() {
        let mut ui = interaction();
        let before = ui.projection_column_major();
        assert_eq!(
            ui.handle(InputEvent::Resize { width: 1200, height: 600 }).unwrap(),
            Response::Updated
        );
        assert_eq!(ui.viewport(), Viewport::new(1200, 600));
        assert_ne!(ui.projection_column_major(), before);
        assert_eq!(
            ui.handle(InputEvent::Resize { width: 0, height: 0 }).unwrap(),
            Response::Ignored
        );
        assert_eq!(ui.viewport(), Viewport::new(1200, 600));
    }

    #[test]
    fn test_camera_keys() {
        let mut ui = interaction();
        let eye = ui.camera().eye();
        ui.handle(press(Key::Char('w'))).unwrap();
        assert!(ui.camera().eye().z < eye.z);
        ui.handle(press(Key::Char('a'))).unwrap();
        assert_eq!(ui.camera().eye(), eye + crate::Vec3::new(0.0, 0.0, -0.1));
        assert!(ui.camera().view_dir().x < 0.0);
    }
}
