//! xform3d Web - WASM bindings for the interactive transform core
//!
//! The page owns the WebGL context and the event listeners; it forwards DOM
//! events here and uploads the returned column-major `Float32Array`s as
//! uniforms.
use tracing::debug;
use wasm_bindgen::prelude::*;
use xform3d_core::{
    Action, CursorHint, InputEvent, Interaction, Key, Modifiers, MouseButton, Response, Settings,
    Viewport,
};

/// Result of forwarding one event.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebResponse {
    Ignored = 0,
    Updated = 1,
    Quit = 2,
}

impl From<Response> for WebResponse {
    fn from(response: Response) -> Self {
        match response {
            Response::Ignored => WebResponse::Ignored,
            Response::Updated => WebResponse::Updated,
            Response::Quit => WebResponse::Quit,
        }
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    interaction: Interaction,
}

#[wasm_bindgen]
impl WebViewer {
    /// Creates a viewer for a canvas of `width` x `height` pixels, with
    /// optional settings JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        settings_json: Option<String>,
    ) -> Result<WebViewer, JsValue> {
        let mut settings = match settings_json {
            Some(json) => Settings::from_json_str(&json).map_err(to_js)?,
            None => Settings::default(),
        };
        settings.window = Viewport::new(width, height);
        let interaction = Interaction::new(&settings).map_err(to_js)?;
        debug!(width, height, "Web viewer created");
        Ok(WebViewer { interaction })
    }

    /// Forwards a DOM keyboard event. `key` is `KeyboardEvent.key`, `action`
    /// is `"press"`, `"repeat"` or `"release"`, and `mods` packs
    /// shift/ctrl/alt/meta as bits 0-3.
    #[wasm_bindgen(js_name = keyEvent)]
    pub fn key_event(&mut self, key: &str, action: &str, mods: u8) -> Result<WebResponse, JsValue> {
        let Some(action) = action_from_str(action) else {
            return Ok(WebResponse::Ignored);
        };
        self.forward(InputEvent::Key {
            key: key_from_dom(key),
            action,
            mods: Modifiers::from_bits_truncate(mods),
        })
    }

    /// Forwards a DOM mouse button event; `button` is `MouseEvent.button`
    /// and `x`/`y` the event's canvas position. The position is applied
    /// first so a drag measures from where the button went down.
    #[wasm_bindgen(js_name = mouseButton)]
    pub fn mouse_button(
        &mut self,
        button: i16,
        action: &str,
        mods: u8,
        x: f64,
        y: f64,
    ) -> Result<WebResponse, JsValue> {
        let Some(action) = action_from_str(action) else {
            return Ok(WebResponse::Ignored);
        };
        self.forward(InputEvent::CursorMove { x, y })?;
        self.forward(InputEvent::MouseButton {
            button: button_from_dom(button),
            action,
            mods: Modifiers::from_bits_truncate(mods),
        })
    }

    #[wasm_bindgen(js_name = cursorMove)]
    pub fn cursor_move(&mut self, x: f64, y: f64) -> Result<WebResponse, JsValue> {
        self.forward(InputEvent::CursorMove { x, y })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<WebResponse, JsValue> {
        self.forward(InputEvent::Resize { width, height })
    }

    #[wasm_bindgen(js_name = modelMatrix)]
    pub fn model_matrix(&self) -> Vec<f32> {
        self.interaction.model_column_major().to_vec()
    }

    #[wasm_bindgen(js_name = viewMatrix)]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.interaction.view_column_major().to_vec()
    }

    #[wasm_bindgen(js_name = projectionMatrix)]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.interaction.projection_column_major().to_vec()
    }

    /// CSS cursor for the canvas.
    #[wasm_bindgen(js_name = cursorStyle)]
    pub fn cursor_style(&self) -> String {
        css_cursor(self.interaction.cursor_hint()).to_string()
    }

    fn forward(&mut self, event: InputEvent) -> Result<WebResponse, JsValue> {
        self.interaction.handle(event).map(WebResponse::from).map_err(to_js)
    }
}

fn to_js(err: xform3d_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn action_from_str(action: &str) -> Option<Action> {
    match action {
        "press" => Some(Action::Press),
        "repeat" => Some(Action::Repeat),
        "release" => Some(Action::Release),
        _ => None,
    }
}

fn key_from_dom(key: &str) -> Key {
    match key {
        "ArrowLeft" => Key::Left,
        "ArrowRight" => Key::Right,
        "ArrowUp" => Key::Up,
        "ArrowDown" => Key::Down,
        "Escape" => Key::Escape,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => Key::Other,
            }
        }
    }
}

fn button_from_dom(button: i16) -> MouseButton {
    match button {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Other,
    }
}

fn css_cursor(hint: CursorHint) -> &'static str {
    match hint {
        CursorHint::Arrow => "default",
        CursorHint::Hand => "grabbing",
    }
}
