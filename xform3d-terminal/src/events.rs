//! Translation of crossterm events into core input events.
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as TermButton, MouseEvent,
    MouseEventKind,
};
use xform3d_core::{Action, InputEvent, Key, Modifiers, MouseButton};

/// Maps one terminal event to zero or more core events.
///
/// Mouse button events carry a position in crossterm, so a cursor move is
/// emitted first to keep the drag reference point current.
pub fn translate(event: &Event) -> Vec<InputEvent> {
    match event {
        Event::Key(key) => vec![translate_key(key)],
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(width, height) => vec![InputEvent::Resize {
            width: u32::from(*width),
            height: u32::from(*height),
        }],
        _ => Vec::new(),
    }
}

fn translate_key(event: &KeyEvent) -> InputEvent {
    let key = match event.code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    };
    let action = match event.kind {
        KeyEventKind::Press => Action::Press,
        KeyEventKind::Repeat => Action::Repeat,
        KeyEventKind::Release => Action::Release,
    };
    InputEvent::Key {
        key,
        action,
        mods: modifiers(event.modifiers),
    }
}

fn translate_mouse(event: &MouseEvent) -> Vec<InputEvent> {
    let cursor = InputEvent::CursorMove {
        x: f64::from(event.column),
        y: f64::from(event.row),
    };
    let mods = modifiers(event.modifiers);
    match event.kind {
        MouseEventKind::Down(button) => vec![
            cursor,
            InputEvent::MouseButton {
                button: mouse_button(button),
                action: Action::Press,
                mods,
            },
        ],
        MouseEventKind::Up(button) => vec![
            cursor,
            InputEvent::MouseButton {
                button: mouse_button(button),
                action: Action::Release,
                mods,
            },
        ],
        MouseEventKind::Drag(_) | MouseEventKind::Moved => vec![cursor],
        _ => Vec::new(),
    }
}

fn mouse_button(button: TermButton) -> MouseButton {
    match button {
        TermButton::Left => MouseButton::Left,
        TermButton::Right => MouseButton::Right,
        TermButton::Middle => MouseButton::Middle,
    }
}

fn modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out.set(Modifiers::CONTROL, mods.contains(KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(Modifiers::SUPER, mods.contains(KeyModifiers::SUPER));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, modifiers: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 12,
            row: 7,
            modifiers,
        })
    }

    #[test]
    fn test_arrow_key_press() {
        let event = Event::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(
            translate(&event),
            vec![InputEvent::Key {
                key: Key::Left,
                action: Action::Press,
                mods: Modifiers::empty(),
            }]
        );
    }

    #[test]
    fn test_mouse_down_reports_position_then_button() {
        let events = translate(&mouse(MouseEventKind::Down(TermButton::Left), KeyModifiers::SHIFT));
        assert_eq!(
            events,
            vec![
                InputEvent::CursorMove { x: 12.0, y: 7.0 },
                InputEvent::MouseButton {
                    button: MouseButton::Left,
                    action: Action::Press,
                    mods: Modifiers::SHIFT,
                },
            ]
        );
    }

    #[test]
    fn test_drag_is_cursor_move_and_scroll_is_dropped() {
        let drag = translate(&mouse(MouseEventKind::Drag(TermButton::Left), KeyModifiers::NONE));
        assert_eq!(drag, vec![InputEvent::CursorMove { x: 12.0, y: 7.0 }]);
        assert!(translate(&mouse(MouseEventKind::ScrollUp, KeyModifiers::NONE)).is_empty());
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            translate(&Event::Resize(80, 24)),
            vec![InputEvent::Resize { width: 80, height: 24 }]
        );
    }

    #[test]
    fn test_modifier_mapping() {
        let mods = modifiers(KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert_eq!(mods, Modifiers::CONTROL | Modifiers::ALT);
    }
}
