use ::winit::event::{ElementState, KeyEvent, WindowEvent};
use ::winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{InputEvent, Key, KeyState, Modifiers};

/// Maps the window events the game reacts to; `None` for everything else.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::KeyboardInput { event, .. } => key_event(event),
        WindowEvent::ModifiersChanged(m) => InputEvent::ModifiersChanged(modifiers(m.state())),
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        _ => return None,
    };
    Some(ev)
}

fn key_event(event: &KeyEvent) -> InputEvent {
    InputEvent::Key {
        key: key(event.physical_key),
        state: if event.state == ElementState::Pressed {
            KeyState::Pressed
        } else {
            KeyState::Released
        },
        repeat: event.repeat,
    }
}

fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Physical keys, so Space flaps on every keyboard layout.
fn key(physical: PhysicalKey) -> Key {
    // Native codes have no stable numeric form.
    let PhysicalKey::Code(code) = physical else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Space => Key::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_physical_space() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::Space)), Key::Space);
    }

    #[test]
    fn left_and_right_modifiers_collapse() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::ControlLeft)), Key::Control);
        assert_eq!(key(PhysicalKey::Code(KeyCode::ControlRight)), Key::Control);
    }

    #[test]
    fn other_keys_keep_their_code() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Unknown(KeyCode::KeyQ as u32));
    }

    #[test]
    fn focus_and_unrelated_events() {
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false)),
            Some(InputEvent::Focused(false))
        );
        assert_eq!(translate_window_event(&WindowEvent::CloseRequested), None);
    }
}
