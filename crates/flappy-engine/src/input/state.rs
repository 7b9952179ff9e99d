use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Keyboard state for the game window.
///
/// Owned by the game loop and handed to the session by reference. `keys_down`
/// persists across frames; `pressed`/`released` only hold transitions seen
/// since the last [`begin_frame`](Self::begin_frame).
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    keys_down: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops last frame's transitions. Called right before events are polled.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Keys released while unfocused never reach us.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        self.pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        self.released.insert(*key);
                    }
                }
            },
        }
    }

    /// Key is currently held.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Key went down since the last `begin_frame`.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Key went up since the last `begin_frame`.
    pub fn key_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }
}
