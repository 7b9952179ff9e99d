//! Input subsystem.
//!
//! The public API does not expose winit types. The window layer translates
//! platform events through [`platform`] and applies them to an [`InputState`].

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers};
