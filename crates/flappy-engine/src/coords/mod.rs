//! Geometry shared by the renderers, the overlay and the game.
//!
//! - `Rect`: axis-aligned boxes (overlay layout, hit boxes)
//! - `Viewport`: physical-pixel render area
//! - `ViewVolume`: the fixed orthographic volume used by every sprite program

mod projection;
mod rect;
mod viewport;

pub use projection::{to_ndc, ViewVolume};
pub use rect::Rect;
pub use viewport::Viewport;

pub use glam::{Mat4, Vec2, Vec3};
