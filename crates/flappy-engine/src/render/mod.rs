//! GPU rendering subsystem.
//!
//! Renderers consume a frame's draw streams and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - sprites are in world units, mapped by the sprite programs' matrices
//! - overlay geometry is in logical pixels (top-left origin, +Y down); its
//!   vertex shaders convert to NDC using a viewport uniform

mod common;
mod ctx;
mod panel;
mod sprite;
mod text;

pub use ctx::{RenderCtx, RenderTarget};
pub use panel::PanelRenderer;
pub use sprite::SpriteRenderer;
pub use text::TextRenderer;
