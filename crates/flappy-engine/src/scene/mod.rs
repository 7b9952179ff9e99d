//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic sprite draws for one frame
//! - carry the per-program view matrices set by the session
//! - provide deterministic ordering (program order + insertion order)

mod batch;
mod sprite;

pub use batch::SpriteBatch;
pub use sprite::Sprite;
