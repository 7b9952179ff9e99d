//! Sprite shader programs.
//!
//! A fixed, enumerated set of programs ([`ShaderKind`]) loaded once from WGSL
//! files. Each program shares the same vertex formats and bind group layouts
//! and exposes named uniform slots (`pr_matrix`, `vw_matrix`, `tex`).

mod kind;
mod layout;
mod program;
mod registry;
mod uniform;
pub(crate) mod vertex;

pub use kind::ShaderKind;
pub use layout::SpriteLayouts;
pub use program::ShaderProgram;
pub use registry::{ShaderRegistry, ShaderSources};
pub use uniform::UniformBlock;
pub use vertex::SpriteInstance;

/// Failure to load a sprite program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {kind} shader from {path}")]
    Read {
        kind: ShaderKind,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} shader failed to compile: {message}")]
    Compile { kind: ShaderKind, message: String },
}
