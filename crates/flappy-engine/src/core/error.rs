use crate::shader::ShaderError;
use crate::text::FontLoadError;
use crate::texture::TextureError;

/// Fatal startup failure. The game loop never starts after one of these.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("could not initialize the windowing subsystem")]
    WindowingInit(#[source] winit::error::EventLoopError),

    #[error("could not create the window")]
    WindowCreate(#[source] winit::error::OsError),

    #[error("the event loop never became active; no window was created")]
    WindowNotCreated,

    #[error("the windowing subsystem reports no display")]
    NoDisplay,

    #[error("GPU initialization failed")]
    Gpu(#[source] anyhow::Error),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Font(#[from] FontLoadError),
}
