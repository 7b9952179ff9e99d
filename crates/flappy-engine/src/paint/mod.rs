//! Color model shared by the overlay and the renderers.

mod color;

pub use color::Color;
