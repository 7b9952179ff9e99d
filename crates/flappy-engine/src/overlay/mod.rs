//! Immediate-mode overlay UI.
//!
//! A deliberately small subset of the Dear ImGui model: a frame is opened with
//! [`Overlay::new_frame`], windows are declared with `begin_window` /
//! `end_window`, text is emitted with the font on top of the font stack, and
//! [`Overlay::render`] closes the frame into a [`DrawData`] the GPU side can
//! submit.
//!
//! There is no pointer interaction; window flags only shape what is drawn.

mod context;
mod draw_data;
mod flags;
mod style;

pub use context::{FontHandle, Overlay};
pub use draw_data::{DrawData, PanelDraw, TextRun};
pub use flags::WindowFlags;
pub use style::OverlayStyle;
