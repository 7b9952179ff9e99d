use glam::Vec2;

use crate::coords::{Rect, Viewport};
use crate::paint::Color;
use crate::text::FontId;

/// A filled rectangle (window background or title strip).
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDraw {
    pub rect: Rect,
    pub color: Color,
}

/// One line of text. `origin` is the top-left of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: FontId,
    pub size: f32,
    pub origin: Vec2,
    pub color: Color,
}

/// Everything one overlay frame wants drawn, in logical pixels.
///
/// Panels are drawn first, text on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawData {
    /// Logical size of the display the frame was laid out for.
    pub display_size: Vec2,
    pub(crate) panels: Vec<PanelDraw>,
    pub(crate) texts: Vec<TextRun>,
}

impl DrawData {
    pub fn panels(&self) -> &[PanelDraw] {
        &self.panels
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// Physical pixels per logical pixel when drawn into `viewport`.
    ///
    /// 1 before any frame has been laid out.
    pub fn framebuffer_scale(&self, viewport: Viewport) -> f32 {
        if self.display_size.x <= 0.0 {
            return 1.0;
        }
        viewport.width as f32 / self.display_size.x
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty() && self.texts.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.panels.clear();
        self.texts.clear();
    }
}
