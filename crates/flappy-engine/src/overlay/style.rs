use glam::Vec2;

use crate::paint::Color;

/// Overlay metrics and colors, in logical pixels.
///
/// Defaults follow the classic dark theme: near-black translucent panels,
/// a blue title strip and white text.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Where a window opens the first time it is declared.
    pub default_window_pos: Vec2,
    pub window_padding: Vec2,
    /// Vertical gap between consecutive text items.
    pub item_spacing: f32,
    /// Vertical padding around the title text.
    pub title_padding: f32,

    pub text_color: Color,
    pub window_bg: Color,
    pub title_bg: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            default_window_pos: Vec2::new(60.0, 60.0),
            window_padding: Vec2::new(8.0, 8.0),
            item_spacing: 4.0,
            title_padding: 3.0,
            text_color: Color::WHITE,
            window_bg: Color::from_straight(0.06, 0.06, 0.06, 0.94),
            title_bg: Color::from_straight(0.16, 0.29, 0.48, 1.0),
        }
    }
}
