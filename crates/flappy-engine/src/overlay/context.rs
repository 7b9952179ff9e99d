use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;

use super::{DrawData, OverlayStyle, PanelDraw, TextRun, WindowFlags};
use crate::coords::Rect;
use crate::text::{FontId, FontLoadError, FontSystem};

/// A font in the overlay atlas at a fixed pixel size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontHandle {
    pub id: FontId,
    pub size: f32,
}

/// State of the window currently being declared.
struct OpenWindow {
    title: String,
    flags: WindowFlags,
    pos: Vec2,
    /// Top of the content area.
    content_top: f32,
    /// Next text line position.
    cursor: Vec2,
    /// Largest content extent seen so far, relative to `pos`.
    extent: Vec2,
    first_text: usize,
}

/// Per-frame state between `new_frame` and `render`.
#[derive(Default)]
struct Frame {
    window: Option<OpenWindow>,
    font_stack: Vec<FontHandle>,
}

/// Immediate-mode overlay context.
///
/// Owns the font atlas and the draw data of the last finished frame. Misuse
/// of the begin/end protocol is a programming error: it is logged at `warn`
/// and the offending call is ignored.
pub struct Overlay {
    fonts: FontSystem,
    default_font: Option<FontHandle>,
    style: OverlayStyle,

    window_positions: HashMap<String, Vec2>,
    frame: Option<Frame>,
    draw_data: DrawData,
    disposed: bool,
}

impl Overlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            fonts: FontSystem::new(),
            default_font: None,
            style,
            window_positions: HashMap::new(),
            frame: None,
            draw_data: DrawData::default(),
            disposed: false,
        }
    }

    /// Adds a font from TTF/OTF bytes at `size` pixels.
    ///
    /// The first font added becomes the default font.
    pub fn add_font(&mut self, bytes: &[u8], size: f32) -> Result<FontHandle, FontLoadError> {
        let id = self.fonts.load_font(bytes)?;
        Ok(self.register(id, size))
    }

    pub fn add_font_file(&mut self, path: &Path, size: f32) -> Result<FontHandle, FontLoadError> {
        let id = self.fonts.load_font_file(path)?;
        log::info!("overlay font {} at {size}px", path.display());
        Ok(self.register(id, size))
    }

    fn register(&mut self, id: FontId, size: f32) -> FontHandle {
        let handle = FontHandle { id, size };
        self.default_font.get_or_insert(handle);
        handle
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Opens a frame for a display of `display_size` logical pixels.
    pub fn new_frame(&mut self, display_size: Vec2) {
        if self.disposed {
            log::warn!("overlay: new_frame after dispose");
            return;
        }
        if self.frame.is_some() {
            log::warn!("overlay: new_frame while a frame is open; previous frame dropped");
        }
        self.draw_data.clear();
        self.draw_data.display_size = display_size;
        self.frame = Some(Frame::default());
    }

    /// Declares a window. Returns `true` when the caller should emit its
    /// content and then call [`end_window`](Self::end_window).
    pub fn begin_window(&mut self, title: &str, flags: WindowFlags) -> bool {
        let default_pos = self.style.default_window_pos;
        let pos = *self
            .window_positions
            .entry(title.to_owned())
            .or_insert(default_pos);

        let title_height = if flags.draws_title_bar() {
            self.title_bar_height()
        } else {
            0.0
        };

        let Some(frame) = self.frame.as_mut() else {
            log::warn!("overlay: begin_window('{title}') outside a frame");
            return false;
        };
        if let Some(open) = &frame.window {
            log::warn!(
                "overlay: begin_window('{title}') while '{}' is open; nesting is not supported",
                open.title
            );
            return false;
        }

        let content_top = pos.y + title_height + self.style.window_padding.y;
        frame.window = Some(OpenWindow {
            title: title.to_owned(),
            flags,
            pos,
            content_top,
            cursor: Vec2::new(pos.x + self.style.window_padding.x, content_top),
            extent: Vec2::ZERO,
            first_text: self.draw_data.texts.len(),
        });
        true
    }

    pub fn push_font(&mut self, font: FontHandle) {
        match self.frame.as_mut() {
            Some(frame) => frame.font_stack.push(font),
            None => log::warn!("overlay: push_font outside a frame"),
        }
    }

    pub fn pop_font(&mut self) {
        let popped = self.frame.as_mut().and_then(|f| f.font_stack.pop());
        if popped.is_none() {
            log::warn!("overlay: pop_font without matching push_font");
        }
    }

    /// Emits one line of text with the current font.
    pub fn text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let Some(font) = self.current_font() else {
            log::warn!("overlay: no font loaded; text '{text}' skipped");
            return;
        };
        let measured = self.fonts.measure_text(&text, font.id, font.size);
        let spacing = self.style.item_spacing;
        let color = self.style.text_color;

        let Some(window) = self.frame.as_mut().and_then(|f| f.window.as_mut()) else {
            log::warn!("overlay: text '{text}' outside a window");
            return;
        };

        let origin = window.cursor;
        window.extent.x = window.extent.x.max(origin.x + measured.x - window.pos.x);
        window.extent.y = window.extent.y.max(origin.y + measured.y - window.pos.y);
        window.cursor.y += measured.y + spacing;

        self.draw_data.texts.push(TextRun {
            text,
            font: font.id,
            size: font.size,
            origin,
            color,
        });
    }

    /// Closes the current window and emits its decorations.
    pub fn end_window(&mut self) {
        let Some(window) = self.frame.as_mut().and_then(|f| f.window.take()) else {
            log::warn!("overlay: end_window without begin_window");
            return;
        };
        self.finish_window(window);
    }

    /// Closes the frame. Windows left open are closed with a warning; an
    /// unbalanced font stack is reported and discarded.
    pub fn render(&mut self) -> &DrawData {
        match self.frame.take() {
            Some(mut frame) => {
                if let Some(window) = frame.window.take() {
                    log::warn!("overlay: window '{}' not ended before render", window.title);
                    self.finish_window(window);
                }
                if !frame.font_stack.is_empty() {
                    log::warn!(
                        "overlay: {} font(s) still pushed at render",
                        frame.font_stack.len()
                    );
                }
            }
            None => log::warn!("overlay: render without new_frame"),
        }
        &self.draw_data
    }

    /// Draw data of the last rendered frame.
    pub fn draw_data(&self) -> &DrawData {
        &self.draw_data
    }

    /// Releases the font atlas and draw data. Further frames are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.frame = None;
        self.draw_data = DrawData::default();
        self.fonts = FontSystem::new();
        self.default_font = None;
        self.disposed = true;
        log::debug!("overlay disposed");
    }

    fn current_font(&self) -> Option<FontHandle> {
        self.frame
            .as_ref()
            .and_then(|f| f.font_stack.last().copied())
            .or(self.default_font)
    }

    fn title_bar_height(&self) -> f32 {
        match self.default_font {
            Some(f) => self.fonts.measure_text("", f.id, f.size).y + 2.0 * self.style.title_padding,
            None => 2.0 * self.style.title_padding,
        }
    }

    fn finish_window(&mut self, window: OpenWindow) {
        let pad = self.style.window_padding;
        let title_height = window.content_top - pad.y - window.pos.y;

        let mut size = window.extent + pad;
        if window.flags.draws_title_bar() {
            let title_w = self
                .default_font
                .map(|f| self.fonts.measure_text(&window.title, f.id, f.size).x)
                .unwrap_or(0.0);
            size.x = size.x.max(title_w + 2.0 * pad.x);
            size.y = size.y.max(title_height);
        }

        if window.flags.draws_background() {
            self.draw_data.panels.push(PanelDraw {
                rect: Rect::new(window.pos.x, window.pos.y, size.x, size.y),
                color: self.style.window_bg,
            });
        }

        if window.flags.draws_title_bar() {
            self.draw_data.panels.push(PanelDraw {
                rect: Rect::new(window.pos.x, window.pos.y, size.x, title_height),
                color: self.style.title_bg,
            });
            if let Some(font) = self.default_font {
                let origin = Vec2::new(window.pos.x + pad.x, window.pos.y + self.style.title_padding);
                // The title goes before the content runs so content stays on top.
                self.draw_data.texts.insert(
                    window.first_text,
                    TextRun {
                        text: window.title.clone(),
                        font: font.id,
                        size: font.size,
                        origin,
                        color: self.style.text_color,
                    },
                );
            }
        }

        log::trace!("overlay window '{}' {}x{}", window.title, size.x, size.y);
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}
