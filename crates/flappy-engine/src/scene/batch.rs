use glam::Mat4;

use super::Sprite;
use crate::shader::ShaderKind;

/// Sprites recorded by the session for one frame.
///
/// Besides the draws themselves the batch carries the view matrix each
/// program should use (`vw_matrix`), so sessions never touch GPU state.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps allocated capacity for reuse
#[derive(Debug, Default)]
pub struct SpriteBatch {
    sprites: Vec<Sprite>,
    views: [Option<Mat4>; ShaderKind::ALL.len()],
}

impl SpriteBatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded sprites and views.
    #[inline]
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.views = [None; ShaderKind::ALL.len()];
    }

    #[inline]
    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Sets the view matrix used by every sprite of `kind` this frame.
    #[inline]
    pub fn set_view(&mut self, kind: ShaderKind, view: Mat4) {
        self.views[kind.index()] = Some(view);
    }

    /// View matrix for `kind`, if the session set one.
    #[inline]
    pub fn view(&self, kind: ShaderKind) -> Option<Mat4> {
        self.views[kind.index()]
    }

    /// Sprites in insertion order.
    #[inline]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Sprites of `kind`, in insertion order.
    pub fn iter_kind(&self, kind: ShaderKind) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    /// Sprites grouped by program (declaration order), insertion order within
    /// a program.
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        ShaderKind::ALL.into_iter().flat_map(move |k| self.iter_kind(k))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl Extend<Sprite> for SpriteBatch {
    fn extend<I: IntoIterator<Item = Sprite>>(&mut self, iter: I) {
        self.sprites.extend(iter);
    }
}
