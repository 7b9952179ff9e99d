use glam::Vec2;

/// Axis-aligned rectangle.
///
/// Used in two spaces: overlay geometry (logical pixels, top-left origin, +Y
/// down) and game-world hit boxes (world units, +Y up). The math does not care
/// which; `origin` is always the minimum corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Flips negative extents so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let a = self.origin;
        let b = self.origin + self.size;
        let min = a.min(b);
        Self {
            origin: min,
            size: a.max(b) - min,
        }
    }

    /// Returns the overlapping region, or `None` when the rectangles only touch
    /// or are disjoint.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let lo = a.min().max(b.min());
        let hi = a.max().min(b.max());
        let size = hi - lo;

        if size.x <= 0.0 || size.y <= 0.0 {
            None
        } else {
            Some(Rect { origin: lo, size })
        }
    }

    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        self.intersect(other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn normalized_flips_negative_extents() {
        let n = r(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, r(6.0, 7.0, 4.0, 3.0));
    }

    #[test]
    fn overlap_region_of_a_bird_and_a_pipe() {
        let pipe = r(0.0, -12.0, 1.5, 12.0);
        let bird = Rect::from_center_size(Vec2::new(1.25, 0.0), Vec2::splat(1.0));
        assert_eq!(pipe.intersect(bird), Some(r(0.75, -0.5, 0.75, 0.5)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let left = r(-3.0, 2.0, 3.0, 4.0);
        assert!(!left.overlaps(r(0.0, 2.0, 1.0, 1.0)));
        assert!(left.overlaps(r(-0.5, 5.5, 1.0, 1.0)));
    }

    #[test]
    fn center_size_spans_both_sides() {
        let rect = Rect::from_center_size(Vec2::new(-2.0, 3.0), Vec2::new(1.0, 4.0));
        assert_eq!(rect.origin, Vec2::new(-2.5, 1.0));
        assert_eq!(rect.max(), Vec2::new(-1.5, 5.0));
    }
}
