use glam::{Mat4, Vec3};

/// Fixed logical viewing volume for orthographic rendering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewVolume {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewVolume {
    /// A volume spanning `-half..half` on x and y and `-1..1` in depth.
    pub const fn symmetric(half: f32) -> Self {
        Self {
            left: -half,
            right: half,
            bottom: -half,
            top: half,
            near: -1.0,
            far: 1.0,
        }
    }

    /// Orthographic projection into wgpu clip space (depth `0..1`).
    ///
    /// Larger world `z` maps to smaller depth, so sprites with a higher `z`
    /// draw in front under the sprite pipelines' `LessEqual` depth test.
    pub fn orthographic(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

impl Default for ViewVolume {
    fn default() -> Self {
        Self::symmetric(10.0)
    }
}

/// Maps a world-space point through `projection` into normalized device
/// coordinates.
pub fn to_ndc(projection: &Mat4, p: Vec3) -> Vec3 {
    projection.project_point3(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_xy(p: Vec3, x: f32, y: f32) -> bool {
        (p.x - x).abs() < 1e-5 && (p.y - y).abs() < 1e-5
    }

    #[test]
    fn corners_map_to_ndc_corners() {
        let pr = ViewVolume::default().orthographic();
        assert!(approx_xy(to_ndc(&pr, Vec3::new(-10.0, -10.0, 0.0)), -1.0, -1.0));
        assert!(approx_xy(to_ndc(&pr, Vec3::new(10.0, 10.0, 0.0)), 1.0, 1.0));
    }

    #[test]
    fn higher_z_is_closer() {
        let pr = ViewVolume::default().orthographic();
        let front = to_ndc(&pr, Vec3::new(0.0, 0.0, 0.5)).z;
        let back = to_ndc(&pr, Vec3::new(0.0, 0.0, -0.5)).z;
        assert!(front < back);
        assert!((0.0..=1.0).contains(&front));
        assert!((0.0..=1.0).contains(&back));
    }

    #[test]
    fn default_volume_is_twenty_units_square() {
        let v = ViewVolume::default();
        assert_eq!(v.width(), 20.0);
        assert_eq!(v.height(), 20.0);
        assert_eq!((v.near, v.far), (-1.0, 1.0));
    }
}
