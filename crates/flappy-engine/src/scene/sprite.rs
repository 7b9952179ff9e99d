use glam::{Mat4, Quat, Vec2, Vec3};

use crate::shader::{ShaderKind, SpriteInstance};

/// One textured quad drawn with a sprite program.
///
/// The model matrix maps the unit quad (0..1 on both axes) into world space.
/// Depth comes from the model's z translation: higher z is drawn in front.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub kind: ShaderKind,
    pub model: Mat4,
    /// Mirrors the texture vertically (top pipes reuse the bottom pipe image).
    pub flip_v: bool,
    pub opacity: f32,
}

impl Sprite {
    /// A quad of `size` world units centered on `center`.
    pub fn quad(kind: ShaderKind, center: Vec3, size: Vec2) -> Self {
        Self {
            kind,
            model: Self::centered_model(center, size, 0.0),
            flip_v: false,
            opacity: 1.0,
        }
    }

    /// A quad whose bottom-left corner sits at `origin`.
    pub fn at_corner(kind: ShaderKind, origin: Vec3, size: Vec2) -> Self {
        Self {
            kind,
            model: Mat4::from_translation(origin) * Mat4::from_scale(size.extend(1.0)),
            flip_v: false,
            opacity: 1.0,
        }
    }

    /// Rebuilds the model rotated by `angle` radians about the quad center.
    /// Expects an unrotated quad.
    pub fn rotated(mut self, angle: f32) -> Self {
        let (scale, _, translation) = self.model.to_scale_rotation_translation();
        let size = scale.truncate();
        let center = translation + (size * 0.5).extend(0.0);
        self.model = Self::centered_model(center, size, angle);
        self
    }

    pub fn flipped_v(mut self, flip: bool) -> Self {
        self.flip_v = flip;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Depth of the sprite (z of the model translation).
    #[inline]
    pub fn z(&self) -> f32 {
        self.model.w_axis.z
    }

    pub fn to_instance(&self) -> SpriteInstance {
        SpriteInstance {
            model: self.model.to_cols_array_2d(),
            params: [
                if self.flip_v { 1.0 } else { 0.0 },
                self.opacity,
                0.0,
                0.0,
            ],
        }
    }

    // T(center) * R(angle) * S(size) * T(-0.5, -0.5)
    fn centered_model(center: Vec3, size: Vec2, angle: f32) -> Mat4 {
        Mat4::from_translation(center)
            * Mat4::from_quat(Quat::from_rotation_z(angle))
            * Mat4::from_scale(size.extend(1.0))
            * Mat4::from_translation(Vec3::new(-0.5, -0.5, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn quad_is_centered() {
        let s = Sprite::quad(ShaderKind::Bird, Vec3::new(2.0, 3.0, 0.5), Vec2::new(1.0, 2.0));
        assert!(approx(s.model.transform_point3(Vec3::ZERO), Vec3::new(1.5, 2.0, 0.5)));
        assert!(approx(s.model.transform_point3(Vec3::new(1.0, 1.0, 0.0)), Vec3::new(2.5, 4.0, 0.5)));
        assert_eq!(s.z(), 0.5);
    }

    #[test]
    fn corner_quad_starts_at_origin() {
        let s = Sprite::at_corner(ShaderKind::Pipe, Vec3::new(4.0, -1.0, 0.1), Vec2::new(1.5, 8.0));
        assert!(approx(s.model.transform_point3(Vec3::ZERO), Vec3::new(4.0, -1.0, 0.1)));
        assert!(approx(s.model.transform_point3(Vec3::new(1.0, 1.0, 0.0)), Vec3::new(5.5, 7.0, 0.1)));
    }

    #[test]
    fn rotation_keeps_center() {
        let center = Vec3::new(-3.0, 1.0, 0.2);
        let s = Sprite::quad(ShaderKind::Bird, center, Vec2::ONE).rotated(0.7);
        assert!(approx(s.model.transform_point3(Vec3::new(0.5, 0.5, 0.0)), center));
    }

    #[test]
    fn instance_params_pack_flags() {
        let s = Sprite::quad(ShaderKind::Pipe, Vec3::ZERO, Vec2::ONE)
            .flipped_v(true)
            .with_opacity(2.0);
        assert_eq!(s.to_instance().params, [1.0, 1.0, 0.0, 0.0]);
    }
}
