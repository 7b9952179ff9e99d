use flappy_engine::coords::Rect;
use flappy_engine::scene::Sprite;
use flappy_engine::shader::ShaderKind;
use glam::{vec2, vec3, Vec2};

/// Downward acceleration per tick.
pub const GRAVITY: f32 = 0.012;
/// Vertical velocity set by a flap.
pub const FLAP_VELOCITY: f32 = 0.22;
/// Terminal fall speed.
pub const MAX_FALL: f32 = -0.4;
pub const SIZE: f32 = 1.0;

const DEPTH: f32 = 0.2;
const DEAD_OPACITY: f32 = 0.6;
// Hit box is a bit smaller than the sprite; the texture has transparent corners.
const HIT_SCALE: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub position: Vec2,
    pub velocity: f32,
}

impl Bird {
    pub fn new(x: f32) -> Self {
        Self {
            position: vec2(x, 0.0),
            velocity: 0.0,
        }
    }

    pub fn flap(&mut self) {
        self.velocity = FLAP_VELOCITY;
    }

    /// Advances one tick under gravity.
    pub fn fall(&mut self) {
        self.velocity = (self.velocity - GRAVITY).max(MAX_FALL);
        self.position.y += self.velocity;
    }

    /// Nose up while climbing, down while falling.
    pub fn rotation(&self) -> f32 {
        (self.velocity * 4.0).clamp(-1.2, 0.5)
    }

    pub fn hit_box(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(SIZE * HIT_SCALE))
    }

    pub fn top(&self) -> f32 {
        self.position.y + SIZE * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - SIZE * 0.5
    }

    pub fn sprite(&self, alive: bool) -> Sprite {
        let opacity = if alive { 1.0 } else { DEAD_OPACITY };
        Sprite::quad(
            ShaderKind::Bird,
            vec3(self.position.x, self.position.y, DEPTH),
            vec2(SIZE, SIZE),
        )
        .rotated(self.rotation())
        .with_opacity(opacity)
    }
}
