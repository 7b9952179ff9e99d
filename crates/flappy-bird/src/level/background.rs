use flappy_engine::scene::Sprite;
use flappy_engine::shader::ShaderKind;
use glam::{vec2, vec3};

pub const TILE_WIDTH: f32 = 10.0;
pub const TILE_HEIGHT: f32 = 20.0;
/// Slower than the pipes, so the sky reads as far away.
pub const SPEED: f32 = 0.03;

const DEPTH: f32 = -0.5;

/// Horizontally tiled sky that scrolls left and wraps every tile.
#[derive(Debug, Clone)]
pub struct Background {
    tiles: usize,
    half_width: f32,
    offset: f32,
}

impl Background {
    pub fn new(half_width: f32) -> Self {
        // One spare tile on each side covers the wrap.
        let tiles = (2.0 * half_width / TILE_WIDTH).ceil() as usize + 2;
        Self {
            tiles,
            half_width,
            offset: 0.0,
        }
    }

    pub fn tiles(&self) -> usize {
        self.tiles
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn scroll(&mut self) {
        self.offset = (self.offset + SPEED) % TILE_WIDTH;
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        let left = -self.half_width - self.offset;
        (0..self.tiles).map(move |i| {
            Sprite::at_corner(
                ShaderKind::Background,
                vec3(left + i as f32 * TILE_WIDTH, -TILE_HEIGHT * 0.5, DEPTH),
                vec2(TILE_WIDTH, TILE_HEIGHT),
            )
        })
    }
}
