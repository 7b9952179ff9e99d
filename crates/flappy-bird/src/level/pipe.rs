use flappy_engine::coords::Rect;
use flappy_engine::scene::Sprite;
use flappy_engine::shader::ShaderKind;
use rand::Rng;

pub const PAIRS: usize = 5;
pub const WIDTH: f32 = 1.5;
pub const HEIGHT: f32 = 12.0;
/// Vertical opening between the two pipes of a pair.
pub const GAP: f32 = 4.5;
/// Gap centers are drawn from `-GAP_RANGE..=GAP_RANGE`.
pub const GAP_RANGE: f32 = 5.0;
/// World units scrolled per tick.
pub const SPEED: f32 = 0.08;
const MIN_SPACING: f32 = 8.0;

const DEPTH: f32 = 0.1;

/// A bottom and a top pipe sharing one x position.
#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    /// Left edge.
    pub x: f32,
    pub gap_center: f32,
    pub passed: bool,
}

impl PipePair {
    pub fn right(&self) -> f32 {
        self.x + WIDTH
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::new(self.x, self.gap_center - GAP * 0.5 - HEIGHT, WIDTH, HEIGHT)
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, self.gap_center + GAP * 0.5, WIDTH, HEIGHT)
    }

    pub fn hits(&self, rect: Rect) -> bool {
        self.bottom_rect().overlaps(rect) || self.top_rect().overlaps(rect)
    }

    /// The pipe texture has its cap at the top; the top pipe is mirrored so
    /// both caps face the gap.
    pub fn sprites(&self) -> [Sprite; 2] {
        let bottom = self.bottom_rect();
        let top = self.top_rect();
        [
            Sprite::at_corner(ShaderKind::Pipe, bottom.origin.extend(DEPTH), bottom.size),
            Sprite::at_corner(ShaderKind::Pipe, top.origin.extend(DEPTH), top.size).flipped_v(true),
        ]
    }
}

/// The scrolling row of pipe pairs.
#[derive(Debug, Clone)]
pub struct Pipes {
    pairs: Vec<PipePair>,
    spacing: f32,
    half_width: f32,
}

impl Pipes {
    /// Lays the pairs out to the right of the visible area.
    pub fn new(half_width: f32, rng: &mut impl Rng) -> Self {
        let spacing = spacing_for(half_width);
        let start = half_width + 4.0;
        let pairs = (0..PAIRS)
            .map(|i| PipePair {
                x: start + i as f32 * spacing,
                gap_center: random_gap(rng),
                passed: false,
            })
            .collect();

        Self {
            pairs,
            spacing,
            half_width,
        }
    }

    pub fn pairs(&self) -> &[PipePair] {
        &self.pairs
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Moves every pair left one tick and recycles the ones that left the
    /// screen. Returns how many pairs `bird_x` passed during the tick.
    pub fn scroll(&mut self, bird_x: f32, rng: &mut impl Rng) -> u32 {
        let wrap = self.spacing * PAIRS as f32;
        let mut passed = 0;

        for pair in &mut self.pairs {
            pair.x -= SPEED;

            if !pair.passed && pair.right() < bird_x {
                pair.passed = true;
                passed += 1;
            }

            if pair.right() < -self.half_width {
                pair.x += wrap;
                pair.gap_center = random_gap(rng);
                pair.passed = false;
                log::trace!("pipe pair recycled to x={:.2}", pair.x);
            }
        }
        passed
    }

    pub fn hits(&self, rect: Rect) -> bool {
        self.pairs.iter().any(|p| p.hits(rect))
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.pairs.iter().flat_map(PipePair::sprites)
    }
}

/// Wide windows spread the pairs so five of them still span the screen.
fn spacing_for(half_width: f32) -> f32 {
    MIN_SPACING.max((2.0 * half_width + WIDTH) / PAIRS as f32)
}

fn random_gap(rng: &mut impl Rng) -> f32 {
    rng.random_range(-GAP_RANGE..=GAP_RANGE)
}

#[cfg(test)]
mod tests {
    use glam::vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn pipes(half_width: f32) -> (Pipes, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        (Pipes::new(half_width, &mut rng), rng)
    }

    #[test]
    fn pairs_start_offscreen_and_evenly_spaced() {
        let (pipes, _) = pipes(10.0);
        assert_eq!(pipes.pairs().len(), PAIRS);
        assert!(pipes.pairs()[0].x > 10.0);
        for w in pipes.pairs().windows(2) {
            assert!((w[1].x - w[0].x - pipes.spacing()).abs() < 1e-4);
        }
        for p in pipes.pairs() {
            assert!((-GAP_RANGE..=GAP_RANGE).contains(&p.gap_center));
        }
    }

    #[test]
    fn spacing_grows_with_wide_screens() {
        assert_eq!(spacing_for(10.0), MIN_SPACING);
        assert!(spacing_for(40.0) > MIN_SPACING);
    }

    #[test]
    fn gap_is_open_and_pipes_are_solid() {
        let pair = PipePair {
            x: 0.0,
            gap_center: 1.0,
            passed: false,
        };
        let in_gap = Rect::from_center_size(vec2(0.75, 1.0), vec2(0.8, 0.8));
        assert!(!pair.hits(in_gap));

        let in_top = Rect::from_center_size(vec2(0.75, 1.0 + GAP), vec2(0.8, 0.8));
        let in_bottom = Rect::from_center_size(vec2(0.75, 1.0 - GAP), vec2(0.8, 0.8));
        assert!(pair.hits(in_top));
        assert!(pair.hits(in_bottom));
    }

    #[test]
    fn passing_a_pair_counts_once() {
        let (mut pipes, mut rng) = pipes(10.0);
        let bird_x = pipes.pairs()[0].right() - SPEED * 0.5;

        assert_eq!(pipes.scroll(bird_x, &mut rng), 1);
        assert_eq!(pipes.scroll(bird_x, &mut rng), 0);
        assert!(pipes.pairs()[0].passed);
    }

    #[test]
    fn offscreen_pairs_wrap_to_the_back() {
        let (mut pipes, mut rng) = pipes(10.0);
        let wrap = pipes.spacing() * PAIRS as f32;
        let first = pipes.pairs()[0].x;

        let ticks = ((first + WIDTH + 10.0) / SPEED).ceil() as usize + 1;
        for _ in 0..ticks {
            pipes.scroll(-100.0, &mut rng);
        }

        let x = pipes.pairs()[0].x;
        assert!(x > 10.0, "recycled pair should be right of the screen, got {x}");
        assert!((x - (first - ticks as f32 * SPEED + wrap)).abs() < 1e-2);
        assert!(!pipes.pairs()[0].passed);
    }

    #[test]
    fn top_pipe_is_mirrored() {
        let pair = PipePair {
            x: 2.0,
            gap_center: 0.0,
            passed: false,
        };
        let [bottom, top] = pair.sprites();
        assert!(!bottom.flip_v);
        assert!(top.flip_v);
        assert_eq!(bottom.z(), DEPTH);
    }
}
