//! The shipped round: a bird, five scrolling pipe pairs and a tiled sky.
//!
//! World units: the view volume spans `-10..10` vertically; horizontally the
//! visible half-width is `10 * aspect`, and every program's view matrix
//! squeezes x by `1 / aspect` so units stay square on screen.

mod background;
mod bird;
mod pipe;

pub use background::Background;
pub use bird::Bird;
pub use pipe::{PipePair, Pipes};

use flappy_engine::input::{InputState, Key};
use flappy_engine::scene::SpriteBatch;
use flappy_engine::shader::ShaderKind;
use glam::{vec3, Mat4};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::session::Session;

/// Half the view volume's height.
pub const HALF_HEIGHT: f32 = 10.0;
/// Bird x as a fraction of the visible half-width (left of center).
const BIRD_X: f32 = -0.35;

#[derive(Debug, Clone)]
pub struct Level {
    half_width: f32,
    view: Mat4,
    rng: StdRng,

    bird: Bird,
    pipes: Pipes,
    background: Background,

    score: u32,
    alive: bool,
    game_over: bool,
}

impl Level {
    /// A round with a fixed pipe sequence.
    pub fn with_seed(aspect: f32, seed: u64) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        let half_width = HALF_HEIGHT * aspect;
        let mut rng = StdRng::seed_from_u64(seed);
        let pipes = Pipes::new(half_width, &mut rng);

        log::debug!("level: aspect {aspect:.3}, half width {half_width:.2}, seed {seed}");

        Self {
            half_width,
            view: Mat4::from_scale(vec3(1.0 / aspect, 1.0, 1.0)),
            rng,
            bird: Bird::new(BIRD_X * half_width),
            pipes,
            background: Background::new(half_width),
            score: 0,
            alive: true,
            game_over: false,
        }
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &Pipes {
        &self.pipes
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    fn collides(&self) -> bool {
        self.bird.top() >= HALF_HEIGHT
            || self.bird.bottom() <= -HALF_HEIGHT
            || self.pipes.hits(self.bird.hit_box())
    }

    fn out_of_view(&self) -> bool {
        self.bird.top() < -HALF_HEIGHT
    }
}

impl Session for Level {
    fn new(aspect: f32) -> Self {
        Self::with_seed(aspect, rand::random())
    }

    fn update(&mut self, input: &InputState) {
        let flap = input.key_pressed(Key::Space);

        if !self.alive {
            self.bird.fall();
            if flap && self.out_of_view() {
                log::info!("round over, score {}", self.score);
                self.game_over = true;
            }
            return;
        }

        if flap {
            self.bird.flap();
        }
        self.bird.fall();
        self.background.scroll();
        self.score += self.pipes.scroll(self.bird.position.x, &mut self.rng);

        if self.collides() {
            log::info!("bird down at score {}", self.score);
            self.alive = false;
        }
    }

    fn render(&self, batch: &mut SpriteBatch) {
        for kind in ShaderKind::ALL {
            batch.set_view(kind, self.view);
        }
        batch.extend(self.background.sprites());
        batch.extend(self.pipes.sprites());
        batch.push(self.bird.sprite(self.alive));
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use flappy_engine::input::{InputEvent, KeyState};

    use super::*;

    const ASPECT: f32 = 16.0 / 9.0;

    fn space_pressed() -> InputState {
        let mut input = InputState::new();
        input.apply_event(&InputEvent::Key {
            key: Key::Space,
            state: KeyState::Pressed,
            repeat: false,
        });
        input
    }

    fn run_until_dead(level: &mut Level, input: &InputState) -> usize {
        for tick in 0..10_000 {
            level.update(input);
            if !level.is_alive() {
                return tick;
            }
        }
        panic!("bird never died");
    }

    #[test]
    fn fresh_round_starts_alive_with_zero_score() {
        let level = Level::with_seed(ASPECT, 1);
        assert_eq!(level.score(), 0);
        assert!(level.is_alive());
        assert!(!level.is_game_over());
        assert!((level.half_width() - 10.0 * ASPECT).abs() < 1e-5);
        assert!(level.bird().position.x < 0.0);
    }

    #[test]
    fn bird_falls_without_input() {
        let mut level = Level::with_seed(ASPECT, 1);
        let idle = InputState::new();
        level.update(&idle);
        level.update(&idle);
        assert!(level.bird().position.y < 0.0);
        assert!(level.bird().velocity < 0.0);
    }

    #[test]
    fn space_flaps() {
        let mut level = Level::with_seed(ASPECT, 1);
        level.update(&space_pressed());
        assert!(level.bird().position.y > 0.0);
    }

    #[test]
    fn hitting_the_floor_kills_and_stops_scrolling() {
        let mut level = Level::with_seed(ASPECT, 1);
        let idle = InputState::new();
        run_until_dead(&mut level, &idle);
        assert!(level.bird().bottom() <= -HALF_HEIGHT + 1.0);

        let pipes_before = level.pipes().pairs()[0].x;
        level.update(&idle);
        assert_eq!(level.pipes().pairs()[0].x, pipes_before);
        assert!(!level.is_game_over());
    }

    #[test]
    fn hitting_a_pipe_kills() {
        let mut level = Level::with_seed(ASPECT, 3);
        let idle = InputState::new();
        // Park the bird in front of the first pair, well outside its gap.
        let gap = level.pipes.pairs()[0].gap_center;
        level.bird.position.y = if gap > 0.0 { gap - 4.0 } else { gap + 4.0 };
        level.bird.position.x = level.pipes.pairs()[0].x + 0.5;
        // Cancels one tick of gravity so the bird holds its height.
        level.bird.velocity = bird::GRAVITY;
        level.update(&idle);
        assert!(!level.is_alive());
    }

    #[test]
    fn passing_pipes_scores() {
        let mut level = Level::with_seed(ASPECT, 5);
        let idle = InputState::new();
        let mut scored = 0;
        // Keep the bird inside each gap as the pairs go by.
        for _ in 0..2_000 {
            let next = level
                .pipes()
                .pairs()
                .iter()
                .filter(|p| p.right() >= level.bird.position.x - 1.0)
                .min_by(|a, b| a.x.total_cmp(&b.x))
                .map(|p| p.gap_center)
                .unwrap_or(0.0);
            level.bird.position.y = next;
            level.bird.velocity = bird::GRAVITY;
            level.update(&idle);
            assert!(level.is_alive(), "bird died at score {}", level.score());
            scored = level.score();
            if scored >= 2 {
                break;
            }
        }
        assert!(scored >= 2);
    }

    #[test]
    fn space_after_falling_out_of_view_ends_the_round() {
        let mut level = Level::with_seed(ASPECT, 1);
        let idle = InputState::new();
        run_until_dead(&mut level, &idle);

        // Still on screen: space does nothing yet.
        level.update(&space_pressed());
        assert!(!level.is_game_over());

        for _ in 0..200 {
            level.update(&idle);
        }
        assert!(level.bird().top() < -HALF_HEIGHT);
        assert!(!level.is_game_over());

        level.update(&space_pressed());
        assert!(level.is_game_over());
    }

    #[test]
    fn render_sets_views_and_layers() {
        let level = Level::with_seed(ASPECT, 1);
        let mut batch = SpriteBatch::new();
        level.render(&mut batch);

        let view = batch.view(ShaderKind::Pipe).map(|m| m.x_axis.x);
        assert_eq!(view, Some(1.0 / ASPECT));
        assert_eq!(batch.iter_kind(ShaderKind::Bird).count(), 1);
        assert_eq!(batch.iter_kind(ShaderKind::Pipe).count(), 2 * pipe::PAIRS);
        assert_eq!(
            batch.iter_kind(ShaderKind::Background).count(),
            Background::new(level.half_width()).tiles()
        );
    }
}
