use flappy_engine::input::InputState;
use flappy_engine::scene::SpriteBatch;

/// One playable round, from spawn to game over.
///
/// The driver owns exactly one session and replaces it with a fresh one
/// built from the same aspect ratio once [`is_game_over`](Self::is_game_over)
/// reports true.
pub trait Session {
    /// Starts a round for a display of the given width / height ratio.
    fn new(aspect: f32) -> Self
    where
        Self: Sized;

    /// Advances the round by one tick.
    fn update(&mut self, input: &InputState);

    /// Pushes this tick's sprites and per-program view matrices.
    fn render(&self, batch: &mut SpriteBatch);

    fn is_game_over(&self) -> bool;

    fn score(&self) -> u32;
}
