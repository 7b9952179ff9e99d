use flappy_engine::coords::{Vec2, Viewport};
use flappy_engine::core::Backend;
use flappy_engine::input::InputState;
use flappy_engine::overlay::{FontHandle, Overlay, WindowFlags};
use flappy_engine::scene::SpriteBatch;

use crate::session::Session;

/// Lifecycle of the game loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Platform not brought up yet.
    Uninitialized,
    Running,
    /// Close requested; teardown pending.
    Terminating,
    Destroyed,
}

const SCORE_WINDOW: &str = "Score";

/// The game loop: one session, one backend, one frame per call to
/// [`frame`](Self::frame).
pub struct Driver<B: Backend, S: Session> {
    backend: B,
    session: S,
    aspect: f32,

    input: InputState,
    overlay: Overlay,
    score_font: FontHandle,
    batch: SpriteBatch,

    phase: Phase,
    frames: u64,
}

impl<B: Backend, S: Session> Driver<B, S> {
    /// Takes over an initialized backend and starts the first round.
    pub fn new(backend: B, overlay: Overlay, score_font: FontHandle, aspect: f32) -> Self {
        log::info!("game loop starting (aspect {aspect:.3})");
        Self {
            backend,
            session: S::new(aspect),
            aspect,
            input: InputState::new(),
            overlay,
            score_font,
            batch: SpriteBatch::new(),
            phase: Phase::Running,
            frames: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one frame and returns the phase it left the loop in.
    pub fn frame(&mut self) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }

        let size = self.backend.window_size();
        self.backend.set_viewport(Viewport::full(size));

        self.backend.poll_events(&mut self.input);
        self.session.update(&self.input);

        if self.session.is_game_over() {
            log::info!("game over at score {}; new round", self.session.score());
            self.session = S::new(self.aspect);
        }

        self.backend.clear();
        self.batch.clear();
        self.session.render(&mut self.batch);
        self.backend.draw_sprites(&self.batch);

        if let Some(err) = self.backend.take_gpu_error() {
            log::error!("frame {}: {err}", self.frames);
        }

        self.draw_score(size);
        self.backend.submit_overlay(&self.overlay);
        self.backend.swap_buffers();

        self.frames += 1;
        if self.backend.should_close() {
            log::info!("close requested after {} frames", self.frames);
            self.phase = Phase::Terminating;
        }
        self.phase
    }

    fn draw_score(&mut self, size: (u32, u32)) {
        let scale = self.backend.scale_factor().max(f32::EPSILON);
        let display = Vec2::new(size.0 as f32, size.1 as f32) / scale;

        self.overlay.new_frame(display);
        if self
            .overlay
            .begin_window(SCORE_WINDOW, WindowFlags::NO_BACKGROUND | WindowFlags::NO_DECORATION)
        {
            self.overlay.push_font(self.score_font);
            self.overlay.text(format!("Score: {}", self.session.score()));
            self.overlay.pop_font();
            self.overlay.end_window();
        }
        self.overlay.render();
    }

    /// Runs frames until close is requested, then tears down.
    pub fn run(mut self) -> Phase {
        while self.frame() == Phase::Running {}
        self.shutdown()
    }

    /// Disposes the overlay, destroys the window and shuts the windowing
    /// subsystem down, in that order.
    pub fn shutdown(self) -> Phase {
        let Driver {
            mut backend,
            mut overlay,
            frames,
            ..
        } = self;

        backend.dispose_overlay(&mut overlay);
        backend.destroy_window();
        backend.terminate();

        log::info!("shut down after {frames} frames");
        Phase::Destroyed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use flappy_engine::device::GpuError;
    use flappy_engine::input::{InputEvent, Key, KeyState};

    use super::*;

    static FONT: &[u8] = include_bytes!("../res/fonts/DejaVuSansMono-Bold.ttf");

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        WindowSize,
        Viewport(Viewport),
        Poll,
        NewSession { id: usize, aspect: f32 },
        Update { session: usize, space: bool },
        Clear,
        DrawSprites(usize),
        TakeGpuError,
        SubmitOverlay { texts: Vec<String>, panels: usize },
        Swap,
        DisposeOverlay,
        DestroyWindow,
        Terminate,
    }

    thread_local! {
        static CALLS: RefCell<Vec<Call>> = const { RefCell::new(Vec::new()) };
        static SESSIONS: RefCell<usize> = const { RefCell::new(0) };
    }

    fn record(call: Call) {
        CALLS.with(|c| c.borrow_mut().push(call));
    }

    fn calls() -> Vec<Call> {
        CALLS.with(|c| c.borrow().clone())
    }

    #[derive(Default)]
    struct RecordingBackend {
        sizes: VecDeque<(u32, u32)>,
        size: (u32, u32),
        /// Frames left before close is requested.
        close_after: Option<usize>,
        /// Frames (0-based) on which Space goes down.
        space_on: Vec<usize>,
        gpu_error_on: Vec<usize>,
        frame: usize,
    }

    impl RecordingBackend {
        fn new(close_after: usize) -> Self {
            Self {
                size: (1280, 720),
                close_after: Some(close_after),
                ..Self::default()
            }
        }
    }

    impl Backend for RecordingBackend {
        fn window_size(&self) -> (u32, u32) {
            record(Call::WindowSize);
            self.size
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            record(Call::Viewport(viewport));
        }

        fn poll_events(&mut self, input: &mut InputState) {
            record(Call::Poll);
            input.begin_frame();
            if self.space_on.contains(&self.frame) {
                input.apply_event(&InputEvent::Key {
                    key: Key::Space,
                    state: KeyState::Pressed,
                    repeat: false,
                });
            } else {
                input.apply_event(&InputEvent::Key {
                    key: Key::Space,
                    state: KeyState::Released,
                    repeat: false,
                });
            }
        }

        fn clear(&mut self) {
            record(Call::Clear);
        }

        fn draw_sprites(&mut self, batch: &SpriteBatch) {
            record(Call::DrawSprites(batch.len()));
        }

        fn take_gpu_error(&mut self) -> Option<GpuError> {
            record(Call::TakeGpuError);
            self.gpu_error_on
                .contains(&self.frame)
                .then(|| GpuError::new("invalid bind group"))
        }

        fn submit_overlay(&mut self, overlay: &Overlay) {
            let data = overlay.draw_data();
            record(Call::SubmitOverlay {
                texts: data.texts().iter().map(|t| t.text.clone()).collect(),
                panels: data.panels().len(),
            });
        }

        fn swap_buffers(&mut self) {
            record(Call::Swap);
            self.frame += 1;
            if let Some(size) = self.sizes.pop_front() {
                self.size = size;
            }
        }

        fn should_close(&self) -> bool {
            self.close_after.is_some_and(|n| self.frame >= n)
        }

        fn dispose_overlay(&mut self, overlay: &mut Overlay) {
            record(Call::DisposeOverlay);
            overlay.dispose();
        }

        fn destroy_window(&mut self) {
            record(Call::DestroyWindow);
        }

        fn terminate(self) {
            record(Call::Terminate);
        }
    }

    /// The first session scores 4 + updates and is over after its third
    /// update (score 7). Later sessions never score.
    struct ScriptedSession {
        id: usize,
        updates: u32,
    }

    impl Session for ScriptedSession {
        fn new(aspect: f32) -> Self {
            let id = SESSIONS.with(|s| {
                *s.borrow_mut() += 1;
                *s.borrow()
            });
            record(Call::NewSession { id, aspect });
            Self { id, updates: 0 }
        }

        fn update(&mut self, input: &InputState) {
            self.updates += 1;
            record(Call::Update {
                session: self.id,
                space: input.key_pressed(Key::Space),
            });
        }

        fn render(&self, batch: &mut SpriteBatch) {
            use flappy_engine::scene::Sprite;
            use flappy_engine::shader::ShaderKind;
            batch.push(Sprite::quad(ShaderKind::Bird, glam::Vec3::ZERO, glam::Vec2::ONE));
        }

        fn is_game_over(&self) -> bool {
            self.id == 1 && self.updates == 3
        }

        fn score(&self) -> u32 {
            if self.id == 1 { self.updates + 4 } else { 0 }
        }
    }

    fn driver(backend: RecordingBackend) -> Driver<RecordingBackend, ScriptedSession> {
        let mut overlay = Overlay::default();
        let font = overlay.add_font(FONT, 42.0).expect("bundled font parses");
        Driver::new(backend, overlay, font, 16.0 / 9.0)
    }

    fn overlay_texts() -> Vec<Vec<String>> {
        calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SubmitOverlay { texts, .. } => Some(texts),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn frame_calls_follow_the_loop_order() {
        let mut driver = driver(RecordingBackend::new(10));
        driver.frame();

        let frame: Vec<Call> = calls().into_iter().skip(1).collect();
        assert_eq!(
            frame,
            vec![
                Call::WindowSize,
                Call::Viewport(Viewport::new(0, 0, 1280, 720)),
                Call::Poll,
                Call::Update { session: 1, space: false },
                Call::Clear,
                Call::DrawSprites(1),
                Call::TakeGpuError,
                Call::SubmitOverlay {
                    texts: vec!["Score: 5".to_string()],
                    panels: 0,
                },
                Call::Swap,
            ]
        );
    }

    #[test]
    fn viewport_tracks_window_size() {
        let mut backend = RecordingBackend::new(10);
        backend.sizes.push_back((800, 600));
        let mut driver = driver(backend);
        driver.frame();
        driver.frame();

        let viewports: Vec<Viewport> = calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Viewport(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(
            viewports,
            vec![Viewport::new(0, 0, 1280, 720), Viewport::new(0, 0, 800, 600)]
        );
    }

    #[test]
    fn poll_runs_before_update() {
        let mut backend = RecordingBackend::new(10);
        backend.space_on = vec![1];
        let mut driver = driver(backend);
        driver.frame();
        driver.frame();

        let calls = calls();
        let updates: Vec<bool> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Update { space, .. } => Some(*space),
                _ => None,
            })
            .collect();
        assert_eq!(updates, vec![false, true]);

        for (i, call) in calls.iter().enumerate() {
            if matches!(call, Call::Update { .. }) {
                assert_eq!(calls[i - 1], Call::Poll);
            }
        }
    }

    #[test]
    fn game_over_starts_a_fresh_round() {
        let mut driver = driver(RecordingBackend::new(10));
        driver.frame();
        driver.frame();
        assert_eq!(driver.session().score(), 6);

        // Third update: score 7 and game over; the round is replaced.
        driver.frame();
        assert_eq!(driver.session().id, 2);
        assert_eq!(driver.session().score(), 0);

        driver.frame();
        assert_eq!(driver.session().id, 2);
        assert_eq!(
            overlay_texts().last(),
            Some(&vec!["Score: 0".to_string()])
        );
        assert_eq!(SESSIONS.with(|s| *s.borrow()), 2);
    }

    #[test]
    fn every_round_gets_the_same_aspect() {
        let mut driver = driver(RecordingBackend::new(10));
        for _ in 0..5 {
            driver.frame();
        }
        let aspects: Vec<f32> = calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::NewSession { aspect, .. } => Some(aspect),
                _ => None,
            })
            .collect();
        assert_eq!(aspects, vec![16.0 / 9.0, 16.0 / 9.0]);
    }

    #[test]
    fn gpu_errors_are_logged_and_the_frame_still_presents() {
        let mut backend = RecordingBackend::new(10);
        backend.gpu_error_on = vec![0];
        let mut driver = driver(backend);
        assert_eq!(driver.frame(), Phase::Running);

        let calls = calls();
        let err = calls.iter().position(|c| *c == Call::TakeGpuError);
        let swap = calls.iter().position(|c| *c == Call::Swap);
        assert!(err.is_some() && swap.is_some());
        assert!(err < swap);
    }

    #[test]
    fn score_window_has_one_text_run_and_no_panel() {
        let mut driver = driver(RecordingBackend::new(10));
        driver.frame();

        let submitted = calls().into_iter().find_map(|c| match c {
            Call::SubmitOverlay { texts, panels } => Some((texts, panels)),
            _ => None,
        });
        assert_eq!(submitted, Some((vec!["Score: 5".to_string()], 0)));
    }

    #[test]
    fn close_request_ends_the_loop_and_tears_down_once() {
        let driver = driver(RecordingBackend::new(3));
        assert_eq!(driver.run(), Phase::Destroyed);

        let calls = calls();
        assert_eq!(calls.iter().filter(|c| **c == Call::Swap).count(), 3);

        let teardown: Vec<Call> = calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::DisposeOverlay | Call::DestroyWindow | Call::Terminate
                )
            })
            .cloned()
            .collect();
        assert_eq!(
            teardown,
            vec![Call::DisposeOverlay, Call::DestroyWindow, Call::Terminate]
        );
        assert_eq!(calls.last(), Some(&Call::Terminate));
    }

    #[test]
    fn frames_after_close_do_nothing() {
        let mut driver = driver(RecordingBackend::new(1));
        assert_eq!(driver.frame(), Phase::Terminating);
        let before = calls().len();
        assert_eq!(driver.frame(), Phase::Terminating);
        assert_eq!(calls().len(), before);
        assert_eq!(driver.frames(), 1);
    }
}
