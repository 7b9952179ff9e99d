use anyhow::{bail, Context, Result};
use flappy_engine::display::Display;
use flappy_engine::overlay::Overlay;

use crate::config::GameConfig;
use crate::driver::{Driver, Phase};
use crate::level::Level;

/// Starts the game and blocks until its window is closed.
///
/// The game owns one thread (`game`) for the window, GPU and loop. macOS
/// only runs an event loop on the main thread, so there the game runs
/// inline.
pub fn start(config: GameConfig) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        run(config)
    }

    #[cfg(not(target_os = "macos"))]
    {
        let game = std::thread::Builder::new()
            .name("game".to_string())
            .spawn(move || run(config))
            .context("failed to spawn the game thread")?;

        game.join()
            .map_err(|_| anyhow::anyhow!("the game thread panicked"))?
    }
}

fn run(config: GameConfig) -> Result<()> {
    log::info!("starting '{}' with assets in {}", config.title, config.assets.display());

    let display = Display::create(&config.display()).context("failed to initialize the display")?;
    let aspect = display.monitor().aspect;

    let mut overlay = Overlay::default();
    let score_font = overlay
        .add_font_file(&config.font_path(), config.font_size)
        .context("failed to load the score font")?;

    let driver: Driver<_, Level> = Driver::new(display, overlay, score_font, aspect);
    match driver.run() {
        Phase::Destroyed => Ok(()),
        phase => bail!("game loop stopped in phase {phase:?}"),
    }
}
