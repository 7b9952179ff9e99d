use flappy_bird::app;
use flappy_bird::config::GameConfig;
use flappy_engine::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = app::start(GameConfig::from_env()) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
