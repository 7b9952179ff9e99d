use std::path::{Path, PathBuf};

use flappy_engine::coords::ViewVolume;
use flappy_engine::device::GpuInit;
use flappy_engine::display::DisplayConfig;
use flappy_engine::paint::Color;
use flappy_engine::window::WindowConfig;

/// Overrides the asset root (fonts, shaders, textures).
pub const ASSETS_ENV: &str = "FLAPPY_ASSETS";

/// Game configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    /// Initial inner size in physical pixels.
    pub window_size: (u32, u32),
    pub view: ViewVolume,
    pub gpu: GpuInit,

    /// Root holding `fonts/`, `shaders/` and `textures/`.
    pub assets: PathBuf,
    /// Score font, relative to `assets`.
    pub font: PathBuf,
    pub font_size: f32,
    pub clear_color: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Flappy Bird".to_string(),
            window_size: (1280, 720),
            view: ViewVolume::symmetric(10.0),
            gpu: GpuInit::default(),
            assets: default_assets(),
            font: PathBuf::from("fonts/DejaVuSansMono-Bold.ttf"),
            font_size: 42.0,
            clear_color: Color::BLACK,
        }
    }
}

impl GameConfig {
    /// Defaults, with the asset root taken from `FLAPPY_ASSETS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSETS_ENV) {
            config.assets = PathBuf::from(root);
            log::info!("assets from {ASSETS_ENV}: {}", config.assets.display());
        }
        config
    }

    pub fn font_path(&self) -> PathBuf {
        self.assets.join(&self.font)
    }

    pub fn display(&self) -> DisplayConfig {
        DisplayConfig {
            window: WindowConfig {
                title: self.title.clone(),
                size: self.window_size,
                resizable: true,
            },
            gpu: self.gpu.clone(),
            view: self.view,
            shader_dir: self.assets.join("shaders"),
            texture_dir: self.assets.join("textures"),
            clear_color: self.clear_color,
            ..DisplayConfig::default()
        }
    }
}

fn default_assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("res")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_game() {
        let config = GameConfig::default();
        assert_eq!(config.title, "Flappy Bird");
        assert_eq!(config.window_size, (1280, 720));
        assert_eq!(config.view, ViewVolume::default());
        assert!(config.font_path().ends_with("res/fonts/DejaVuSansMono-Bold.ttf"));
    }

    #[test]
    fn display_config_points_into_the_asset_root() {
        let config = GameConfig {
            assets: PathBuf::from("/opt/flappy"),
            ..GameConfig::default()
        };
        let display = config.display();
        assert_eq!(display.window.title, "Flappy Bird");
        assert_eq!(display.window.size, (1280, 720));
        assert_eq!(display.shader_dir, Path::new("/opt/flappy/shaders"));
        assert_eq!(display.texture_dir, Path::new("/opt/flappy/textures"));
        assert_eq!(display.texture_slot, 1);
    }

    #[test]
    fn shipped_assets_exist() {
        let config = GameConfig::default();
        assert!(config.font_path().is_file());
        for name in ["bg", "bird", "pipe"] {
            assert!(config.assets.join("shaders").join(format!("{name}.wgsl")).is_file());
            assert!(config.assets.join("textures").join(format!("{name}.png")).is_file());
        }
    }
}
