/// Window configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner size in physical pixels.
    pub size: (u32, u32),
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "flappy".to_string(),
            size: (1280, 720),
            resizable: true,
        }
    }
}

/// The display the window was centered on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonitorInfo {
    /// Resolution in physical pixels.
    pub size: (u32, u32),
    /// `width / height` of the display.
    pub aspect: f32,
}

impl MonitorInfo {
    pub fn from_size(size: (u32, u32)) -> Self {
        let aspect = if size.1 == 0 {
            1.0
        } else {
            size.0 as f32 / size.1 as f32
        };
        Self { size, aspect }
    }

    /// Top-left position that centers a `window` sized rectangle.
    ///
    /// Windows larger than the display are pinned to the top-left corner.
    pub fn centered_position(&self, window: (u32, u32)) -> (i32, i32) {
        let x = (self.size.0 as i32 - window.0 as i32) / 2;
        let y = (self.size.1 as i32 - window.1 as i32) / 2;
        (x.max(0), y.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_from_resolution() {
        let m = MonitorInfo::from_size((1920, 1080));
        assert!((m.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(MonitorInfo::from_size((800, 0)).aspect, 1.0);
    }

    #[test]
    fn window_is_centered() {
        let m = MonitorInfo::from_size((1920, 1080));
        assert_eq!(m.centered_position((1280, 720)), (320, 180));
        assert_eq!(m.centered_position((2560, 1440)), (0, 0));
    }
}
